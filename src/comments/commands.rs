/// 댓글 커맨드 처리
// region:    --- Imports
use super::model::{Comment, NewComment};
use crate::config::COMMENT_MAX_LEN;
use crate::error::{AuctionError, AuctionResult};
use crate::listing::model::ListingId;
use crate::store::AuctionStore;
use crate::users::model::UserId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

/// 댓글 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddCommentCommand {
    pub listing_id: ListingId,
    pub author_id: UserId,
    pub content: String,
}

/// 댓글 내용 검증 (앞뒤 공백 제거)
pub fn validate_content(content: &str) -> AuctionResult<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AuctionError::EmptyContent);
    }
    if content.chars().count() > COMMENT_MAX_LEN {
        return Err(AuctionError::ContentTooLong {
            max: COMMENT_MAX_LEN,
        });
    }
    Ok(content)
}

/// 댓글 등록
/// 종료된 경매에도 댓글은 남길 수 있다.
pub async fn handle_add_comment(
    store: &dyn AuctionStore,
    cmd: AddCommentCommand,
) -> AuctionResult<Comment> {
    let content = match validate_content(&cmd.content) {
        Ok(content) => content.to_string(),
        Err(e) => {
            warn!("{:<12} --> 댓글 거절: {}", "Command", e);
            return Err(e);
        }
    };

    // 존재하지 않는 상품 확인
    store.get_listing(cmd.listing_id).await?;

    let comment = store
        .insert_comment(NewComment {
            listing_id: cmd.listing_id,
            author_id: cmd.author_id,
            content,
            created_at: Utc::now(),
        })
        .await?;
    info!(
        "{:<12} --> 댓글 등록: listing={}, id={}",
        "Command", comment.listing_id, comment.id
    );
    Ok(comment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_is_empty() {
        for raw in ["", "   ", "\n\t "] {
            assert!(matches!(validate_content(raw), Err(AuctionError::EmptyContent)));
        }
    }

    #[test]
    fn content_is_trimmed() {
        assert_eq!(validate_content("  nice lamp \n").unwrap(), "nice lamp");
    }

    #[test]
    fn content_length_is_bounded() {
        let at_limit = "a".repeat(COMMENT_MAX_LEN);
        assert!(validate_content(&at_limit).is_ok());

        let over = "가".repeat(COMMENT_MAX_LEN + 1);
        assert!(matches!(
            validate_content(&over),
            Err(AuctionError::ContentTooLong { max: COMMENT_MAX_LEN })
        ));
    }
}
