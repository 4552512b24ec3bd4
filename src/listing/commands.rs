/// 상품 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 경매 종료
/// 3. 강제 종료
/// 4. 상품 삭제
// region:    --- Imports
use super::model::{Category, Finish, Listing, ListingId, NewListing};
use crate::config::{DESCRIPTION_MAX_LEN, IMAGE_URL_MAX_LEN, TITLE_MAX_LEN};
use crate::error::{AuctionError, AuctionResult};
use crate::store::AuctionStore;
use crate::users::model::UserId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 상품 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub start_bid: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: Category,
}

/// 경매 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloseListingCommand {
    pub listing_id: ListingId,
    pub requester_id: UserId,
}

impl CreateListingCommand {
    /// 입력값 검증 후 저장용 상품 생성
    pub fn validate(self, owner_id: UserId) -> AuctionResult<NewListing> {
        let title = self.title.trim();
        if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
            return Err(AuctionError::InvalidListing(format!(
                "제목은 1~{}자여야 합니다.",
                TITLE_MAX_LEN
            )));
        }

        let description = self.description.trim();
        if description.is_empty() || description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(AuctionError::InvalidListing(format!(
                "설명은 1~{}자여야 합니다.",
                DESCRIPTION_MAX_LEN
            )));
        }

        if self.start_bid < 0 {
            return Err(AuctionError::InvalidListing(
                "시작가는 0 이상이어야 합니다.".to_string(),
            ));
        }

        let image_url = match self.image_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(url) => {
                let scheme_ok = url.starts_with("http://") || url.starts_with("https://");
                if !scheme_ok || url.chars().count() > IMAGE_URL_MAX_LEN {
                    return Err(AuctionError::InvalidListing(format!(
                        "이미지 URL은 http(s)로 시작하고 {}자 이하여야 합니다.",
                        IMAGE_URL_MAX_LEN
                    )));
                }
                Some(url.to_string())
            }
        };

        Ok(NewListing {
            title: title.to_string(),
            description: description.to_string(),
            start_bid: self.start_bid,
            image_url,
            category: self.category,
            owner_id,
            created_at: Utc::now(),
        })
    }
}

/// 1. 상품 등록
pub async fn handle_create_listing(
    store: &dyn AuctionStore,
    cmd: CreateListingCommand,
    owner_id: UserId,
) -> AuctionResult<Listing> {
    info!("{:<12} --> 상품 등록 요청: {:?}", "Command", cmd);
    let new_listing = match cmd.validate(owner_id) {
        Ok(new_listing) => new_listing,
        Err(e) => {
            warn!("{:<12} --> 상품 등록 거절: {}", "Command", e);
            return Err(e);
        }
    };

    let listing = store.insert_listing(new_listing).await?;
    info!("{:<12} --> 상품 등록 완료: id={}", "Command", listing.id);
    Ok(listing)
}

/// 2. 경매 종료
/// 등록자만 가능. 최고 입찰자가 있으면 낙찰(won), 없으면 removed
pub async fn handle_close_listing(
    store: &dyn AuctionStore,
    cmd: CloseListingCommand,
) -> AuctionResult<Listing> {
    info!("{:<12} --> 경매 종료 요청: {:?}", "Command", cmd);

    let finish = Finish::Close {
        requester_id: cmd.requester_id,
    };
    let listing = match store.finish_listing(cmd.listing_id, finish, Utc::now()).await {
        Ok(listing) => listing,
        Err(e) => {
            warn!("{:<12} --> 경매 종료 거절: {}", "Command", e);
            return Err(e);
        }
    };

    info!(
        "{:<12} --> 경매 종료: id={}, status={}, winner={:?}",
        "Command", listing.id, listing.status, listing.winner_id
    );
    Ok(listing)
}

/// 3. 강제 종료
/// 입찰과 관계없이 removed 처리. 권한 확인은 호출하는 쪽에서 한다.
pub async fn handle_remove_listing(
    store: &dyn AuctionStore,
    listing_id: ListingId,
) -> AuctionResult<Listing> {
    info!("{:<12} --> 강제 종료 요청: id={}", "Command", listing_id);

    let listing = match store
        .finish_listing(listing_id, Finish::Remove, Utc::now())
        .await
    {
        Ok(listing) => listing,
        Err(e) => {
            warn!("{:<12} --> 강제 종료 거절: {}", "Command", e);
            return Err(e);
        }
    };

    info!("{:<12} --> 강제 종료 완료: id={}", "Command", listing.id);
    Ok(listing)
}

/// 4. 상품 삭제 (입찰, 댓글 함께 삭제)
pub async fn handle_delete_listing(
    store: &dyn AuctionStore,
    listing_id: ListingId,
    requester_id: UserId,
) -> AuctionResult<()> {
    let listing = store.get_listing(listing_id).await?;
    listing.ensure_owner(requester_id)?;

    store.delete_listing(listing_id).await?;
    info!("{:<12} --> 상품 삭제: id={}", "Command", listing_id);
    Ok(())
}
// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateListingCommand {
        CreateListingCommand {
            title: "  Vintage radio ".to_string(),
            description: "Works, some scratches".to_string(),
            start_bid: 25,
            image_url: Some("https://img.example.com/radio.png".to_string()),
            category: Category::Electronics,
        }
    }

    #[test]
    fn valid_listing_is_trimmed() {
        let new_listing = command().validate(4).unwrap();
        assert_eq!(new_listing.title, "Vintage radio");
        assert_eq!(new_listing.owner_id, 4);
        assert_eq!(new_listing.start_bid, 25);
    }

    #[test]
    fn blank_image_url_is_dropped() {
        let mut cmd = command();
        cmd.image_url = Some("   ".to_string());
        assert_eq!(cmd.validate(4).unwrap().image_url, None);
    }

    #[test]
    fn rejects_bad_fields() {
        let mut cmd = command();
        cmd.title = "   ".to_string();
        assert!(matches!(cmd.validate(4), Err(AuctionError::InvalidListing(_))));

        let mut cmd = command();
        cmd.title = "x".repeat(TITLE_MAX_LEN + 1);
        assert!(matches!(cmd.validate(4), Err(AuctionError::InvalidListing(_))));

        let mut cmd = command();
        cmd.description = "y".repeat(DESCRIPTION_MAX_LEN + 1);
        assert!(matches!(cmd.validate(4), Err(AuctionError::InvalidListing(_))));

        let mut cmd = command();
        cmd.start_bid = -1;
        assert!(matches!(cmd.validate(4), Err(AuctionError::InvalidListing(_))));

        let mut cmd = command();
        cmd.image_url = Some("ftp://example.com/a.png".to_string());
        assert!(matches!(cmd.validate(4), Err(AuctionError::InvalidListing(_))));
    }
}
