/// 사용자 관련 커맨드 처리
/// 1. 사용자 등록
/// 2. 사용자 삭제
// region:    --- Imports
use super::model::{User, UserId};
use crate::config::USERNAME_MAX_LEN;
use crate::error::{AuctionError, AuctionResult};
use crate::store::AuctionStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 사용자 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateUserCommand {
    pub username: String,
}

/// 1. 사용자 등록
pub async fn handle_create_user(
    store: &dyn AuctionStore,
    cmd: CreateUserCommand,
) -> AuctionResult<User> {
    let username = cmd.username.trim();
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
        warn!("{:<12} --> 잘못된 사용자 이름: {:?}", "Command", cmd.username);
        return Err(AuctionError::InvalidUsername(format!(
            "사용자 이름은 1~{}자여야 합니다.",
            USERNAME_MAX_LEN
        )));
    }

    let user = store.create_user(username).await?;
    info!("{:<12} --> 사용자 등록: id={}", "Command", user.id);
    Ok(user)
}

/// 2. 사용자 삭제
/// 상품은 남기고 소유자/낙찰자 참조만 비운다.
pub async fn handle_delete_user(store: &dyn AuctionStore, user_id: UserId) -> AuctionResult<()> {
    store.delete_user(user_id).await?;
    info!("{:<12} --> 사용자 삭제: id={}", "Command", user_id);
    Ok(())
}
// endregion: --- Commands
