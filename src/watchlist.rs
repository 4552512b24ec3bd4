//! 관심 목록 토글
// region:    --- Imports
use crate::error::AuctionResult;
use crate::listing::model::ListingId;
use crate::store::AuctionStore;
use crate::users::model::UserId;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

/// 토글 결과 (호출한 쪽에서 메시지를 구분하기 위해 필요)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchOutcome {
    Added,
    Removed,
}

impl WatchOutcome {
    pub fn is_watching(&self) -> bool {
        matches!(self, WatchOutcome::Added)
    }
}

/// 관심 목록에 있으면 제거, 없으면 추가
pub async fn handle_toggle_watch(
    store: &dyn AuctionStore,
    listing_id: ListingId,
    user_id: UserId,
) -> AuctionResult<WatchOutcome> {
    store.get_listing(listing_id).await?;

    let outcome = if store.is_watching(listing_id, user_id).await? {
        store.remove_watcher(listing_id, user_id).await?;
        WatchOutcome::Removed
    } else {
        store.add_watcher(listing_id, user_id).await?;
        WatchOutcome::Added
    };

    info!(
        "{:<12} --> 관심 목록 {:?}: listing={}, user={}",
        "Command", outcome, listing_id, user_id
    );
    Ok(outcome)
}
