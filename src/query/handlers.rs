// region:    --- Imports
use crate::bidding::model::Bid;
use crate::bidding::price::{highest_bid, resolve_current_price};
use crate::comments::model::Comment;
use crate::error::AuctionResult;
use crate::listing::model::{Listing, ListingId, ListingStatus};
use crate::store::AuctionStore;
use crate::users::model::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- View Models
/// 조회한 사용자의 입찰 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// 현재 최고 입찰자
    Highest,
    /// 입찰했지만 최고가 아님
    Outbid,
    NoBids,
}

/// 상품 상세 화면
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub current_price: Decimal,
    pub bid_count: usize,
    pub bid_status: Option<BidStatus>,
    pub watching: Option<bool>,
    pub comments: Vec<Comment>,
}

/// bids는 입력 순서(오래된 순)
pub fn bid_status(bids: &[Bid], viewer: UserId) -> BidStatus {
    match highest_bid(bids) {
        Some(top) if top.bidder_id == viewer => BidStatus::Highest,
        _ if bids.iter().any(|b| b.bidder_id == viewer) => BidStatus::Outbid,
        _ => BidStatus::NoBids,
    }
}
// endregion: --- View Models

// region:    --- Query Handlers

/// 진행 중인 상품 조회
pub async fn get_active_listings(store: &dyn AuctionStore) -> AuctionResult<Vec<Listing>> {
    info!("{:<12} --> 진행 중인 상품 조회", "Query");
    store.list_listings(Some(ListingStatus::Active)).await
}

/// 모든 상품 조회 (종료 포함)
pub async fn get_listing_history(store: &dyn AuctionStore) -> AuctionResult<Vec<Listing>> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    store.list_listings(None).await
}

/// 사용자 관심 상품 조회
pub async fn get_watchlist(
    store: &dyn AuctionStore,
    user_id: UserId,
) -> AuctionResult<Vec<Listing>> {
    info!("{:<12} --> 관심 상품 조회 user: {}", "Query", user_id);
    store.watched_listings(user_id).await
}

/// 입찰 이력 조회
pub async fn get_bid_history(
    store: &dyn AuctionStore,
    listing_id: ListingId,
) -> AuctionResult<Vec<Bid>> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    store.get_listing(listing_id).await?;
    store.list_bids(listing_id).await
}

/// 댓글 조회 (최신순)
pub async fn get_comments(
    store: &dyn AuctionStore,
    listing_id: ListingId,
) -> AuctionResult<Vec<Comment>> {
    info!("{:<12} --> 댓글 조회 id: {}", "Query", listing_id);
    store.get_listing(listing_id).await?;
    store.list_comments(listing_id).await
}

/// 상품 상세 조회
pub async fn get_listing_detail(
    store: &dyn AuctionStore,
    listing_id: ListingId,
    viewer: Option<UserId>,
) -> AuctionResult<ListingDetail> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", listing_id);
    let listing = store.get_listing(listing_id).await?;

    let price = resolve_current_price(store, &listing).await?;
    let mut bids = store.list_bids(listing_id).await?;
    bids.reverse();

    let watching = match viewer {
        Some(user_id) => Some(store.is_watching(listing_id, user_id).await?),
        None => None,
    };
    let comments = store.list_comments(listing_id).await?;

    Ok(ListingDetail {
        current_price: price,
        bid_count: bids.len(),
        bid_status: viewer.map(|user_id| bid_status(&bids, user_id)),
        watching,
        comments,
        listing,
    })
}

// endregion: --- Query Handlers
