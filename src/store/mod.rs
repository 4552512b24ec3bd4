// region:    --- Imports
use crate::bidding::model::{Bid, NewBid};
use crate::comments::model::{Comment, NewComment};
use crate::error::AuctionResult;
use crate::listing::model::{Finish, Listing, ListingId, ListingStatus, NewListing};
use crate::users::model::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
// endregion: --- Imports

// region:    --- Modules
mod memory;
mod postgres;

pub use memory::MemoryAuctionStore;
pub use postgres::PostgresAuctionStore;
// endregion: --- Modules

/// 조건부 입찰 저장 결과
#[derive(Debug, Clone, PartialEq)]
pub enum BidWrite {
    Placed(Bid),
    /// 저장 시점에 이미 종료된 경매
    ListingClosed,
    /// 저장 시점에 같은 사용자가 최고 입찰자
    AlreadyHighest,
    /// 저장 시점의 현재 가격 이하
    Outbid { current_price: Decimal },
}

// region:    --- Auction Store Trait
/// 경매 저장소 트레이트
/// 목록 조회는 모두 최신순으로 반환한다.
#[async_trait]
pub trait AuctionStore: Send + Sync {
    async fn create_user(&self, username: &str) -> AuctionResult<User>;

    async fn get_user(&self, user_id: UserId) -> AuctionResult<User>;

    /// 상품은 남기고 owner/winner 참조를 비운다. 입찰, 댓글, 관심 목록은 함께 삭제.
    async fn delete_user(&self, user_id: UserId) -> AuctionResult<()>;

    async fn insert_listing(&self, listing: NewListing) -> AuctionResult<Listing>;

    async fn get_listing(&self, listing_id: ListingId) -> AuctionResult<Listing>;

    async fn list_listings(&self, status: Option<ListingStatus>) -> AuctionResult<Vec<Listing>>;

    /// 입찰, 댓글, 관심 목록까지 함께 삭제
    async fn delete_listing(&self, listing_id: ListingId) -> AuctionResult<()>;

    /// 상품을 잠근 상태에서 최고 입찰 조회, 상태 전이, 저장을 한 번에 처리
    async fn finish_listing(
        &self,
        listing_id: ListingId,
        finish: Finish,
        now: DateTime<Utc>,
    ) -> AuctionResult<Listing>;

    async fn highest_bid(&self, listing_id: ListingId) -> AuctionResult<Option<Bid>>;

    async fn list_bids(&self, listing_id: ListingId) -> AuctionResult<Vec<Bid>>;

    /// 경매가 진행 중이고, 입찰자가 최고 입찰자가 아니며, 금액이 현재 가격보다 높을 때만 저장
    async fn insert_bid_if_higher(&self, bid: NewBid) -> AuctionResult<BidWrite>;

    async fn insert_comment(&self, comment: NewComment) -> AuctionResult<Comment>;

    async fn list_comments(&self, listing_id: ListingId) -> AuctionResult<Vec<Comment>>;

    async fn is_watching(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<bool>;

    async fn add_watcher(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<()>;

    async fn remove_watcher(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<()>;

    async fn watchers(&self, listing_id: ListingId) -> AuctionResult<Vec<UserId>>;

    async fn watched_listings(&self, user_id: UserId) -> AuctionResult<Vec<Listing>>;
}
// endregion: --- Auction Store Trait
