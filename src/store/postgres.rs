// region:    --- Imports
use super::{AuctionStore, BidWrite};
use crate::bidding::model::{Bid, NewBid};
use crate::bidding::price::current_price;
use crate::comments::model::{Comment, NewComment};
use crate::database::DatabaseManager;
use crate::error::{AuctionError, AuctionResult};
use crate::listing::model::{Finish, Listing, ListingId, ListingStatus, NewListing};
use crate::query::queries;
use crate::users::model::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, Transaction};
use std::sync::Arc;
use tracing::debug;
// endregion: --- Imports

// region:    --- Rows
/// listings 테이블 행 (status, category는 TEXT)
#[derive(FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: String,
    start_bid: i64,
    image_url: Option<String>,
    category: String,
    owner_id: Option<i64>,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    status: String,
    winner_id: Option<i64>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = sqlx::Error;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(Listing {
            id: row.id,
            title: row.title,
            description: row.description,
            start_bid: row.start_bid,
            image_url: row.image_url,
            category: row
                .category
                .parse()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            owner_id: row.owner_id,
            created_at: row.created_at,
            closed_at: row.closed_at,
            status: row
                .status
                .parse()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            winner_id: row.winner_id,
        })
    }
}

fn into_listings(rows: Vec<ListingRow>) -> AuctionResult<Vec<Listing>> {
    rows.into_iter()
        .map(|row| Listing::try_from(row).map_err(AuctionError::from))
        .collect()
}

/// FK 위반은 존재하지 않는 사용자 참조
fn map_reference_error(e: sqlx::Error) -> AuctionError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() {
            return AuctionError::NotFound("user");
        }
    }
    AuctionError::Database(e)
}
// endregion: --- Rows

// region:    --- Postgres Store
/// PostgreSQL 저장소
pub struct PostgresAuctionStore {
    db: Arc<DatabaseManager>,
}

impl PostgresAuctionStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

/// 상품 행을 FOR UPDATE로 잠그고 읽기
async fn lock_listing(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: ListingId,
) -> AuctionResult<Listing> {
    let row = sqlx::query_as::<_, ListingRow>(queries::LOCK_LISTING)
        .bind(listing_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;
    Ok(Listing::try_from(row)?)
}

async fn highest_bid_in(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: ListingId,
) -> AuctionResult<Option<Bid>> {
    Ok(sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
        .bind(listing_id)
        .fetch_optional(&mut **tx)
        .await?)
}

/// 상품 행을 잠근 뒤 최고 입찰자, 현재 가격과 비교하여 입찰 저장
async fn insert_bid_locked(
    tx: &mut Transaction<'_, Postgres>,
    new: NewBid,
) -> AuctionResult<BidWrite> {
    let listing = lock_listing(tx, new.listing_id).await?;
    if !listing.is_active() {
        return Ok(BidWrite::ListingClosed);
    }

    let highest = highest_bid_in(tx, new.listing_id).await?;
    if highest
        .as_ref()
        .is_some_and(|bid| bid.bidder_id == new.bidder_id)
    {
        return Ok(BidWrite::AlreadyHighest);
    }
    let current_price = current_price(&listing, highest.as_ref());
    if new.amount <= current_price {
        return Ok(BidWrite::Outbid { current_price });
    }

    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
        .bind(new.listing_id)
        .bind(new.bidder_id)
        .bind(new.amount)
        .bind(new.created_at)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_reference_error)?;
    Ok(BidWrite::Placed(bid))
}

/// 상품 행을 잠근 뒤 최고 입찰을 읽고 종료 상태 저장
/// 잠금이 풀리기 전까지 새 입찰이 들어올 수 없다.
async fn finish_locked(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: ListingId,
    finish: Finish,
    now: DateTime<Utc>,
) -> AuctionResult<Listing> {
    let mut listing = lock_listing(tx, listing_id).await?;
    let highest = if finish.needs_highest_bid() {
        highest_bid_in(tx, listing_id).await?
    } else {
        None
    };
    listing.finish(finish, highest.as_ref(), now)?;

    sqlx::query(queries::FINISH_LISTING)
        .bind(listing.id)
        .bind(listing.status.as_str())
        .bind(listing.winner_id)
        .bind(listing.closed_at)
        .execute(&mut **tx)
        .await?;
    Ok(listing)
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn create_user(&self, username: &str) -> AuctionResult<User> {
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(username)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return AuctionError::UsernameTaken;
                    }
                }
                AuctionError::Database(e)
            })
    }

    async fn get_user(&self, user_id: UserId) -> AuctionResult<User> {
        sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(AuctionError::NotFound("user"))
    }

    async fn delete_user(&self, user_id: UserId) -> AuctionResult<()> {
        let result = sqlx::query(queries::DELETE_USER)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AuctionError::NotFound("user"));
        }
        debug!("{:<12} --> 사용자 삭제: id={}", "Store", user_id);
        Ok(())
    }

    async fn insert_listing(&self, new: NewListing) -> AuctionResult<Listing> {
        let row = sqlx::query_as::<_, ListingRow>(queries::INSERT_LISTING)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.start_bid)
            .bind(&new.image_url)
            .bind(new.category.as_str())
            .bind(new.owner_id)
            .bind(new.created_at)
            .fetch_one(self.db.pool())
            .await
            .map_err(map_reference_error)?;
        Ok(Listing::try_from(row)?)
    }

    async fn get_listing(&self, listing_id: ListingId) -> AuctionResult<Listing> {
        let row = sqlx::query_as::<_, ListingRow>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(AuctionError::NotFound("listing"))?;
        Ok(Listing::try_from(row)?)
    }

    async fn list_listings(&self, status: Option<ListingStatus>) -> AuctionResult<Vec<Listing>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ListingRow>(queries::GET_LISTINGS_BY_STATUS)
                    .bind(status.as_str())
                    .fetch_all(self.db.pool())
                    .await?
            }
            None => {
                sqlx::query_as::<_, ListingRow>(queries::GET_ALL_LISTINGS)
                    .fetch_all(self.db.pool())
                    .await?
            }
        };
        into_listings(rows)
    }

    async fn delete_listing(&self, listing_id: ListingId) -> AuctionResult<()> {
        let result = sqlx::query(queries::DELETE_LISTING)
            .bind(listing_id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AuctionError::NotFound("listing"));
        }
        Ok(())
    }

    async fn finish_listing(
        &self,
        listing_id: ListingId,
        finish: Finish,
        now: DateTime<Utc>,
    ) -> AuctionResult<Listing> {
        let listing = self
            .db
            .transaction(|tx| Box::pin(finish_locked(tx, listing_id, finish, now)))
            .await?;
        debug!(
            "{:<12} --> 경매 종료 저장: id={}, status={}",
            "Store", listing.id, listing.status
        );
        Ok(listing)
    }

    async fn highest_bid(&self, listing_id: ListingId) -> AuctionResult<Option<Bid>> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_bids(&self, listing_id: ListingId) -> AuctionResult<Vec<Bid>> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn insert_bid_if_higher(&self, new: NewBid) -> AuctionResult<BidWrite> {
        self.db
            .transaction(|tx| Box::pin(insert_bid_locked(tx, new)))
            .await
    }

    async fn insert_comment(&self, new: NewComment) -> AuctionResult<Comment> {
        sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(new.listing_id)
            .bind(new.author_id)
            .bind(&new.content)
            .bind(new.created_at)
            .fetch_one(self.db.pool())
            .await
            .map_err(map_reference_error)
    }

    async fn list_comments(&self, listing_id: ListingId) -> AuctionResult<Vec<Comment>> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn is_watching(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<bool> {
        Ok(sqlx::query_scalar::<_, bool>(queries::IS_WATCHING)
            .bind(listing_id)
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn add_watcher(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<()> {
        sqlx::query(queries::ADD_WATCHER)
            .bind(listing_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await
            .map_err(map_reference_error)?;
        Ok(())
    }

    async fn remove_watcher(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<()> {
        sqlx::query(queries::REMOVE_WATCHER)
            .bind(listing_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn watchers(&self, listing_id: ListingId) -> AuctionResult<Vec<UserId>> {
        Ok(sqlx::query_scalar::<_, i64>(queries::GET_WATCHERS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn watched_listings(&self, user_id: UserId) -> AuctionResult<Vec<Listing>> {
        let rows = sqlx::query_as::<_, ListingRow>(queries::GET_WATCHED_LISTINGS)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?;
        into_listings(rows)
    }
}
// endregion: --- Postgres Store
