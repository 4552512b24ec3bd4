// region:    --- Imports
use super::{AuctionStore, BidWrite};
use crate::bidding::model::{Bid, NewBid};
use crate::bidding::price::{current_price, highest_bid};
use crate::comments::model::{Comment, NewComment};
use crate::error::{AuctionError, AuctionResult};
use crate::listing::model::{Finish, Listing, ListingId, ListingStatus, NewListing};
use crate::users::model::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;
use tracing::debug;
// endregion: --- Imports

// region:    --- Memory Store
#[derive(Default)]
struct MemoryState {
    last_id: i64,
    users: BTreeMap<UserId, User>,
    listings: BTreeMap<ListingId, Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    watchers: BTreeSet<(ListingId, UserId)>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn require_user(&self, user_id: UserId) -> AuctionResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(AuctionError::NotFound("user"))
        }
    }

    fn listing(&self, listing_id: ListingId) -> AuctionResult<&Listing> {
        self.listings
            .get(&listing_id)
            .ok_or(AuctionError::NotFound("listing"))
    }

    fn bids_of(&self, listing_id: ListingId) -> impl DoubleEndedIterator<Item = &Bid> + '_ {
        self.bids.iter().filter(move |b| b.listing_id == listing_id)
    }
}

/// 메모리 저장소
/// 테스트 및 DB 없이 실행할 때 사용 (AUCTION_STORE=memory)
#[derive(Default)]
pub struct MemoryAuctionStore {
    state: Mutex<MemoryState>,
}

impl MemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_listings_first(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    listings
}

#[async_trait]
impl AuctionStore for MemoryAuctionStore {
    async fn create_user(&self, username: &str) -> AuctionResult<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.username == username) {
            return Err(AuctionError::UsernameTaken);
        }
        let user = User {
            id: state.next_id(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> AuctionResult<User> {
        let state = self.state.lock().await;
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or(AuctionError::NotFound("user"))
    }

    async fn delete_user(&self, user_id: UserId) -> AuctionResult<()> {
        let mut state = self.state.lock().await;
        if state.users.remove(&user_id).is_none() {
            return Err(AuctionError::NotFound("user"));
        }
        for listing in state.listings.values_mut() {
            if listing.owner_id == Some(user_id) {
                listing.owner_id = None;
            }
            if listing.winner_id == Some(user_id) {
                listing.winner_id = None;
            }
        }
        state.bids.retain(|b| b.bidder_id != user_id);
        state.comments.retain(|c| c.author_id != user_id);
        state.watchers.retain(|(_, u)| *u != user_id);
        debug!("{:<12} --> 사용자 삭제 반영: id={}", "Store", user_id);
        Ok(())
    }

    async fn insert_listing(&self, new: NewListing) -> AuctionResult<Listing> {
        let mut state = self.state.lock().await;
        state.require_user(new.owner_id)?;
        let listing = Listing {
            id: state.next_id(),
            title: new.title,
            description: new.description,
            start_bid: new.start_bid,
            image_url: new.image_url,
            category: new.category,
            owner_id: Some(new.owner_id),
            created_at: new.created_at,
            closed_at: None,
            status: ListingStatus::Active,
            winner_id: None,
        };
        state.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: ListingId) -> AuctionResult<Listing> {
        let state = self.state.lock().await;
        state.listing(listing_id).cloned()
    }

    async fn list_listings(&self, status: Option<ListingStatus>) -> AuctionResult<Vec<Listing>> {
        let state = self.state.lock().await;
        let listings = state
            .listings
            .values()
            .filter(|l| status.map_or(true, |s| l.status == s))
            .cloned()
            .collect();
        Ok(newest_listings_first(listings))
    }

    async fn delete_listing(&self, listing_id: ListingId) -> AuctionResult<()> {
        let mut state = self.state.lock().await;
        if state.listings.remove(&listing_id).is_none() {
            return Err(AuctionError::NotFound("listing"));
        }
        state.bids.retain(|b| b.listing_id != listing_id);
        state.comments.retain(|c| c.listing_id != listing_id);
        state.watchers.retain(|(l, _)| *l != listing_id);
        Ok(())
    }

    async fn finish_listing(
        &self,
        listing_id: ListingId,
        finish: Finish,
        now: DateTime<Utc>,
    ) -> AuctionResult<Listing> {
        let mut state = self.state.lock().await;
        let mut listing = state.listing(listing_id)?.clone();
        let highest = if finish.needs_highest_bid() {
            highest_bid(state.bids_of(listing_id)).cloned()
        } else {
            None
        };
        listing.finish(finish, highest.as_ref(), now)?;
        state.listings.insert(listing_id, listing.clone());
        Ok(listing)
    }

    async fn highest_bid(&self, listing_id: ListingId) -> AuctionResult<Option<Bid>> {
        let state = self.state.lock().await;
        Ok(highest_bid(state.bids_of(listing_id)).cloned())
    }

    async fn list_bids(&self, listing_id: ListingId) -> AuctionResult<Vec<Bid>> {
        let state = self.state.lock().await;
        Ok(state.bids_of(listing_id).rev().cloned().collect())
    }

    async fn insert_bid_if_higher(&self, new: NewBid) -> AuctionResult<BidWrite> {
        let mut state = self.state.lock().await;
        state.require_user(new.bidder_id)?;
        let listing = state.listing(new.listing_id)?;
        if !listing.is_active() {
            return Ok(BidWrite::ListingClosed);
        }
        let highest = highest_bid(state.bids_of(new.listing_id));
        if highest.is_some_and(|bid| bid.bidder_id == new.bidder_id) {
            return Ok(BidWrite::AlreadyHighest);
        }
        let price = current_price(listing, highest);
        if new.amount <= price {
            return Ok(BidWrite::Outbid {
                current_price: price,
            });
        }

        let bid = Bid {
            id: state.next_id(),
            listing_id: new.listing_id,
            bidder_id: new.bidder_id,
            amount: new.amount,
            created_at: new.created_at,
        };
        state.bids.push(bid.clone());
        Ok(BidWrite::Placed(bid))
    }

    async fn insert_comment(&self, new: NewComment) -> AuctionResult<Comment> {
        let mut state = self.state.lock().await;
        state.require_user(new.author_id)?;
        state.listing(new.listing_id)?;
        let comment = Comment {
            id: state.next_id(),
            listing_id: new.listing_id,
            author_id: new.author_id,
            content: new.content,
            created_at: new.created_at,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, listing_id: ListingId) -> AuctionResult<Vec<Comment>> {
        let state = self.state.lock().await;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn is_watching(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<bool> {
        let state = self.state.lock().await;
        Ok(state.watchers.contains(&(listing_id, user_id)))
    }

    async fn add_watcher(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<()> {
        let mut state = self.state.lock().await;
        state.require_user(user_id)?;
        state.listing(listing_id)?;
        state.watchers.insert((listing_id, user_id));
        Ok(())
    }

    async fn remove_watcher(&self, listing_id: ListingId, user_id: UserId) -> AuctionResult<()> {
        let mut state = self.state.lock().await;
        state.watchers.remove(&(listing_id, user_id));
        Ok(())
    }

    async fn watchers(&self, listing_id: ListingId) -> AuctionResult<Vec<UserId>> {
        let state = self.state.lock().await;
        Ok(state
            .watchers
            .iter()
            .filter(|(l, _)| *l == listing_id)
            .map(|(_, u)| *u)
            .collect())
    }

    async fn watched_listings(&self, user_id: UserId) -> AuctionResult<Vec<Listing>> {
        let state = self.state.lock().await;
        let listings = state
            .watchers
            .iter()
            .filter(|(_, u)| *u == user_id)
            .filter_map(|(l, _)| state.listings.get(l).cloned())
            .collect();
        Ok(newest_listings_first(listings))
    }
}
// endregion: --- Memory Store
