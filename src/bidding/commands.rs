/// 입찰 관련 커맨드 처리
/// 1. 입찰 검증
/// 2. 입찰
// region:    --- Imports
use super::model::{parse_amount, Bid, NewBid};
use super::price::current_price;
use crate::error::{AuctionError, AuctionResult};
use crate::listing::model::{Listing, ListingId};
use crate::store::{AuctionStore, BidWrite};
use crate::users::model::UserId;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
/// amount는 사용자가 입력한 그대로의 문자열
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: ListingId,
    pub bidder_id: UserId,
    pub amount: String,
}

/// 1. 입찰 검증
/// 금액 -> 경매 상태 -> 최고 입찰자 -> 현재 가격 순서로 확인한다.
pub fn validate_bid(
    listing: &Listing,
    highest_bid: Option<&Bid>,
    bidder_id: UserId,
    raw_amount: &str,
) -> AuctionResult<Decimal> {
    let amount = parse_amount(raw_amount)?;
    listing.ensure_active()?;

    if highest_bid.is_some_and(|bid| bid.bidder_id == bidder_id) {
        return Err(AuctionError::AlreadyHighestBidder);
    }

    let price = current_price(listing, highest_bid);
    if amount <= price {
        return Err(AuctionError::BidTooLow {
            current_price: price,
        });
    }
    Ok(amount)
}

/// 2. 입찰
pub async fn handle_place_bid(
    store: &dyn AuctionStore,
    cmd: PlaceBidCommand,
) -> AuctionResult<Bid> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    let listing = store.get_listing(cmd.listing_id).await?;
    let highest = store.highest_bid(cmd.listing_id).await?;

    let amount = match validate_bid(&listing, highest.as_ref(), cmd.bidder_id, &cmd.amount) {
        Ok(amount) => amount,
        Err(e) => {
            warn!("{:<12} --> 입찰 거절 ({}): {}", "Command", e.code(), e);
            return Err(e);
        }
    };

    let write = store
        .insert_bid_if_higher(NewBid {
            listing_id: cmd.listing_id,
            bidder_id: cmd.bidder_id,
            amount,
            created_at: Utc::now(),
        })
        .await?;

    // 검증 이후 다른 요청이 먼저 저장된 경우
    match write {
        BidWrite::Placed(bid) => {
            info!(
                "{:<12} --> 입찰 성공: listing={}, amount={}",
                "Command", bid.listing_id, bid.amount
            );
            Ok(bid)
        }
        BidWrite::Outbid { current_price } => {
            warn!(
                "{:<12} --> 동시 입찰로 인한 거절: 현재 가격 {}",
                "Command", current_price
            );
            Err(AuctionError::BidTooLow { current_price })
        }
        BidWrite::AlreadyHighest => {
            warn!("{:<12} --> 동시 입찰로 이미 최고 입찰자", "Command");
            Err(AuctionError::AlreadyHighestBidder)
        }
        BidWrite::ListingClosed => {
            warn!("{:<12} --> 입찰 중 경매 종료됨", "Command");
            Err(AuctionError::AlreadyClosed)
        }
    }
}
// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::model::{Category, ListingStatus};

    fn listing() -> Listing {
        Listing {
            id: 1,
            title: "Camera".to_string(),
            description: "Film camera".to_string(),
            start_bid: 10,
            image_url: None,
            category: Category::Electronics,
            owner_id: Some(1),
            created_at: Utc::now(),
            closed_at: None,
            status: ListingStatus::Active,
            winner_id: None,
        }
    }

    fn bid(bidder_id: UserId, amount: &str) -> Bid {
        Bid {
            id: 1,
            listing_id: 1,
            bidder_id,
            amount: amount.parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn accepts_bid_above_start() {
        let amount = validate_bid(&listing(), None, 2, "10.01").unwrap();
        assert_eq!(amount.to_string(), "10.01");
    }

    #[test]
    fn bid_equal_to_price_is_too_low() {
        let err = validate_bid(&listing(), None, 2, "10").unwrap_err();
        assert!(matches!(err, AuctionError::BidTooLow { current_price } if current_price == Decimal::from(10)));

        let top = bid(3, "15");
        let err = validate_bid(&listing(), Some(&top), 2, "14.99").unwrap_err();
        assert!(matches!(err, AuctionError::BidTooLow { current_price } if current_price == Decimal::from(15)));
    }

    #[test]
    fn highest_bidder_cannot_raise_own_bid() {
        let top = bid(2, "15");
        let err = validate_bid(&listing(), Some(&top), 2, "1000").unwrap_err();
        assert!(matches!(err, AuctionError::AlreadyHighestBidder));
    }

    #[test]
    fn highest_bidder_is_checked_before_price() {
        let top = bid(2, "15");
        for amount in ["15", "15.00", "3"] {
            let err = validate_bid(&listing(), Some(&top), 2, amount).unwrap_err();
            assert!(matches!(err, AuctionError::AlreadyHighestBidder), "{amount}");
        }
    }

    #[test]
    fn amount_is_checked_first() {
        let top = bid(2, "15");
        let err = validate_bid(&listing(), Some(&top), 2, "lots").unwrap_err();
        assert!(matches!(err, AuctionError::InvalidAmount(_)));
    }

    #[test]
    fn closed_listing_rejects_bids() {
        let mut closed = listing();
        closed.close(1, None, Utc::now()).unwrap();
        let err = validate_bid(&closed, None, 2, "50").unwrap_err();
        assert!(matches!(err, AuctionError::AlreadyClosed));
    }
}
