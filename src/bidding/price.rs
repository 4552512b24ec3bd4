//! 현재 가격 계산
//! 가격은 저장하지 않고 항상 입찰 기록에서 계산한다.
// region:    --- Imports
use super::model::Bid;
use crate::error::AuctionResult;
use crate::listing::model::Listing;
use crate::store::AuctionStore;
use rust_decimal::Decimal;
// endregion: --- Imports

/// 최고 입찰 선택 (금액이 같으면 먼저 들어온 입찰)
pub fn highest_bid<'a, I>(bids: I) -> Option<&'a Bid>
where
    I: IntoIterator<Item = &'a Bid>,
{
    bids.into_iter().fold(None, |best, bid| match best {
        Some(current) if current.amount >= bid.amount => Some(current),
        _ => Some(bid),
    })
}

/// 최고 입찰가, 입찰이 없으면 시작가
pub fn current_price(listing: &Listing, highest_bid: Option<&Bid>) -> Decimal {
    highest_bid
        .map(|bid| bid.amount)
        .unwrap_or_else(|| Decimal::from(listing.start_bid))
}

/// 저장소에서 최고 입찰을 읽어 현재 가격 조회
pub async fn resolve_current_price(
    store: &dyn AuctionStore,
    listing: &Listing,
) -> AuctionResult<Decimal> {
    let highest = store.highest_bid(listing.id).await?;
    Ok(current_price(listing, highest.as_ref()))
}
