use crate::config::AMOUNT_UPPER_BOUND;
use crate::error::{AuctionError, AuctionResult};
use crate::listing::model::ListingId;
use crate::users::model::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// 입찰 모델 (생성 후 변경/삭제 없음)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: ListingId,
    pub bidder_id: UserId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// 신규 입찰
#[derive(Debug, Clone)]
pub struct NewBid {
    pub listing_id: ListingId,
    pub bidder_id: UserId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// 숫자와 소수점 둘째 자리까지만 허용 (부호, 지수, 구분자 불가)
fn is_plain_amount(text: &str) -> bool {
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match text.split_once('.') {
        Some((whole, fraction)) => digits(whole) && fraction.len() <= 2 && digits(fraction),
        None => digits(text),
    }
}

/// 입찰 금액 파싱
/// 양수, 소수점 둘째 자리까지만 허용하고 scale 2로 맞춘다.
pub fn parse_amount(raw: &str) -> AuctionResult<Decimal> {
    let text = raw.trim();
    let invalid = || AuctionError::InvalidAmount(raw.to_string());
    if !is_plain_amount(text) {
        return Err(invalid());
    }

    let mut amount = Decimal::from_str(text).map_err(|_| invalid())?;
    if amount <= Decimal::ZERO || amount >= Decimal::from(AMOUNT_UPPER_BOUND) {
        return Err(invalid());
    }
    amount.rescale(2);
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_fractional_amounts() {
        assert_eq!(parse_amount("12").unwrap().to_string(), "12.00");
        assert_eq!(parse_amount(" 12.5 ").unwrap().to_string(), "12.50");
        assert_eq!(parse_amount("0.01").unwrap().to_string(), "0.01");
        assert_eq!(parse_amount("7.50").unwrap().to_string(), "7.50");
        assert_eq!(parse_amount("007").unwrap().to_string(), "7.00");
    }

    #[test]
    fn rejects_non_positive_and_garbage() {
        for raw in [
            "", "abc", "0", "-3", "0.00", "12.345", "7.500", "1e3", "NaN", "100000000", "1_0",
            "+5", "5.", ".5", "1 000", "1,5",
        ] {
            let err = parse_amount(raw).unwrap_err();
            assert!(
                matches!(err, AuctionError::InvalidAmount(ref r) if r == raw),
                "{raw:?} should be rejected"
            );
        }
    }
}
