// region:    --- Imports
use crate::bidding::model::Bid;
use crate::error::{AuctionError, AuctionResult};
use crate::users::model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
// endregion: --- Imports

pub type ListingId = i64;

/// 저장된 문자열을 열거형으로 변환하지 못했을 때
#[derive(Debug, thiserror::Error)]
#[error("알 수 없는 {kind} 값: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// region:    --- Category
/// 상품 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fashion,
    Toys,
    Electronics,
    Home,
    Technology,
    #[serde(rename = "Art/Culture")]
    ArtCulture,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Fashion,
        Category::Toys,
        Category::Electronics,
        Category::Home,
        Category::Technology,
        Category::ArtCulture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fashion => "Fashion",
            Category::Toys => "Toys",
            Category::Electronics => "Electronics",
            Category::Home => "Home",
            Category::Technology => "Technology",
            Category::ArtCulture => "Art/Culture",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}
// endregion: --- Category

// region:    --- Status
/// 경매 상태
/// active -> won | removed, 종료 상태에서는 다시 나올 수 없다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Removed,
    Won,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Removed => "removed",
            ListingStatus::Won => "won",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ListingStatus::Active)
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ListingStatus::Active),
            "removed" => Ok(ListingStatus::Removed),
            "won" => Ok(ListingStatus::Won),
            _ => Err(UnknownVariant {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}
// endregion: --- Status

// region:    --- Listing
// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub start_bid: i64,
    pub image_url: Option<String>,
    pub category: Category,
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub status: ListingStatus,
    pub winner_id: Option<UserId>,
}

// 신규 상품 (검증 완료)
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub start_bid: i64,
    pub image_url: Option<String>,
    pub category: Category,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// 경매 종료 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// 등록자 종료. 최고 입찰자가 있으면 낙찰
    Close { requester_id: UserId },
    /// 강제 종료
    Remove,
}

impl Finish {
    pub fn needs_highest_bid(&self) -> bool {
        matches!(self, Finish::Close { .. })
    }
}

impl Listing {
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    pub fn ensure_owner(&self, user_id: UserId) -> AuctionResult<()> {
        if self.owner_id == Some(user_id) {
            Ok(())
        } else {
            Err(AuctionError::NotOwner)
        }
    }

    pub fn ensure_active(&self) -> AuctionResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(AuctionError::AlreadyClosed)
        }
    }

    /// 경매 종료
    /// 최고 입찰이 있으면 won, 없으면 removed
    pub fn close(
        &mut self,
        requester: UserId,
        highest_bid: Option<&Bid>,
        now: DateTime<Utc>,
    ) -> AuctionResult<()> {
        self.ensure_owner(requester)?;
        self.ensure_active()?;

        match highest_bid {
            Some(bid) => {
                self.status = ListingStatus::Won;
                self.winner_id = Some(bid.bidder_id);
            }
            None => {
                self.status = ListingStatus::Removed;
                self.winner_id = None;
            }
        }
        self.closed_at = Some(now);
        Ok(())
    }

    /// 종료 방식에 따라 close 또는 remove
    /// highest_bid는 저장소가 상품을 잠근 상태에서 읽은 값이어야 한다.
    pub fn finish(
        &mut self,
        finish: Finish,
        highest_bid: Option<&Bid>,
        now: DateTime<Utc>,
    ) -> AuctionResult<()> {
        match finish {
            Finish::Close { requester_id } => self.close(requester_id, highest_bid, now),
            Finish::Remove => self.remove(now),
        }
    }

    /// 강제 종료 (입찰 여부와 무관)
    pub fn remove(&mut self, now: DateTime<Utc>) -> AuctionResult<()> {
        self.ensure_active()?;
        self.status = ListingStatus::Removed;
        self.winner_id = None;
        self.closed_at = Some(now);
        Ok(())
    }
}
// endregion: --- Listing
