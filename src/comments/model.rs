use crate::listing::model::ListingId;
use crate::users::model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 댓글 모델 (생성 후 변경 없음)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: ListingId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// 신규 댓글
#[derive(Debug, Clone)]
pub struct NewComment {
    pub listing_id: ListingId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
