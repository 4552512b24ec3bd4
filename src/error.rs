// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use tracing::error;
// endregion: --- Imports

// region:    --- Error
/// 경매 도메인 오류
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("입찰 금액이 올바르지 않습니다: {0}")]
    InvalidAmount(String),

    #[error("이미 최고 입찰자입니다.")]
    AlreadyHighestBidder,

    #[error("입찰 금액은 현재 가격({current_price})보다 높아야 합니다.")]
    BidTooLow { current_price: Decimal },

    #[error("상품 등록자만 할 수 있는 작업입니다.")]
    NotOwner,

    #[error("이미 종료된 경매입니다.")]
    AlreadyClosed,

    #[error("댓글 내용이 비어 있습니다.")]
    EmptyContent,

    #[error("댓글은 {max}자를 넘을 수 없습니다.")]
    ContentTooLong { max: usize },

    #[error("잘못된 상품 정보입니다: {0}")]
    InvalidListing(String),

    #[error("잘못된 사용자 이름입니다: {0}")]
    InvalidUsername(String),

    #[error("이미 사용 중인 사용자 이름입니다.")]
    UsernameTaken,

    #[error("{0}을(를) 찾을 수 없습니다.")]
    NotFound(&'static str),

    #[error("사용자 정보(x-user-id)가 필요합니다.")]
    Unauthenticated,

    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AuctionResult<T> = Result<T, AuctionError>;

impl AuctionError {
    /// 클라이언트에 내려주는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::InvalidAmount(_) => "INVALID_AMOUNT",
            AuctionError::AlreadyHighestBidder => "ALREADY_HIGHEST_BIDDER",
            AuctionError::BidTooLow { .. } => "BID_TOO_LOW",
            AuctionError::NotOwner => "NOT_OWNER",
            AuctionError::AlreadyClosed => "ALREADY_CLOSED",
            AuctionError::EmptyContent => "EMPTY_CONTENT",
            AuctionError::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            AuctionError::InvalidListing(_) => "INVALID_LISTING",
            AuctionError::InvalidUsername(_) => "INVALID_USERNAME",
            AuctionError::UsernameTaken => "USERNAME_TAKEN",
            AuctionError::NotFound(_) => "NOT_FOUND",
            AuctionError::Unauthenticated => "UNAUTHENTICATED",
            AuctionError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuctionError::InvalidAmount(_)
            | AuctionError::EmptyContent
            | AuctionError::ContentTooLong { .. }
            | AuctionError::InvalidListing(_)
            | AuctionError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
            AuctionError::AlreadyHighestBidder
            | AuctionError::BidTooLow { .. }
            | AuctionError::AlreadyClosed
            | AuctionError::UsernameTaken => StatusCode::CONFLICT,
            AuctionError::NotOwner => StatusCode::FORBIDDEN,
            AuctionError::NotFound(_) => StatusCode::NOT_FOUND,
            AuctionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuctionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AuctionError::BidTooLow { current_price } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_price": current_price,
            }),
            AuctionError::Database(e) => {
                error!("{:<12} --> 데이터베이스 오류: {:?}", "Handler", e);
                serde_json::json!({
                    "error": "내부 서버 오류가 발생했습니다.",
                    "code": self.code(),
                })
            }
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
// endregion: --- Error
