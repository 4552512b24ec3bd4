// region:    --- Imports
use crate::bidding::commands::{handle_place_bid, PlaceBidCommand};
use crate::bidding::model::Bid;
use crate::comments::commands::{handle_add_comment, AddCommentCommand};
use crate::comments::model::Comment;
use crate::config::BODY_LIMIT_BYTES;
use crate::error::{AuctionError, AuctionResult};
use crate::listing::commands::{self as listing_commands, CloseListingCommand, CreateListingCommand};
use crate::listing::model::{Listing, ListingId};
use crate::query;
use crate::query::handlers::ListingDetail;
use crate::store::AuctionStore;
use crate::users::commands::{handle_create_user, handle_delete_user, CreateUserCommand};
use crate::users::model::{User, UserId};
use crate::watchlist::{handle_toggle_watch, WatchOutcome};
use axum::async_trait;
use axum::extract::{DefaultBodyLimit, FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

// region:    --- App State
/// 인증 레이어가 넣어주는 사용자 헤더
pub const USER_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuctionStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn AuctionStore>) -> Self {
        Self { store }
    }
}

/// 요청한 사용자 (요청 컨텍스트)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuctionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<UserId>().ok())
            .map(CurrentUser)
            .ok_or(AuctionError::Unauthenticated)
    }
}
// endregion: --- App State

// region:    --- Requests
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

/// 금액은 문자열 또는 숫자로 받는다
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl RawAmount {
    fn into_text(self) -> String {
        match self {
            RawAmount::Text(text) => text,
            RawAmount::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaceBidRequest {
    pub amount: RawAmount,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct WatchResponse {
    pub outcome: WatchOutcome,
    pub watching: bool,
}
// endregion: --- Requests

// region:    --- Router
pub fn build_router(state: AppState) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/users", post(handle_register_user))
        .route("/users/me", delete(handle_delete_me))
        .route("/users/:id", get(handle_get_user))
        .route(
            "/listings",
            get(handle_get_active_listings).post(handle_create_listing),
        )
        .route("/listings/history", get(handle_get_history))
        .route(
            "/listings/:id",
            get(handle_get_listing).delete(handle_delete_listing),
        )
        .route(
            "/listings/:id/bids",
            get(handle_get_bids).post(handle_bid),
        )
        .route("/listings/:id/close", post(handle_close_listing))
        .route("/listings/:id/remove", post(handle_remove_listing))
        .route("/listings/:id/watch", post(handle_toggle_watchlist))
        .route(
            "/listings/:id/comments",
            get(handle_get_comments).post(handle_comment),
        )
        .route("/watchlist", get(handle_get_watchlist))
        .layer(cors)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
// endregion: --- Router

// region:    --- Command Handlers

/// 사용자 등록
pub async fn handle_register_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> AuctionResult<(StatusCode, Json<User>)> {
    info!("{:<12} --> 사용자 등록 요청", "Handler");
    let user = handle_create_user(
        state.store.as_ref(),
        CreateUserCommand {
            username: req.username,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 사용자 탈퇴
pub async fn handle_delete_me(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AuctionResult<StatusCode> {
    info!("{:<12} --> 사용자 탈퇴 요청 id: {}", "Handler", user_id);
    handle_delete_user(state.store.as_ref(), user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 상품 등록
pub async fn handle_create_listing(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(cmd): Json<CreateListingCommand>,
) -> AuctionResult<(StatusCode, Json<Listing>)> {
    info!("{:<12} --> 상품 등록 요청 user: {}", "Handler", user_id);
    let listing =
        listing_commands::handle_create_listing(state.store.as_ref(), cmd, user_id).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(listing_id): Path<ListingId>,
    Json(req): Json<PlaceBidRequest>,
) -> AuctionResult<(StatusCode, Json<Bid>)> {
    info!("{:<12} --> 입찰 요청 id: {}", "Handler", listing_id);
    let bid = handle_place_bid(
        state.store.as_ref(),
        PlaceBidCommand {
            listing_id,
            bidder_id: user_id,
            amount: req.amount.into_text(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

/// 경매 종료 (등록자)
pub async fn handle_close_listing(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(listing_id): Path<ListingId>,
) -> AuctionResult<Json<Listing>> {
    info!("{:<12} --> 경매 종료 요청 id: {}", "Handler", listing_id);
    let listing = listing_commands::handle_close_listing(
        state.store.as_ref(),
        CloseListingCommand {
            listing_id,
            requester_id: user_id,
        },
    )
    .await?;
    Ok(Json(listing))
}

/// 강제 종료 (등록자만 허용)
pub async fn handle_remove_listing(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(listing_id): Path<ListingId>,
) -> AuctionResult<Json<Listing>> {
    info!("{:<12} --> 강제 종료 요청 id: {}", "Handler", listing_id);
    let store = state.store.as_ref();
    store.get_listing(listing_id).await?.ensure_owner(user_id)?;
    let listing = listing_commands::handle_remove_listing(store, listing_id).await?;
    Ok(Json(listing))
}

/// 상품 삭제 (등록자)
pub async fn handle_delete_listing(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(listing_id): Path<ListingId>,
) -> AuctionResult<StatusCode> {
    info!("{:<12} --> 상품 삭제 요청 id: {}", "Handler", listing_id);
    listing_commands::handle_delete_listing(state.store.as_ref(), listing_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 관심 목록 토글
pub async fn handle_toggle_watchlist(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(listing_id): Path<ListingId>,
) -> AuctionResult<Json<WatchResponse>> {
    info!("{:<12} --> 관심 목록 토글 id: {}", "Handler", listing_id);
    let outcome = handle_toggle_watch(state.store.as_ref(), listing_id, user_id).await?;
    Ok(Json(WatchResponse {
        outcome,
        watching: outcome.is_watching(),
    }))
}

/// 댓글 등록
pub async fn handle_comment(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(listing_id): Path<ListingId>,
    Json(req): Json<AddCommentRequest>,
) -> AuctionResult<(StatusCode, Json<Comment>)> {
    info!("{:<12} --> 댓글 등록 요청 id: {}", "Handler", listing_id);
    let comment = handle_add_comment(
        state.store.as_ref(),
        AddCommentCommand {
            listing_id,
            author_id: user_id,
            content: req.content,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 사용자 조회
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AuctionResult<Json<User>> {
    info!("{:<12} --> 사용자 조회 id: {}", "Handler", user_id);
    Ok(Json(state.store.get_user(user_id).await?))
}

/// 진행 중인 상품 조회
pub async fn handle_get_active_listings(
    State(state): State<AppState>,
) -> AuctionResult<Json<Vec<Listing>>> {
    Ok(Json(
        query::handlers::get_active_listings(state.store.as_ref()).await?,
    ))
}

/// 전체 상품 이력 조회
pub async fn handle_get_history(State(state): State<AppState>) -> AuctionResult<Json<Vec<Listing>>> {
    Ok(Json(
        query::handlers::get_listing_history(state.store.as_ref()).await?,
    ))
}

/// 상품 상세 조회 (사용자 헤더는 선택)
pub async fn handle_get_listing(
    State(state): State<AppState>,
    viewer: Option<CurrentUser>,
    Path(listing_id): Path<ListingId>,
) -> AuctionResult<Json<ListingDetail>> {
    let viewer = viewer.map(|CurrentUser(user_id)| user_id);
    Ok(Json(
        query::handlers::get_listing_detail(state.store.as_ref(), listing_id, viewer).await?,
    ))
}

/// 입찰 이력 조회
pub async fn handle_get_bids(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
) -> AuctionResult<Json<Vec<Bid>>> {
    Ok(Json(
        query::handlers::get_bid_history(state.store.as_ref(), listing_id).await?,
    ))
}

/// 댓글 조회
pub async fn handle_get_comments(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
) -> AuctionResult<Json<Vec<Comment>>> {
    Ok(Json(
        query::handlers::get_comments(state.store.as_ref(), listing_id).await?,
    ))
}

/// 내 관심 상품 조회
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AuctionResult<Json<Vec<Listing>>> {
    Ok(Json(
        query::handlers::get_watchlist(state.store.as_ref(), user_id).await?,
    ))
}

// endregion: --- Query Handlers
