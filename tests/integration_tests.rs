use auction_listings::store::{AuctionStore, MemoryAuctionStore};
use auction_listings::{build_router, AppState};
use axum::http::StatusCode;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::json;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 트레이싱 초기화 (여러 테스트에서 호출되므로 실패는 무시)
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 메모리 저장소로 서버를 띄우고 주소를 돌려준다
async fn spawn_app() -> String {
    init_tracing();
    let store: Arc<dyn AuctionStore> = Arc::new(MemoryAuctionStore::new());
    let app = build_router(AppState::new(store));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn register(client: &Client, base: &str, username: &str) -> i64 {
    let response = client
        .post(format!("{base}/users"))
        .json(&json!({ "username": username }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn create_listing(client: &Client, base: &str, owner: i64, start_bid: i64) -> i64 {
    let response = client
        .post(format!("{base}/listings"))
        .header("x-user-id", owner.to_string())
        .json(&json!({
            "title": "Film camera",
            "description": "35mm rangefinder, works",
            "start_bid": start_bid,
            "image_url": "https://example.com/camera.jpg",
            "category": "Technology"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "active");
    body["id"].as_i64().unwrap()
}

async fn place_bid(
    client: &Client,
    base: &str,
    listing_id: i64,
    bidder: i64,
    amount: Value,
) -> reqwest::Response {
    client
        .post(format!("{base}/listings/{listing_id}/bids"))
        .header("x-user-id", bidder.to_string())
        .json(&json!({ "amount": amount }))
        .send()
        .await
        .expect("Failed to send request")
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

/// 입찰 테스트
#[tokio::test]
async fn test_place_bid() {
    let base = spawn_app().await;
    let client = Client::new();
    let owner = register(&client, &base, "owner").await;
    let alice = register(&client, &base, "alice").await;
    let bob = register(&client, &base, "bob").await;
    let listing_id = create_listing(&client, &base, owner, 10).await;

    let response = place_bid(&client, &base, listing_id, alice, json!("12")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let bid: Value = response.json().await.unwrap();
    assert_eq!(decimal(&bid["amount"]), Decimal::from(12));

    // 숫자로 보내도 허용
    let response = place_bid(&client, &base, listing_id, bob, json!(15.5)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = place_bid(&client, &base, listing_id, alice, json!("11")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "BID_TOO_LOW");
    assert_eq!(decimal(&body["current_price"]), "15.5".parse().unwrap());

    let response = place_bid(&client, &base, listing_id, bob, json!("99")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "ALREADY_HIGHEST_BIDDER");

    let response = place_bid(&client, &base, listing_id, alice, json!("abc")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_AMOUNT");

    let bids: Value = client
        .get(format!("{base}/listings/{listing_id}/bids"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let bids = bids.as_array().unwrap();
    assert_eq!(bids.len(), 2);
    assert_eq!(bids[0]["bidder_id"], bob);
    info!("{:<12} --> 입찰 이력: {:?}", "Test", bids);
}

/// 경매 종료 테스트
#[tokio::test]
async fn test_close_listing() {
    let base = spawn_app().await;
    let client = Client::new();
    let owner = register(&client, &base, "owner").await;
    let alice = register(&client, &base, "alice").await;
    let listing_id = create_listing(&client, &base, owner, 10).await;
    let response = place_bid(&client, &base, listing_id, alice, json!("20.00")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let close = |user: i64| {
        client
            .post(format!("{base}/listings/{listing_id}/close"))
            .header("x-user-id", user.to_string())
            .send()
    };

    let response = close(alice).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = close(owner).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = response.json().await.unwrap();
    assert_eq!(listing["status"], "won");
    assert_eq!(listing["winner_id"], alice);
    assert!(!listing["closed_at"].is_null());

    let response = close(owner).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "ALREADY_CLOSED");

    // 진행 중 목록에서는 빠지고 이력에는 남는다
    let active: Value = client
        .get(format!("{base}/listings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(active.as_array().unwrap().is_empty());
    let history: Value = client
        .get(format!("{base}/listings/history"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
}

/// 관심 목록과 상세 조회 테스트
#[tokio::test]
async fn test_watchlist_and_detail() {
    let base = spawn_app().await;
    let client = Client::new();
    let owner = register(&client, &base, "owner").await;
    let alice = register(&client, &base, "alice").await;
    let listing_id = create_listing(&client, &base, owner, 10).await;

    let toggle = || {
        client
            .post(format!("{base}/listings/{listing_id}/watch"))
            .header("x-user-id", alice.to_string())
            .send()
    };

    let body: Value = toggle().await.unwrap().json().await.unwrap();
    assert_eq!(body["outcome"], "added");
    assert_eq!(body["watching"], true);

    let watchlist: Value = client
        .get(format!("{base}/watchlist"))
        .header("x-user-id", alice.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(watchlist[0]["id"], listing_id);

    let detail: Value = client
        .get(format!("{base}/listings/{listing_id}"))
        .header("x-user-id", alice.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["title"], "Film camera");
    assert_eq!(detail["category"], "Technology");
    assert_eq!(detail["watching"], true);
    assert_eq!(detail["bid_status"], "no_bids");
    assert_eq!(decimal(&detail["current_price"]), Decimal::from(10));

    let body: Value = toggle().await.unwrap().json().await.unwrap();
    assert_eq!(body["outcome"], "removed");
    assert_eq!(body["watching"], false);

    // 익명 조회
    let detail: Value = client
        .get(format!("{base}/listings/{listing_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(detail["watching"].is_null());

    let response = client
        .get(format!("{base}/listings/9999"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// 댓글 테스트
#[tokio::test]
async fn test_comments() {
    let base = spawn_app().await;
    let client = Client::new();
    let owner = register(&client, &base, "owner").await;
    let listing_id = create_listing(&client, &base, owner, 10).await;

    let comment = |content: String| {
        client
            .post(format!("{base}/listings/{listing_id}/comments"))
            .header("x-user-id", owner.to_string())
            .json(&json!({ "content": content }))
            .send()
    };

    assert_eq!(
        comment("Still available?".to_string()).await.unwrap().status(),
        StatusCode::CREATED
    );
    assert_eq!(
        comment("Yes".to_string()).await.unwrap().status(),
        StatusCode::CREATED
    );

    let response = comment("   ".to_string()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "EMPTY_CONTENT");

    let response = comment("x".repeat(501)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "CONTENT_TOO_LONG");

    let comments: Value = client
        .get(format!("{base}/listings/{listing_id}/comments"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "Yes");
    assert_eq!(comments[1]["content"], "Still available?");
}

/// 인증 헤더와 입력 검증 테스트
#[tokio::test]
async fn test_rejects_bad_requests() {
    let base = spawn_app().await;
    let client = Client::new();
    let owner = register(&client, &base, "owner").await;

    let response = client
        .post(format!("{base}/listings"))
        .json(&json!({
            "title": "No header",
            "description": "",
            "start_bid": 1,
            "category": "Toys"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let response = client
        .post(format!("{base}/listings"))
        .header("x-user-id", owner.to_string())
        .json(&json!({
            "title": "t".repeat(65),
            "description": "too long title",
            "start_bid": 1,
            "category": "Toys"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_LISTING");

    let response = client
        .post(format!("{base}/users"))
        .json(&json!({ "username": "owner" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// 강제 종료와 삭제 테스트
#[tokio::test]
async fn test_remove_and_delete() {
    let base = spawn_app().await;
    let client = Client::new();
    let owner = register(&client, &base, "owner").await;
    let alice = register(&client, &base, "alice").await;
    let listing_id = create_listing(&client, &base, owner, 10).await;
    place_bid(&client, &base, listing_id, alice, json!("30")).await;

    let response = client
        .post(format!("{base}/listings/{listing_id}/remove"))
        .header("x-user-id", owner.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = response.json().await.unwrap();
    assert_eq!(listing["status"], "removed");
    assert!(listing["winner_id"].is_null());

    let response = client
        .delete(format!("{base}/listings/{listing_id}"))
        .header("x-user-id", alice.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .delete(format!("{base}/listings/{listing_id}"))
        .header("x-user-id", owner.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{base}/listings/{listing_id}/bids"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("{base}/users/me"))
        .header("x-user-id", alice.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = client
        .get(format!("{base}/users/{alice}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
