// region:    --- Imports
use auction_listings::config::{AppConfig, StoreBackend};
use auction_listings::database::DatabaseManager;
use auction_listings::store::{AuctionStore, MemoryAuctionStore, PostgresAuctionStore};
use auction_listings::{build_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 오류: {}", "Main", e);
            return Err(e.into());
        }
    };

    // 저장소 생성
    let store: Arc<dyn AuctionStore> = match (config.store, config.database_url.as_deref()) {
        (StoreBackend::Postgres, Some(database_url)) => {
            let db_manager =
                Arc::new(DatabaseManager::connect(database_url, config.max_connections).await?);

            // 데이터베이스 초기화
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresAuctionStore::new(db_manager))
        }
        _ => {
            warn!("{:<12} --> 메모리 저장소로 실행 (재시작 시 데이터 유실)", "Main");
            Arc::new(MemoryAuctionStore::new())
        }
    };

    let routes_all = build_router(AppState::new(store));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
