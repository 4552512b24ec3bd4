pub mod bidding;
pub mod comments;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod query;
pub mod store;
pub mod users;
pub mod watchlist;

pub use error::{AuctionError, AuctionResult};
pub use handlers::{build_router, AppState};
