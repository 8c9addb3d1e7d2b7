pub mod app;
pub mod auth;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod storage;
pub mod utils;

pub use app::create_app;
pub use auth::{Identity, TokenVerifier};
pub use db::Database;
pub use state::AppState;
pub use storage::StorageClient;
pub use utils::{ApiError, ApiResult, Config};
