pub mod config;
pub mod fetcher;
pub mod finder;
pub mod models;
pub mod plugins;
pub mod result_view;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use finder::Finder;
pub use models::{Article, SearchProgress, SearchRequest, SearchResult, Shop, ShopOutcome};
pub use plugins::{ShopAdapter, ShopRegistry};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
