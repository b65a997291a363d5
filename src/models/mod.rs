pub mod article;
pub mod search;
pub mod shop;

// Re-exports for convenience
pub use article::*;
pub use search::*;
pub use shop::*;
