pub mod manager;
pub mod shops;
pub mod traits;

pub use manager::ShopRegistry;
pub use traits::ShopAdapter;
