pub mod shop;

#[cfg(test)]
pub use shop::MockShopAdapter;
pub use shop::ShopAdapter;
