use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::Shop;

/// One normalized listing found in a shop.
///
/// Adapters build articles while parsing a result page. After that only
/// `visible` changes, when the result view filters by shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub name: String,
    pub article_number: String,
    /// Price in the shop's currency. Absent, or finite and non-negative.
    pub price: Option<f64>,
    pub url: String,
    pub shop: Arc<Shop>,
    pub brand: String,
    pub image_url: Option<String>,
    /// Number of units in one package.
    pub units: u32,
    pub visible: bool,
}

impl Article {
    pub fn new(shop: Arc<Shop>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            article_number: String::new(),
            price: None,
            url: url.into(),
            shop,
            brand: String::new(),
            image_url: None,
            units: 1,
            visible: true,
        }
    }

    /// Negative and non-finite prices are dropped.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = (price.is_finite() && price >= 0.0).then_some(price);
        self
    }

    pub fn with_article_number(mut self, article_number: impl Into<String>) -> Self {
        self.article_number = article_number.into();
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_units(mut self, units: u32) -> Self {
        self.units = units.max(1);
        self
    }

    pub fn shop_name(&self) -> &str {
        self.shop.name()
    }

    pub fn formatted_price(&self) -> String {
        match self.price {
            Some(price) => format!("{:.2}€", price),
            None => "-".to_string(),
        }
    }

    pub fn unit_price(&self) -> Option<f64> {
        self.price.map(|price| price / f64::from(self.units.max(1)))
    }
}
