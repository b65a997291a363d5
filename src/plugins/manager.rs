use std::collections::BTreeMap;
use std::sync::Arc;

use super::shops::{Bike24, CncBikes};
use super::traits::ShopAdapter;
use crate::fetcher::PageFetcher;
use crate::utils::error::AppError;

pub type ShopAdapterArc = Arc<dyn ShopAdapter>;
pub type ShopConstructor = fn(Arc<dyn PageFetcher>) -> ShopAdapterArc;

/// Static table of the shops this build knows how to search.
#[derive(Clone, Default)]
pub struct ShopRegistry {
    constructors: BTreeMap<String, ShopConstructor>,
}

impl ShopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in shop adapter.
    pub fn with_default_shops() -> Self {
        let mut registry = Self::new();
        registry.register(Bike24::NAME, |fetcher| Arc::new(Bike24::new(fetcher)));
        registry.register(CncBikes::NAME, |fetcher| Arc::new(CncBikes::new(fetcher)));
        registry
    }

    /// Register a shop adapter, replacing any previous one of that name.
    pub fn register(&mut self, name: &str, constructor: ShopConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    pub fn has_shop(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered shop names in alphabetical order.
    pub fn list_shops(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    pub fn create(&self, name: &str, fetcher: Arc<dyn PageFetcher>) -> Result<ShopAdapterArc, AppError> {
        let constructor = self.constructors.get(name).ok_or_else(|| AppError::UnknownShop {
            name: name.to_string(),
        })?;
        Ok(constructor(fetcher))
    }

    /// Build adapters for `names`, or for every registered shop when
    /// `names` is empty. All adapters share the one fetcher.
    pub fn create_all(
        &self,
        names: &[String],
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Vec<ShopAdapterArc>, AppError> {
        if names.is_empty() {
            return Ok(self
                .constructors
                .values()
                .map(|constructor| constructor(Arc::clone(&fetcher)))
                .collect());
        }

        names
            .iter()
            .map(|name| self.create(name, Arc::clone(&fetcher)))
            .collect()
    }
}
