use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::Article;

/// One search issued by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub term: String,
    /// Names of the shops to query. `None` queries every configured shop.
    pub enabled_shops: Option<BTreeSet<String>>,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            enabled_shops: None,
        }
    }

    pub fn with_shops<I, S>(mut self, shops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_shops = Some(shops.into_iter().map(Into::into).collect());
        self
    }

    pub fn includes(&self, shop_name: &str) -> bool {
        self.enabled_shops
            .as_ref()
            .is_none_or(|shops| shops.contains(shop_name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum ShopOutcome {
    Succeeded { articles: usize },
    Failed { reason: String },
    /// The search was cancelled before this shop finished.
    Skipped,
}

/// Emitted once per shop as it finishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchProgress {
    pub completed: usize,
    pub total: usize,
    pub shop_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub articles: Vec<Article>,
    pub outcomes: BTreeMap<String, ShopOutcome>,
    pub cancelled: bool,
}

impl SearchResult {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(shop, outcome)| match outcome {
            ShopOutcome::Failed { reason } => Some((shop.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|outcome| matches!(outcome, ShopOutcome::Succeeded { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
