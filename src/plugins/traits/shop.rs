use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Article, Shop};
use crate::utils::error::Result;

/// Trait for searching one online shop and normalizing its listing.
///
/// An error means the whole shop failed for this search: the page could
/// not be fetched, or it did not contain a result listing. Rows that cannot
/// be read are skipped inside the adapter and never surface here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopAdapter: Send + Sync {
    /// The shop every returned article refers to.
    fn shop(&self) -> &Arc<Shop>;

    /// Fetch a fresh result page for `search_term`, in page order.
    async fn find(&self, search_term: &str) -> Result<Vec<Article>>;
}
