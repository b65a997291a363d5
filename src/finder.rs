use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::FinderConfig;
use crate::models::{Article, SearchProgress, SearchRequest, SearchResult, Shop, ShopOutcome};
use crate::plugins::manager::ShopAdapterArc;
use crate::utils::error::{AppError, Result};

/// Searches a set of shops concurrently and merges what they find.
///
/// A shop that fails, times out or panics only loses its own articles.
/// `search` never returns an error; per-shop problems end up in
/// [`SearchResult::outcomes`].
pub struct Finder {
    adapters: Vec<ShopAdapterArc>,
    config: FinderConfig,
    cancel_token: Mutex<CancellationToken>,
}

impl Finder {
    pub fn new(adapters: Vec<ShopAdapterArc>, config: FinderConfig) -> Self {
        Self {
            adapters,
            config,
            cancel_token: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn shops(&self) -> impl Iterator<Item = &Arc<Shop>> {
        self.adapters.iter().map(|adapter| adapter.shop())
    }

    /// Stop the running search, or the next one if none is running yet.
    /// Unfinished shops are skipped and the partial result is returned.
    pub fn cancel(&self) {
        self.cancellation_token().cancel();
    }

    /// Token of the running (or next) search.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // A finished search leaves a fresh token for the next one.
    fn finish_search(&self) {
        *self.cancel_token.lock().unwrap_or_else(PoisonError::into_inner) = CancellationToken::new();
    }

    /// Search every enabled shop for `request.term`.
    ///
    /// `on_progress` is called from this task once per finished shop, in
    /// completion order.
    pub async fn search<F>(&self, request: &SearchRequest, mut on_progress: F) -> SearchResult
    where
        F: FnMut(SearchProgress),
    {
        let token = self.cancellation_token();
        let selected: Vec<ShopAdapterArc> = self
            .adapters
            .iter()
            .filter(|adapter| request.includes(adapter.shop().name()))
            .cloned()
            .collect();
        let shop_names: Vec<String> = selected
            .iter()
            .map(|adapter| adapter.shop().name().to_string())
            .collect();

        let total = selected.len();
        let limit = self.config.max_concurrent_shops.max(1);
        let timeout_secs = self.config.search_timeout_secs;
        let term: Arc<str> = Arc::from(request.term.as_str());
        info!("Searching {} shops for '{}'", total, term);

        let mut result = SearchResult::default();
        let mut pending = selected.into_iter();
        let mut tasks: JoinSet<Result<Vec<Article>>> = JoinSet::new();
        let mut running: HashMap<Id, String> = HashMap::new();
        let mut completed = 0;

        loop {
            while tasks.len() < limit && !token.is_cancelled() {
                let Some(adapter) = pending.next() else { break };
                let shop_name = adapter.shop().name().to_string();
                debug!("Starting shop {}", shop_name);
                let handle = tasks.spawn(run_adapter(adapter, Arc::clone(&term), timeout_secs));
                running.insert(handle.id(), shop_name);
            }

            if tasks.is_empty() {
                break;
            }

            let joined = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                joined = tasks.join_next_with_id() => joined,
            };

            let (id, found) = match joined {
                Some(Ok((id, found))) => (id, found),
                Some(Err(e)) => (e.id(), Err(task_failure(&running, &e))),
                None => break,
            };
            let Some(shop_name) = running.remove(&id) else {
                warn!("Finished task {} belongs to no shop", id);
                continue;
            };

            let outcome = match found {
                Ok(articles) => {
                    debug!("Shop {} returned {} articles", shop_name, articles.len());
                    let count = articles.len();
                    result.articles.extend(articles);
                    ShopOutcome::Succeeded { articles: count }
                }
                Err(e) => {
                    warn!("Shop {} failed: {}", shop_name, e);
                    ShopOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            result.outcomes.insert(shop_name.clone(), outcome);

            completed += 1;
            on_progress(SearchProgress {
                completed,
                total,
                shop_name,
            });
        }

        tasks.abort_all();
        result.cancelled = token.is_cancelled();
        self.finish_search();
        for name in shop_names {
            result.outcomes.entry(name).or_insert(ShopOutcome::Skipped);
        }

        info!(
            "Search for '{}' finished: {} articles from {}/{} shops{}",
            term,
            result.articles.len(),
            result.succeeded_count(),
            total,
            if result.cancelled { " (cancelled)" } else { "" }
        );
        result
    }

    /// Like [`Finder::search`], with progress sent to a channel.
    pub async fn search_with_channel(
        &self,
        request: &SearchRequest,
        progress: mpsc::UnboundedSender<SearchProgress>,
    ) -> SearchResult {
        self.search(request, |event| {
            // The receiver going away must not stop the search.
            let _ = progress.send(event);
        })
        .await
    }
}

async fn run_adapter(adapter: ShopAdapterArc, term: Arc<str>, timeout_secs: u64) -> Result<Vec<Article>> {
    tokio::time::timeout(Duration::from_secs(timeout_secs), adapter.find(&term))
        .await
        .unwrap_or_else(|_elapsed| {
            Err(AppError::Timeout {
                seconds: timeout_secs,
            })
        })
}

/// A shop task that panicked or was torn down without a result.
fn task_failure(running: &HashMap<Id, String>, error: &JoinError) -> AppError {
    let shop = running.get(&error.id()).cloned().unwrap_or_default();
    let message = if error.is_panic() {
        "adapter panicked while reading the page".to_string()
    } else {
        format!("task ended without a result: {}", error)
    };
    AppError::Markup { shop, message }
}
