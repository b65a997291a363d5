//! Ordering and shop filtering over a merged article list.
//!
//! Articles without a price always sort after the priced ones, whichever
//! direction is requested. Names compare case-insensitively, so "kette"
//! and "Kette" sort together. All sorts are stable.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::models::Article;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Name,
    ArticleNumber,
    Price,
    ShopName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "article-number" | "articlenr" | "number" => Ok(SortKey::ArticleNumber),
            "price" => Ok(SortKey::Price),
            "shop" | "shop-name" => Ok(SortKey::ShopName),
            other => Err(AppError::Validation(format!("unknown sort key '{}'", other))),
        }
    }
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

pub fn sort(articles: &mut [Article], key: SortKey, order: SortOrder) {
    articles.sort_by(|a, b| compare(a, b, key, order));
}

fn compare(a: &Article, b: &Article, key: SortKey, order: SortOrder) -> Ordering {
    match key {
        SortKey::Name => order.apply(
            a.name
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.name.chars().flat_map(char::to_lowercase)),
        ),
        SortKey::ArticleNumber => order.apply(a.article_number.cmp(&b.article_number)),
        SortKey::ShopName => order.apply(a.shop_name().cmp(b.shop_name())),
        SortKey::Price => match (a.price, b.price) {
            (Some(x), Some(y)) => order.apply(x.total_cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Flag articles of enabled shops visible and all others hidden.
pub fn filter(articles: &mut [Article], enabled_shops: &BTreeSet<String>) {
    for article in articles.iter_mut() {
        article.visible = enabled_shops.contains(article.shop_name());
    }
}

pub fn visible(articles: &[Article]) -> impl Iterator<Item = &Article> {
    articles.iter().filter(|article| article.visible)
}

/// Lowest priced visible article.
pub fn cheapest(articles: &[Article]) -> Option<&Article> {
    visible(articles)
        .filter(|article| article.price.is_some())
        .min_by(|a, b| compare(a, b, SortKey::Price, SortOrder::Ascending))
}
