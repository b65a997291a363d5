use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, LazyLock};

use super::{selector, text_of};
use crate::fetcher::{Charset, FetchRequest, PageFetcher};
use crate::models::{Article, Shop};
use crate::plugins::traits::ShopAdapter;
use crate::utils::error::{AppError, Result};
use crate::utils::number::extract_number;

static RESULT_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table.productListing"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static SPECIAL_PRICE: LazyLock<Selector> = LazyLock::new(|| selector("span.productSpecialPrice"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img[src]"));

/// CNC Bikes runs an osCommerce listing: one header row, then one row per
/// product. Reduced prices are shown in a `productSpecialPrice` span.
pub struct CncBikes {
    shop: Arc<Shop>,
    fetcher: Arc<dyn PageFetcher>,
}

impl CncBikes {
    pub const NAME: &'static str = "CNC Bikes";
    pub const BASE_URL: &'static str = "http://www.cnc-bike.de";

    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_base_url(fetcher, Self::BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: &str) -> Self {
        Self {
            shop: Arc::new(Shop::new(Self::NAME, base_url)),
            fetcher,
        }
    }

    pub fn search_request(&self, search_term: &str) -> FetchRequest {
        FetchRequest::get(format!(
            "{}/advanced_search_result.php",
            self.shop.base_url().trim_end_matches('/')
        ))
        .param("keywords", search_term)
        .param("title", "1")
        .charset(Charset::Latin1)
    }

    pub fn parse_listing(&self, html: &str) -> Result<Vec<Article>> {
        let document = Html::parse_document(html);
        let table = document
            .select(&RESULT_TABLE)
            .next()
            .ok_or_else(|| AppError::Markup {
                shop: Self::NAME.to_string(),
                message: "result table 'table.productListing' not found".to_string(),
            })?;

        let rows: Vec<ElementRef<'_>> = table.select(&ROW).skip(1).collect();
        if rows.is_empty() {
            return Err(AppError::Markup {
                shop: Self::NAME.to_string(),
                message: "result table has no listings".to_string(),
            });
        }

        let articles = rows
            .into_iter()
            .filter_map(|row| {
                let article = self.parse_row(row);
                if article.is_none() {
                    tracing::debug!("{}: skipping unreadable row '{}'", Self::NAME, text_of(row));
                }
                article
            })
            .collect();
        Ok(articles)
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Option<Article> {
        let link = row.select(&LINK).nth(1)?;
        let name = text_of(link);
        let href = link.value().attr("href")?;
        if name.is_empty() {
            return None;
        }

        let price_text = match row.select(&SPECIAL_PRICE).next() {
            Some(special) => text_of(special),
            None => text_of(row.select(&CELL).nth(2)?),
        };
        let price = extract_number(&price_text).ok()?;

        let mut article =
            Article::new(Arc::clone(&self.shop), name, self.shop.resolve(href)).with_price(price);
        if let Some(src) = row.select(&IMAGE).next().and_then(|img| img.value().attr("src")) {
            article.image_url = Some(self.shop.resolve(src));
        }
        Some(article)
    }
}

#[async_trait]
impl ShopAdapter for CncBikes {
    fn shop(&self) -> &Arc<Shop> {
        &self.shop
    }

    async fn find(&self, search_term: &str) -> Result<Vec<Article>> {
        let html = self.fetcher.fetch(&self.search_request(search_term)).await?;
        self.parse_listing(&html)
    }
}
