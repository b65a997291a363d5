use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, LazyLock};

use super::{selector, text_of};
use crate::fetcher::{Charset, FetchRequest, PageFetcher};
use crate::models::{Article, Shop};
use crate::plugins::traits::ShopAdapter;
use crate::utils::error::{AppError, Result};
use crate::utils::number::extract_number;

static RESULT_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table.simpletablefull"));
static HEADER: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static NAME: LazyLock<Selector> = LazyLock::new(|| selector("b"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static PRODUCT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"product=([^;&#]+)").expect("product id pattern is valid"));

const PAGE_SIZE: usize = 50;

/// Bike24 lists results as table rows, each introduced by an `h2` header.
pub struct Bike24 {
    shop: Arc<Shop>,
    fetcher: Arc<dyn PageFetcher>,
}

impl Bike24 {
    pub const NAME: &'static str = "Bike24";
    pub const BASE_URL: &'static str = "http://www.bike24.net";

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
        FetchRequest::get(format!("{}/1.php", self.shop.base_url().trim_end_matches('/')))
            .param("content", "13")
            .param("navigation", "1")
            .param("search", search_term)
            .param("pitems", PAGE_SIZE.to_string())
            .charset(Charset::Latin1)
    }

    pub fn parse_listing(&self, html: &str) -> Result<Vec<Article>> {
        let document = Html::parse_document(html);
        let table = document
            .select(&RESULT_TABLE)
            .next()
            .ok_or_else(|| AppError::Markup {
                shop: Self::NAME.to_string(),
                message: "result table 'table.simpletablefull' not found".to_string(),
            })?;

        let headers: Vec<ElementRef<'_>> = table.select(&HEADER).collect();
        if headers.is_empty() {
            return Err(AppError::Markup {
                shop: Self::NAME.to_string(),
                message: "result table has no listings".to_string(),
            });
        }

        let mut articles = Vec::new();
        for header in headers {
            match self.parse_row(header) {
                Some(article) => articles.push(article),
                None => tracing::debug!("{}: skipping unreadable row '{}'", Self::NAME, text_of(header)),
            }
        }
        Ok(articles)
    }

    fn parse_row(&self, header: ElementRef<'_>) -> Option<Article> {
        let row = header
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "tr")?;

        let name = header.select(&NAME).next().map(text_of).unwrap_or_else(|| text_of(header));
        if name.is_empty() {
            return None;
        }

        let href = row.select(&LINK).next()?.value().attr("href")?;
        let url = self.shop.resolve(href);
        let price = extract_number(&text_of(row.select(&CELL).nth(2)?)).ok()?;

        let mut article = Article::new(Arc::clone(&self.shop), name, url).with_price(price);
        if let Some(product_id) = PRODUCT_ID.captures(&article.url).and_then(|c| c.get(1)) {
            article.article_number = product_id.as_str().to_string();
        }
        Some(article)
    }
}

#[async_trait]
impl ShopAdapter for Bike24 {
    fn shop(&self) -> &Arc<Shop> {
        &self.shop
    }

    async fn find(&self, search_term: &str) -> Result<Vec<Article>> {
        let html = self.fetcher.fetch(&self.search_request(search_term)).await?;
        self.parse_listing(&html)
    }
}
