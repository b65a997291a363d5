use serde::{Deserialize, Serialize};
use url::Url;

/// An online shop that articles are found in.
///
/// Shops are created once from the registry and shared between all articles
/// they produce, so the fields are read-only after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Shop {
    name: String,
    base_url: String,
}

impl Shop {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a link found on one of the shop's pages into an absolute URL.
    pub fn resolve(&self, href: &str) -> String {
        let href = href.trim();
        if let Ok(absolute) = Url::parse(href) {
            return absolute.to_string();
        }

        match Url::parse(&self.base_url).and_then(|base| base.join(href)) {
            Ok(joined) => joined.to_string(),
            Err(_) => format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                href.trim_start_matches('/')
            ),
        }
    }
}
