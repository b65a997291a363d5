use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;
use url::form_urlencoded;

use crate::config::HttpConfig;
use crate::utils::error::{AppError, Result};

/// Character set a shop expects its query in and serves its pages with.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Charset {
    #[default]
    Utf8,
    /// ISO-8859-1
    Latin1,
}

impl Charset {
    pub fn label(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "iso-8859-1",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub charset: Charset,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            charset: Charset::Utf8,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Form-encode the query, with characters mapped through the charset.
    pub fn encoded_query(&self) -> String {
        let latin1 = encode_latin1;
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if self.charset == Charset::Latin1 {
            serializer.encoding_override(Some(&latin1));
        }
        for (key, value) in &self.query {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, self.encoded_query())
    }
}

// Characters outside Latin-1 become '?', as most shop backends do.
fn encode_latin1(input: &str) -> Cow<'_, [u8]> {
    if input.is_ascii() {
        return Cow::Borrowed(input.as_bytes());
    }
    Cow::Owned(
        input
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect(),
    )
}

/// Capability to download a shop page as text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
    config: HttpConfig,
}

impl HttpFetcher {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Download a thumbnail. Any failure, including the short image
    /// timeout, just means there is no picture.
    pub async fn download_image(&self, image_url: &str) -> Option<Vec<u8>> {
        let response = self
            .client
            .get(image_url)
            .timeout(Duration::from_millis(self.config.image_timeout_ms))
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match response {
            Ok(response) => response.bytes().await.ok().map(|bytes| bytes.to_vec()),
            Err(e) => {
                tracing::debug!("Image download failed for {}: {}", image_url, e);
                None
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        let url = request.full_url();
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout {
                    seconds: self.config.request_timeout_secs,
                }
            } else {
                AppError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch {
                url,
                message: format!("HTTP {}", status),
            });
        }

        Ok(response.text_with_charset(request.charset.label()).await?)
    }
}
