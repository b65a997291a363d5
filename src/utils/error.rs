use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Fetch error: {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Markup error: {shop}: {message}")]
    Markup { shop: String, message: String },

    #[error("Unknown shop: {name}")]
    UnknownShop { name: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Network, timeout and HTTP status failures.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Fetch { .. } | AppError::Timeout { .. }
        )
    }

    /// The page arrived but did not look like the expected listing.
    pub fn is_markup_failure(&self) -> bool {
        matches!(self, AppError::Markup { .. })
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
