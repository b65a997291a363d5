//! Price extraction for shop pages that print numbers the European way:
//! `.` groups thousands and `,` separates the decimals.
//!
//! An all-dot value such as `"12.567"` is therefore read as `12567`, never
//! as `12.567`. Shops using the English convention need their own parser.

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::error::{AppError, Result};

static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9]{1,3}(?:\.[0-9]{3})*(?:,[0-9]+)?\b|,[0-9]+\b")
        .expect("number pattern is valid")
});

/// Extract the first number found in `text`.
///
/// Fails with [`AppError::Parse`] when no numeric token is present.
pub fn extract_number(text: &str) -> Result<f64> {
    let token = NUMBER_REGEX
        .find(text)
        .ok_or_else(|| AppError::Parse {
            message: format!("no number in '{}'", text.trim()),
        })?
        .as_str();

    let normalized = token.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().map_err(|e| AppError::Parse {
        message: format!("cannot convert '{}': {}", token, e),
    })
}
