pub mod error;
pub mod number;

pub use error::{AppError, Result};
pub use number::extract_number;
