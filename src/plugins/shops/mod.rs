// Shop adapter implementations
pub mod bike24;
pub mod cnc_bikes;

pub use bike24::Bike24;
pub use cnc_bikes::CncBikes;

use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector '{}': {:?}", css, e))
}

/// Visible text of an element with whitespace collapsed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}
