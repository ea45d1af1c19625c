//! Amazon product page fetching and field extraction.

pub mod client;
pub mod error;
pub mod extract;

pub use client::{
    image_requests, validate_product_url, ImageDownloadOutcome, ImageRequest, ProductPageClient,
};
pub use error::ScraperError;
pub use extract::{
    derive_tags, extract, extract_html, extract_with_observer, parse_page, ExtractEvent,
    ExtractObserver, Field, NoopObserver, TracingObserver,
};
