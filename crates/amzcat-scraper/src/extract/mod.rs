//! Field extraction from Amazon product detail pages.
//!
//! Every field is resolved by its own selector chain (see `selectors.rs`)
//! and degrades independently to an empty value. Extraction performs no I/O
//! and holds no state, so it is safe to run concurrently on different
//! documents. Diagnostics go to the [`ExtractObserver`] supplied by the
//! caller.

mod chain;
mod fields;
mod observer;
mod pricing;
mod selectors;
mod tags;

use amzcat_core::ProductRecord;
use scraper::Html;

use crate::error::ScraperError;

pub use observer::{ExtractEvent, ExtractObserver, Field, NoopObserver, TracingObserver};
pub use tags::derive_tags;

/// Parses raw page HTML.
///
/// # Errors
///
/// Returns [`ScraperError::EmptyDocument`] when `html` is blank. The HTML
/// parser itself is error-tolerant and accepts anything else.
pub fn parse_page(html: &str) -> Result<Html, ScraperError> {
    if html.trim().is_empty() {
        return Err(ScraperError::EmptyDocument);
    }
    Ok(Html::parse_document(html))
}

/// Extracts a product record, reporting diagnostics through `tracing`.
#[must_use]
pub fn extract(doc: &Html, source_url: &str) -> ProductRecord {
    extract_with_observer(doc, source_url, &TracingObserver)
}

/// Extracts a product record from a parsed page.
///
/// `source_url` is consulted for the ASIN only; the record's `url`, `id`,
/// and timestamps are left for the caller to fill in.
#[must_use]
pub fn extract_with_observer(
    doc: &Html,
    source_url: &str,
    observer: &dyn ExtractObserver,
) -> ProductRecord {
    let title = fields::title(doc, observer);
    let brand = fields::brand(doc, &title, observer);
    let prices = pricing::pricing(doc, observer);

    let mut record = ProductRecord {
        brand,
        model: fields::model(doc, observer),
        asin: fields::asin(doc, source_url, observer),
        original_price: prices.original_price,
        offer_price: prices.offer_price,
        offer_percentage: prices.offer_percentage,
        amount_saved: prices.amount_saved,
        rating: fields::rating(doc, observer),
        rating_count: fields::rating_count(doc, observer),
        colors: fields::colors(doc, observer),
        about_item: fields::about(doc, observer),
        technical_data: fields::technical_data(doc, observer),
        images: fields::images(doc, observer),
        categories: fields::categories(doc, observer),
        title,
        ..ProductRecord::default()
    };
    record.tags = derive_tags(&record);
    record
}

/// Parses `html` and extracts a product record from it.
///
/// # Errors
///
/// Returns [`ScraperError::EmptyDocument`] when `html` is blank.
pub fn extract_html(html: &str, source_url: &str) -> Result<ProductRecord, ScraperError> {
    let doc = parse_page(html)?;
    Ok(extract(&doc, source_url))
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
