//! HTTP client for Amazon product detail pages and their gallery images.

mod images;
mod url;

use std::time::Duration;

use amzcat_core::ProductRecord;
use chrono::Utc;
use reqwest::Client;

use crate::error::ScraperError;
use crate::extract::extract_html;

pub use images::{image_requests, ImageDownloadOutcome, ImageRequest};
pub use url::validate_product_url;
#[cfg(test)]
use url::image_extension;

/// Browser-like `Accept` header. Amazon serves a captcha or a stripped page
/// to clients that only ask for `*/*`.
const PAGE_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Fetches product pages and images.
///
/// Each call issues exactly one request per resource. Retry and backoff are
/// left to the caller.
pub struct ProductPageClient {
    pub(super) client: Client,
}

impl ProductPageClient {
    /// Creates a client with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the raw HTML of a page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] on HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on network, TLS, or timeout failure.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, PAGE_ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "fetched product page");
        Ok(body)
    }

    /// Validates `url` as an Amazon product URL, then fetches and extracts it.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidProductUrl`] for non-Amazon URLs, and
    /// otherwise any error from [`Self::fetch_and_extract`].
    pub async fn fetch_product(&self, url: &str) -> Result<ProductRecord, ScraperError> {
        validate_product_url(url)?;
        self.fetch_and_extract(url).await
    }

    /// Fetches `url` and extracts a product record from it without checking
    /// the host. The record's `url` and `extracted_at` are stamped here.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::fetch_page`], or
    /// [`ScraperError::EmptyDocument`] when the response body is blank.
    pub async fn fetch_and_extract(&self, url: &str) -> Result<ProductRecord, ScraperError> {
        let html = self.fetch_page(url).await?;
        let mut record = extract_html(&html, url)?;
        record.url = url.to_owned();
        record.extracted_at = Some(Utc::now());

        tracing::info!(
            url,
            asin = %record.asin,
            title = %record.title,
            images = record.images.len(),
            "product extracted"
        );
        Ok(record)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
