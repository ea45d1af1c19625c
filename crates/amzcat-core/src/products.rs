use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_COLORS: usize = 10;
pub const MAX_IMAGES: usize = 6;
pub const MAX_CATEGORIES: usize = 5;
pub const MAX_TAGS: usize = 8;

/// A product extracted from an Amazon detail page, curated and stored in the
/// local catalog.
///
/// Every scraped field defaults to an empty string or empty list when the
/// page does not carry it. Identity and timestamps belong to whoever
/// persists the record; the extractor leaves them unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecord {
    /// Catalog identity, assigned when the record is first stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub brand: String,
    pub model: String,
    /// Amazon Standard Identification Number, e.g. `"B08N5WRWNW"`.
    pub asin: String,
    /// List or "was" price exactly as rendered, e.g. `"₹2,999.00"`.
    pub original_price: String,
    /// Current selling price exactly as rendered.
    pub offer_price: String,
    /// Discount in the form `"NN% off"`.
    pub offer_percentage: String,
    /// `original_price - offer_price` with two decimals, e.g. `"1000.00"`.
    pub amount_saved: String,
    /// Average star rating, e.g. `"4.5"`.
    pub rating: String,
    /// Number of ratings with thousands separators removed.
    pub rating_count: String,
    pub colors: Vec<String>,
    /// Feature bullets, each prefixed with `"• "` and joined by newlines.
    pub about_item: String,
    /// `"Label: Value"` lines joined by newlines.
    pub technical_data: String,
    pub images: Vec<ProductImage>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    /// Returns `true` when both prices are known and the offer undercuts the
    /// original price.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        !self.amount_saved.is_empty()
    }

    /// Returns the number of images already written to disk.
    #[must_use]
    pub fn downloaded_image_count(&self) -> usize {
        self.images.iter().filter(|i| i.downloaded).count()
    }

    /// Short label for logs and CLI listings: ASIN when known, else the title.
    #[must_use]
    pub fn display_key(&self) -> &str {
        if self.asin.is_empty() {
            &self.title
        } else {
            &self.asin
        }
    }
}

/// A product gallery image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductImage {
    pub url: String,
    pub alt: String,
    /// Flipped to `true` only after the image bytes were stored locally.
    pub downloaded: bool,
}

impl ProductImage {
    #[must_use]
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
            downloaded: false,
        }
    }
}
