//! Catalog export as JSON or CSV.

use std::fmt;
use std::str::FromStr;

use amzcat_core::ProductRecord;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::StoreError;

/// Separator for list fields flattened into a single CSV cell.
const LIST_SEPARATOR: &str = " | ";

const CSV_HEADERS: [&str; 20] = [
    "id",
    "title",
    "brand",
    "model",
    "asin",
    "originalPrice",
    "offerPrice",
    "offerPercentage",
    "amountSaved",
    "rating",
    "ratingCount",
    "colors",
    "aboutItem",
    "technicalData",
    "images",
    "categories",
    "tags",
    "url",
    "extractedAt",
    "updatedAt",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    /// Renders `products` in this format.
    ///
    /// # Errors
    ///
    /// Returns any error from [`to_json`] or [`to_csv`].
    pub fn render(self, products: &[ProductRecord]) -> Result<Vec<u8>, StoreError> {
        match self {
            Self::Json => to_json(products).map(String::into_bytes),
            Self::Csv => to_csv(products),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(StoreError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Pretty-printed JSON array of `products`.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if serialization fails.
pub fn to_json(products: &[ProductRecord]) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(products)?)
}

/// CSV with a header row and one row per product. List fields are joined
/// with `" | "`; images contribute their URLs.
///
/// # Errors
///
/// Returns [`StoreError::Csv`] if a row cannot be written.
pub fn to_csv(products: &[ProductRecord]) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for p in products {
        let images: Vec<&str> = p.images.iter().map(|i| i.url.as_str()).collect();
        writer.write_record([
            p.id.map(|id| id.to_string()).unwrap_or_default(),
            p.title.clone(),
            p.brand.clone(),
            p.model.clone(),
            p.asin.clone(),
            p.original_price.clone(),
            p.offer_price.clone(),
            p.offer_percentage.clone(),
            p.amount_saved.clone(),
            p.rating.clone(),
            p.rating_count.clone(),
            p.colors.join(LIST_SEPARATOR),
            p.about_item.clone(),
            p.technical_data.clone(),
            images.join(LIST_SEPARATOR),
            p.categories.join(LIST_SEPARATOR),
            p.tags.join(LIST_SEPARATOR),
            p.url.clone(),
            p.extracted_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            p.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| StoreError::Csv(e.into_error().into()))
}

/// Download file name for an export taken at `now`, e.g.
/// `amazon_products_2024-05-01.csv`.
#[must_use]
pub fn export_file_name(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "amazon_products_{}.{}",
        now.format("%Y-%m-%d"),
        format.extension()
    )
}
