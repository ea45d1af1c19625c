//! Derived tags: brand, rating and deal badges, then title keywords.

use std::sync::LazyLock;

use amzcat_core::{ProductRecord, MAX_TAGS};
use regex::Regex;

use super::chain::push_unique;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("valid regex"));

/// Lowercased title keyword to tag. Checked in order.
const KEYWORD_TAGS: &[(&str, &str)] = &[
    ("wireless", "Wireless"),
    ("bluetooth", "Bluetooth"),
    ("premium", "Premium"),
    ("smart", "Smart"),
    ("portable", "Portable"),
    ("waterproof", "Waterproof"),
    ("rechargeable", "Rechargeable"),
    ("organic", "Organic"),
    ("gaming", "Gaming"),
    ("professional", "Professional"),
    ("kids", "Kids"),
    ("stainless steel", "Stainless Steel"),
];

const HIGHLY_RATED_MIN: f64 = 4.0;
const GREAT_DEAL_MIN: f64 = 50.0;
const GOOD_DEAL_MIN: f64 = 20.0;

/// Builds the tag list from fields already extracted into `record`.
#[must_use]
pub fn derive_tags(record: &ProductRecord) -> Vec<String> {
    let mut tags = Vec::new();

    if !record.brand.is_empty() {
        push_unique(&mut tags, record.brand.clone(), MAX_TAGS);
    }

    if record
        .rating
        .parse::<f64>()
        .is_ok_and(|r| r >= HIGHLY_RATED_MIN)
    {
        push_unique(&mut tags, "Highly Rated".to_string(), MAX_TAGS);
    }

    if let Some(discount) = discount_percent(&record.offer_percentage) {
        if discount >= GREAT_DEAL_MIN {
            push_unique(&mut tags, "Great Deal".to_string(), MAX_TAGS);
        } else if discount >= GOOD_DEAL_MIN {
            push_unique(&mut tags, "Good Deal".to_string(), MAX_TAGS);
        }
    }

    let title = record.title.to_lowercase();
    for (keyword, tag) in KEYWORD_TAGS {
        if title.contains(*keyword) {
            push_unique(&mut tags, (*tag).to_string(), MAX_TAGS);
        }
    }

    tags
}

fn discount_percent(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
