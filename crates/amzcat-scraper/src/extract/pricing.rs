//! Price, discount, and savings resolution.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use scraper::Html;

use super::fields::resolve_first;
use super::observer::{ExtractEvent, ExtractObserver};
use super::selectors;

/// A leading currency glyph followed by a digit, e.g. `"$19.99"`, `"₹ 2,999"`.
static CURRENCY_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[$₹€£¥]\s*\d").expect("valid regex"));

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("valid regex"));

/// The four price-derived fields of a product record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Pricing {
    pub original_price: String,
    pub offer_price: String,
    pub offer_percentage: String,
    pub amount_saved: String,
}

pub(crate) fn pricing(doc: &Html, observer: &dyn ExtractObserver) -> Pricing {
    let mut offer = resolve_first(&selectors::OFFER_PRICE, doc, observer, currency_text);
    let mut original = resolve_first(&selectors::ORIGINAL_PRICE, doc, observer, currency_text);
    if original.is_empty() {
        original.clone_from(&offer);
    } else if offer.is_empty() {
        offer.clone_from(&original);
    }

    let mut offer_percentage =
        resolve_first(&selectors::DISCOUNT, doc, observer, normalize_discount);
    let mut amount_saved = String::new();

    if !original.is_empty() && original != offer {
        if let Some(savings) = compute_savings(&original, &offer, observer) {
            amount_saved = format!("{:.2}", savings.saved);
            if offer_percentage.is_empty() {
                offer_percentage = format!("{}% off", savings.percent);
            }
        }
    }

    Pricing {
        original_price: original,
        offer_price: offer,
        offer_percentage,
        amount_saved,
    }
}

fn currency_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    CURRENCY_SHAPE.is_match(text).then(|| text.to_string())
}

/// Normalizes discount text such as `"-25%"` or `"Save 25 %"` to `"25% off"`.
pub(crate) fn normalize_discount(raw: &str) -> Option<String> {
    if !raw.contains('%') {
        return None;
    }
    PERCENT
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("{}% off", m.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Savings {
    /// `original - offer`, rounded to two decimal places.
    pub saved: Decimal,
    /// Whole-number percentage of the original price, half away from zero.
    pub percent: Decimal,
}

/// Computes savings when the original price is strictly above the offer.
///
/// Returns `None` when the offer is not cheaper, or when either price cannot
/// be parsed; the latter is reported to the observer.
pub(crate) fn compute_savings(
    original: &str,
    offer: &str,
    observer: &dyn ExtractObserver,
) -> Option<Savings> {
    let (original_amount, offer_amount) = match (parse_amount(original), parse_amount(offer)) {
        (Some(o), Some(f)) => (o, f),
        _ => {
            let reason = format!("unparseable price: original={original:?} offer={offer:?}");
            observer.on_event(&ExtractEvent::SavingsSkipped { reason: &reason });
            return None;
        }
    };

    if original_amount <= offer_amount {
        return None;
    }

    let diff = original_amount - offer_amount;
    let percent = diff
        .checked_div(original_amount)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    Some(Savings {
        saved: diff.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        percent,
    })
}

/// Parses a rendered price by keeping only digits and the decimal point.
pub(crate) fn parse_amount(text: &str) -> Option<Decimal> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(&digits).ok()
}
