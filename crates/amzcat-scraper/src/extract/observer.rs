//! Diagnostics hook for the extractor.
//!
//! Extraction itself never logs. Every notable decision is reported as an
//! [`ExtractEvent`] to the observer the caller passes in, so callers choose
//! whether it ends up in `tracing`, a test buffer, or nowhere.

use std::fmt;

/// Product fields the extractor resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Brand,
    Model,
    Asin,
    OfferPrice,
    OriginalPrice,
    Discount,
    Rating,
    RatingCount,
    Colors,
    About,
    TechnicalData,
    Images,
    Categories,
    Tags,
}

impl Field {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Brand => "brand",
            Field::Model => "model",
            Field::Asin => "asin",
            Field::OfferPrice => "offer_price",
            Field::OriginalPrice => "original_price",
            Field::Discount => "discount",
            Field::Rating => "rating",
            Field::RatingCount => "rating_count",
            Field::Colors => "colors",
            Field::About => "about_item",
            Field::TechnicalData => "technical_data",
            Field::Images => "images",
            Field::Categories => "categories",
            Field::Tags => "tags",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractEvent<'a> {
    /// A selector strategy produced the field's value. `strategy` is the
    /// zero-based position in the field's chain.
    FieldResolved { field: Field, strategy: usize },
    /// The value came from somewhere other than a selector chain, e.g. the
    /// brand guessed from the title or the ASIN read from the URL.
    FieldDerived { field: Field, source: &'static str },
    /// Every strategy came up empty; the field keeps its empty default.
    FieldMissing { field: Field },
    /// Both prices were found but the savings could not be computed.
    SavingsSkipped { reason: &'a str },
}

pub trait ExtractObserver {
    fn on_event(&self, event: &ExtractEvent<'_>);
}

impl<F> ExtractObserver for F
where
    F: Fn(&ExtractEvent<'_>),
{
    fn on_event(&self, event: &ExtractEvent<'_>) {
        self(event);
    }
}

/// Forwards events to `tracing` at `debug` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExtractObserver for TracingObserver {
    fn on_event(&self, event: &ExtractEvent<'_>) {
        match event {
            ExtractEvent::FieldResolved { field, strategy } => {
                tracing::debug!(%field, strategy, "field resolved");
            }
            ExtractEvent::FieldDerived { field, source } => {
                tracing::debug!(%field, source, "field derived");
            }
            ExtractEvent::FieldMissing { field } => {
                tracing::debug!(%field, "field not found on page");
            }
            ExtractEvent::SavingsSkipped { reason } => {
                tracing::debug!(reason, "savings computation skipped");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExtractObserver for NoopObserver {
    fn on_event(&self, _event: &ExtractEvent<'_>) {}
}
