//! Selector chains: an ordered list of strategies per field, and the two
//! reducers that consume them.
//!
//! - [`Chain::first`] commits to the first strategy whose value passes the
//!   field's validation. Values are never merged across strategies.
//! - [`Chain::groups`] yields every strategy's matches so union-style fields
//!   (colors, images) and stop-at-first-group fields (about, specs,
//!   categories) can apply their own accumulation rule.

use scraper::{ElementRef, Html, Selector};

use super::observer::{ExtractEvent, ExtractObserver, Field};

/// One way of locating a field: a CSS selector and the attributes to read,
/// in preference order. No attributes means the node's text is read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Strategy {
    pub css: &'static str,
    pub attrs: &'static [&'static str],
}

impl Strategy {
    pub(crate) const fn text(css: &'static str) -> Self {
        Self { css, attrs: &[] }
    }

    pub(crate) const fn attr(css: &'static str, attrs: &'static [&'static str]) -> Self {
        Self { css, attrs }
    }

    /// Reads the strategy's value from a matched node. Returns `None` when
    /// the node carries nothing usable.
    pub(crate) fn read(&self, node: ElementRef<'_>) -> Option<String> {
        if self.attrs.is_empty() {
            return Some(node_text(node)).filter(|t| !t.is_empty());
        }
        first_attr(node, self.attrs)
    }
}

pub(crate) struct Chain {
    field: Field,
    steps: Vec<(Strategy, Selector)>,
}

impl Chain {
    /// Compiles every strategy's selector.
    ///
    /// # Panics
    ///
    /// Panics if a selector does not parse. Chains are built from string
    /// literals in `selectors.rs` and exercised by the unit tests.
    pub(crate) fn new(field: Field, strategies: &[Strategy]) -> Self {
        let steps = strategies
            .iter()
            .map(|s| {
                let selector = Selector::parse(s.css)
                    .unwrap_or_else(|e| panic!("invalid selector {:?}: {e}", s.css));
                (*s, selector)
            })
            .collect();
        Self { field, steps }
    }

    pub(crate) fn field(&self) -> Field {
        self.field
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    /// First-match reducer. Nodes are visited strategy by strategy, each in
    /// document order; `accept` validates and normalizes a raw value.
    pub(crate) fn first<F>(
        &self,
        doc: &Html,
        observer: &dyn ExtractObserver,
        mut accept: F,
    ) -> Option<String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        for (idx, (strategy, selector)) in self.steps.iter().enumerate() {
            let found = doc
                .select(selector)
                .filter_map(|node| strategy.read(node))
                .find_map(|raw| accept(&raw));
            if let Some(value) = found {
                observer.on_event(&ExtractEvent::FieldResolved {
                    field: self.field,
                    strategy: idx,
                });
                return Some(value);
            }
        }
        None
    }

    /// Yields `(position, strategy, matched nodes)` for every strategy, in
    /// chain order. Strategies with no matches still appear with an empty list.
    pub(crate) fn groups<'a>(
        &'a self,
        doc: &'a Html,
    ) -> impl Iterator<Item = (usize, &'a Strategy, Vec<ElementRef<'a>>)> + 'a {
        self.steps
            .iter()
            .enumerate()
            .map(move |(idx, (strategy, selector))| (idx, strategy, doc.select(selector).collect()))
    }

    pub(crate) fn report_missing(&self, observer: &dyn ExtractObserver) {
        observer.on_event(&ExtractEvent::FieldMissing { field: self.field });
    }
}

/// Concatenated text of a node with whitespace runs collapsed to one space.
pub(crate) fn node_text(node: ElementRef<'_>) -> String {
    node.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First attribute in `names` that is present with a non-blank value.
pub(crate) fn first_attr(node: ElementRef<'_>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        node.value()
            .attr(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    })
}

/// Appends `value` unless it is already present or the list is full.
/// Returns `true` when the value was added.
pub(crate) fn push_unique(list: &mut Vec<String>, value: String, cap: usize) -> bool {
    if list.len() >= cap || list.contains(&value) {
        return false;
    }
    list.push(value);
    true
}
