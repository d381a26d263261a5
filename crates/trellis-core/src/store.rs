// File: crates/trellis-core/src/store.rs
// Summary: Per-chart filter storage with toggle semantics and predicate lowering.

use std::rc::Rc;

use crate::data::Predicate;
use crate::filter::Filter;
use crate::key::Key;

/// Ordered collection of a chart's active filters.
///
/// Invariant: no two structurally-equal filters coexist. Adding an
/// already-present filter removes it instead, so toggle is its own inverse
/// and click-to-select / click-to-deselect falls out for free.
#[derive(Clone, Debug, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Toggle `filter`: remove an equal filter if present, append otherwise.
    /// Returns true when the filter is present after the call.
    pub fn toggle(&mut self, filter: Filter) -> bool {
        if let Some(pos) = self.filters.iter().position(|f| *f == filter) {
            self.filters.remove(pos);
            false
        } else {
            self.filters.push(filter);
            true
        }
    }

    /// Remove every filter (total reset).
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Replace the whole set at once (brush semantics).
    pub fn replace(&mut self, filters: Vec<Filter>) {
        self.filters = filters;
        self.dedup();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn contains(&self, filter: &Filter) -> bool {
        self.filters.iter().any(|f| f == filter)
    }

    /// Current filters, in insertion order (read-only view).
    pub fn as_slice(&self) -> &[Filter] {
        &self.filters
    }

    /// Does `key` satisfy any stored filter?
    pub fn matches(&self, key: &Key) -> bool {
        self.filters.iter().any(|f| f.matches(key))
    }

    /// Lower the set to a data-source predicate.
    ///
    /// Empty set lowers to `None` (unfiltered). A lone exact or range filter
    /// lowers to the native predicate form; anything else becomes a function
    /// predicate true iff any stored filter matches.
    pub fn predicate(&self) -> Option<Predicate> {
        match self.filters.as_slice() {
            [] => None,
            [Filter::Exact(key)] => Some(Predicate::Exact(key.clone())),
            [Filter::Range { lo, hi }] => Some(Predicate::Range(*lo, *hi)),
            _ => {
                let filters = self.filters.clone();
                Some(Predicate::Func(Rc::new(move |key| {
                    filters.iter().any(|f| f.matches(key))
                })))
            }
        }
    }

    fn dedup(&mut self) {
        let mut seen: Vec<Filter> = Vec::with_capacity(self.filters.len());
        for f in self.filters.drain(..) {
            if !seen.iter().any(|s| *s == f) {
                seen.push(f);
            }
        }
        self.filters = seen;
    }
}
