// File: crates/trellis-core/src/filter.rs
// Summary: Filter value objects; one contract ("does key K match"), four variants.

use std::fmt;

use crate::key::Key;

/// An immutable filter predicate over keys.
///
/// Every variant exposes exactly one behavior, [`Filter::matches`].
/// Filters compare by structural equality, never identity, which is what
/// toggle-style deduplication in a `FilterSet` relies on.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Matches iff the candidate key equals the wrapped key.
    Exact(Key),
    /// Half-open interval `[lo, hi)`: `lo` inclusive, `hi` exclusive.
    /// Inverted bounds are accepted as given and simply never match.
    Range { lo: f64, hi: f64 },
    /// Two-dimensional half-open box over `(x, y)` point keys.
    RangedTwoDim { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Multi-part key compared element-wise up to the shorter length,
    /// so a coarse filter matches any finer key sharing its prefix.
    Hierarchy(Vec<Key>),
}

impl Filter {
    pub fn exact(key: impl Into<Key>) -> Self {
        Filter::Exact(key.into())
    }

    pub fn range(lo: f64, hi: f64) -> Self {
        Filter::Range { lo, hi }
    }

    /// Box from two corner points `(x0, y0)`..`(x1, y1)`, half-open on both axes.
    pub fn ranged_2d(corner0: (f64, f64), corner1: (f64, f64)) -> Self {
        Filter::RangedTwoDim { x0: corner0.0, y0: corner0.1, x1: corner1.0, y1: corner1.1 }
    }

    pub fn hierarchy(parts: Vec<Key>) -> Self {
        Filter::Hierarchy(parts)
    }

    /// Does `key` satisfy this filter?
    pub fn matches(&self, key: &Key) -> bool {
        match self {
            Filter::Exact(want) => want == key,
            Filter::Range { lo, hi } => match key.as_f64() {
                Some(k) => *lo <= k && k < *hi,
                None => false,
            },
            Filter::RangedTwoDim { x0, y0, x1, y1 } => match key.as_point() {
                Some((x, y)) => *x0 <= x && x < *x1 && *y0 <= y && y < *y1,
                None => false,
            },
            Filter::Hierarchy(parts) => {
                let candidate: &[Key] = match key {
                    Key::List(elems) => elems,
                    other => std::slice::from_ref(other),
                };
                let n = parts.len().min(candidate.len());
                if n == 0 {
                    return false;
                }
                parts.iter().take(n).eq(candidate.iter().take(n))
            }
        }
    }

    /// Canonical raw value for display: the wrapped key, or the boundary
    /// tuple of a range variant.
    pub fn value(&self) -> Key {
        match self {
            Filter::Exact(key) => key.clone(),
            Filter::Range { lo, hi } => Key::pair(*lo, *hi),
            Filter::RangedTwoDim { x0, y0, x1, y1 } => {
                Key::List(vec![Key::pair(*x0, *y0), Key::pair(*x1, *y1)])
            }
            Filter::Hierarchy(parts) => Key::List(parts.clone()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Exact(key) => write!(f, "= {key}"),
            Filter::Range { lo, hi } => write!(f, "[{lo}, {hi})"),
            Filter::RangedTwoDim { x0, y0, x1, y1 } => {
                write!(f, "[({x0}, {y0}), ({x1}, {y1}))")
            }
            Filter::Hierarchy(_) => write!(f, "~ {}", self.value()),
        }
    }
}
