// File: crates/trellis-core/src/key.rs
// Summary: Key value vocabulary shared by filters, bins, and charts.

use std::fmt;

/// A data key as produced by a dimension's key function.
///
/// Multi-part keys (`List`) serve heatmap cells, drill-down paths, and
/// scatter points (a two-element numeric list).
#[derive(Clone, Debug)]
pub enum Key {
    Int(i64),
    Num(f64),
    Str(String),
    List(Vec<Key>),
}

impl Key {
    /// Build a two-part key, e.g. a heatmap cell or scatter point.
    pub fn pair(x: impl Into<Key>, y: impl Into<Key>) -> Self {
        Key::List(vec![x.into(), y.into()])
    }

    /// Numeric view of this key, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Key::Int(n) => Some(*n as f64),
            Key::Num(x) => Some(*x),
            _ => None,
        }
    }

    /// Extract `(x, y)` from a two-element numeric list.
    pub fn as_point(&self) -> Option<(f64, f64)> {
        match self {
            Key::List(parts) if parts.len() == 2 => {
                Some((parts[0].as_f64()?, parts[1].as_f64()?))
            }
            _ => None,
        }
    }
}

/// Structural equality. Numeric keys compare by value across `Int`/`Num`,
/// and `NaN == NaN`, so deduplication in filter sets is total.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Str(a), Key::Str(b)) => a == b,
            (Key::List(a), Key::List(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y || (x.is_nan() && y.is_nan()),
                _ => false,
            },
        }
    }
}

impl Eq for Key {}

impl From<i64> for Key {
    fn from(n: i64) -> Self { Key::Int(n) }
}

impl From<f64> for Key {
    fn from(x: f64) -> Self { Key::Num(x) }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self { Key::Str(s.to_string()) }
}

impl From<String> for Key {
    fn from(s: String) -> Self { Key::Str(s) }
}

impl From<Vec<Key>> for Key {
    fn from(parts: Vec<Key>) -> Self { Key::List(parts) }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Num(x) => write!(f, "{x}"),
            Key::Str(s) => write!(f, "{s}"),
            Key::List(parts) => {
                write!(f, "[")?;
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{p}")?;
                }
                write!(f, "]")
            }
        }
    }
}
