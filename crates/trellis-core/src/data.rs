// File: crates/trellis-core/src/data.rs
// Summary: Shared dimensional data source: table, dimensions, grouped aggregates.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::key::Key;

/// Predicate form a dimension accepts from the filter layer.
#[derive(Clone)]
pub enum Predicate {
    Exact(Key),
    /// Half-open `[lo, hi)`.
    Range(f64, f64),
    Func(Rc<dyn Fn(&Key) -> bool>),
}

impl Predicate {
    pub fn test(&self, key: &Key) -> bool {
        match self {
            Predicate::Exact(want) => want == key,
            Predicate::Range(lo, hi) => match key.as_f64() {
                Some(k) => *lo <= k && k < *hi,
                None => false,
            },
            Predicate::Func(f) => f(key),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Exact(key) => f.debug_tuple("Exact").field(key).finish(),
            Predicate::Range(lo, hi) => f.debug_tuple("Range").field(lo).field(hi).finish(),
            Predicate::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// One aggregated key/value record produced by a group.
#[derive(Clone, Debug, PartialEq)]
pub struct Bin {
    pub key: Key,
    pub value: f64,
}

/// Seam trait: where a chart pushes its lowered filter predicate.
pub trait FilterTarget {
    fn apply(&self, predicate: Option<Predicate>);
}

/// Seam trait: where a chart reads its aggregated records from.
pub trait GroupSource {
    /// Every bin, in first-appearance row order.
    fn all(&self) -> Vec<Bin>;
    /// The `n` largest bins by value, descending.
    fn top(&self, n: usize) -> Vec<Bin>;
}

struct DimSlot<R> {
    key_fn: Rc<dyn Fn(&R) -> Key>,
    predicate: Option<Predicate>,
}

struct TableInner<R> {
    rows: RefCell<Vec<R>>,
    dims: RefCell<Vec<DimSlot<R>>>,
}

/// In-memory row store shared by reference across every chart that consumes
/// one of its dimensions. Single-threaded by construction (`Rc`/`RefCell`).
pub struct DataTable<R> {
    inner: Rc<TableInner<R>>,
}

impl<R> Clone for DataTable<R> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<R> DataTable<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            inner: Rc::new(TableInner {
                rows: RefCell::new(rows),
                dims: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.rows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.rows.borrow().is_empty()
    }

    pub fn extend(&self, rows: impl IntoIterator<Item = R>) {
        self.inner.rows.borrow_mut().extend(rows);
    }

    /// Derive a dimension keyed by `key_fn`. The dimension carries its own
    /// predicate slot; its groups observe every *other* dimension's
    /// predicate but never their own.
    pub fn dimension(&self, key_fn: impl Fn(&R) -> Key + 'static) -> Dimension<R> {
        let key_fn: Rc<dyn Fn(&R) -> Key> = Rc::new(key_fn);
        let mut dims = self.inner.dims.borrow_mut();
        dims.push(DimSlot { key_fn: Rc::clone(&key_fn), predicate: None });
        Dimension {
            table: Rc::clone(&self.inner),
            slot: dims.len() - 1,
            key_fn,
        }
    }
}

/// A keyed projection of the table with an externally-settable predicate.
pub struct Dimension<R> {
    table: Rc<TableInner<R>>,
    slot: usize,
    key_fn: Rc<dyn Fn(&R) -> Key>,
}

impl<R> Clone for Dimension<R> {
    fn clone(&self) -> Self {
        Self {
            table: Rc::clone(&self.table),
            slot: self.slot,
            key_fn: Rc::clone(&self.key_fn),
        }
    }
}

impl<R> Dimension<R> {
    /// Aggregate rows by this dimension's key, summing `value_fn` per key.
    pub fn group_sum(&self, value_fn: impl Fn(&R) -> f64 + 'static) -> GroupAgg<R> {
        GroupAgg {
            table: Rc::clone(&self.table),
            slot: self.slot,
            key_fn: Rc::clone(&self.key_fn),
            value_fn: Rc::new(value_fn),
        }
    }

    /// Aggregate rows by this dimension's key, counting rows per key.
    pub fn group_count(&self) -> GroupAgg<R> {
        self.group_sum(|_| 1.0)
    }

    /// Key of a single row under this dimension.
    pub fn key_of(&self, row: &R) -> Key {
        (self.key_fn)(row)
    }
}

impl<R> FilterTarget for Dimension<R> {
    fn apply(&self, predicate: Option<Predicate>) {
        self.table.dims.borrow_mut()[self.slot].predicate = predicate;
    }
}

/// Aggregated key/value view over one dimension.
pub struct GroupAgg<R> {
    table: Rc<TableInner<R>>,
    slot: usize,
    key_fn: Rc<dyn Fn(&R) -> Key>,
    value_fn: Rc<dyn Fn(&R) -> f64>,
}

impl<R> Clone for GroupAgg<R> {
    fn clone(&self) -> Self {
        Self {
            table: Rc::clone(&self.table),
            slot: self.slot,
            key_fn: Rc::clone(&self.key_fn),
            value_fn: Rc::clone(&self.value_fn),
        }
    }
}

impl<R> GroupAgg<R> {
    fn bins(&self) -> Vec<Bin> {
        let rows = self.table.rows.borrow();
        let dims = self.table.dims.borrow();
        let mut bins: Vec<Bin> = Vec::new();
        for row in rows.iter() {
            // Crossfilter exclusion: skip this group's own dimension when
            // testing predicates, so a chart's own selection still shows
            // its full domain.
            let visible = dims.iter().enumerate().all(|(i, dim)| {
                if i == self.slot {
                    return true;
                }
                match &dim.predicate {
                    Some(p) => p.test(&(dim.key_fn)(row)),
                    None => true,
                }
            });
            if !visible {
                continue;
            }
            let key = (self.key_fn)(row);
            let value = (self.value_fn)(row);
            match bins.iter_mut().find(|b| b.key == key) {
                Some(bin) => bin.value += value,
                None => bins.push(Bin { key, value }),
            }
        }
        bins
    }
}

impl<R> GroupSource for GroupAgg<R> {
    fn all(&self) -> Vec<Bin> {
        self.bins()
    }

    fn top(&self, n: usize) -> Vec<Bin> {
        let mut bins = self.bins();
        bins.sort_by(|a, b| b.value.total_cmp(&a.value));
        bins.truncate(n);
        bins
    }
}
