// File: crates/trellis-core/src/caps.rs
// Summary: Capability specs shared by chart types (top-N cap, coordinate grid).

use crate::data::Bin;
use crate::key::Key;

/// Cap capability: keep the `cap` largest bins by value and fold the
/// remainder into a single catch-all bin.
#[derive(Clone, Debug)]
pub struct CapSpec {
    pub cap: usize,
    pub others_label: String,
}

impl CapSpec {
    pub fn new(cap: usize) -> Self {
        Self { cap, others_label: "Others".to_string() }
    }

    pub fn with_others_label(mut self, label: impl Into<String>) -> Self {
        self.others_label = label.into();
        self
    }

    /// Apply the cap. The kept bins come back in descending value order;
    /// the fold bin, when present, is last.
    pub fn apply(&self, mut bins: Vec<Bin>) -> Vec<Bin> {
        bins.sort_by(|a, b| b.value.total_cmp(&a.value));
        if bins.len() <= self.cap {
            return bins;
        }
        let rest = bins.split_off(self.cap);
        let folded: f64 = rest.iter().map(|b| b.value).sum();
        bins.push(Bin { key: Key::Str(self.others_label.clone()), value: folded });
        bins
    }
}

/// Coordinate-grid capability: the x/y domains a brushable chart plots
/// against. Domains are data-space, not pixels.
#[derive(Clone, Copy, Debug)]
pub struct GridSpec {
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
}

impl GridSpec {
    pub fn new(x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        Self { x_domain, y_domain }
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}
