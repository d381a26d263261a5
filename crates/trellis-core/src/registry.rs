// File: crates/trellis-core/src/registry.rs
// Summary: Chart registry mapping group names to weakly-held chart members.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::chart::{ChartId, ChartNode};

struct Entry {
    id: ChartId,
    chart: Weak<RefCell<dyn ChartNode>>,
}

/// Explicitly constructed registry of chart groups.
///
/// Membership is weak: the registry never owns chart lifetime, and dropped
/// charts are pruned whenever a group is read. Always injected via the
/// context, never a process global, so tests get isolated registries.
#[derive(Default)]
pub struct ChartRegistry {
    groups: RefCell<BTreeMap<String, Vec<Entry>>>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `chart` to `group`, creating the group on first use. A chart id
    /// holds at most one membership; re-registering first deregisters any
    /// prior one.
    pub fn register(&self, id: ChartId, group: &str, chart: Weak<RefCell<dyn ChartNode>>) {
        self.deregister(id);
        debug!(%id, group, "registering chart");
        self.groups
            .borrow_mut()
            .entry(group.to_string())
            .or_default()
            .push(Entry { id, chart });
    }

    /// Remove `id` from whatever group holds it; no-op if absent. Returns
    /// whether a membership was removed.
    pub fn deregister(&self, id: ChartId) -> bool {
        let mut groups = self.groups.borrow_mut();
        for (group, entries) in groups.iter_mut() {
            if let Some(pos) = entries.iter().position(|e| e.id == id) {
                entries.remove(pos);
                debug!(%id, group = group.as_str(), "deregistered chart");
                return true;
            }
        }
        false
    }

    /// Name of the group holding `id`, if registered.
    pub fn group_of(&self, id: ChartId) -> Option<String> {
        self.groups
            .borrow()
            .iter()
            .find(|(_, entries)| entries.iter().any(|e| e.id == id))
            .map(|(group, _)| group.clone())
    }

    /// Live members of `group` in registration order, reflecting every
    /// registration and deregistration up to this call. Dropped charts are
    /// pruned as a side effect.
    pub fn charts_in(&self, group: &str) -> Vec<(ChartId, Rc<RefCell<dyn ChartNode>>)> {
        let mut groups = self.groups.borrow_mut();
        let Some(entries) = groups.get_mut(group) else {
            return Vec::new();
        };
        entries.retain(|e| e.chart.strong_count() > 0);
        entries
            .iter()
            .filter_map(|e| e.chart.upgrade().map(|chart| (e.id, chart)))
            .collect()
    }

    /// Number of live charts in `group`.
    pub fn group_len(&self, group: &str) -> usize {
        self.charts_in(group).len()
    }

    /// Every known group name, in lexical order.
    pub fn all_groups(&self) -> Vec<String> {
        self.groups.borrow().keys().cloned().collect()
    }
}
