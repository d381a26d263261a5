// File: crates/trellis-core/src/bus.rs
// Summary: Coalescing event bus; debounces per-scope actions against an injected clock.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Time source seam. Production uses [`SystemClock`]; tests inject a manual
/// clock so debounce behavior is deterministic.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time via `Instant::now`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

type Action = Box<dyn FnOnce()>;

struct Pending {
    deadline: Instant,
    action: Action,
}

/// Per-scope debouncing scheduler.
///
/// A `notify` for a scope that already has a pending entry replaces both the
/// deadline and the action (supersession): intermediate actions for a scope
/// are dropped, never queued or merged. Distinct scopes are fully
/// independent. The bus owns all timer bookkeeping; hosts drive it by
/// calling [`EventBus::fire_due`] from their event loop.
pub struct EventBus {
    clock: Rc<dyn Clock>,
    pending: RefCell<BTreeMap<String, Pending>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock))
    }

    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self { clock, pending: RefCell::new(BTreeMap::new()) }
    }

    /// Current instant on the bus clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Schedule `action` to run once `delay` has elapsed with no further
    /// notify for `scope`. A later notify on the same scope supersedes this
    /// one entirely.
    pub fn notify(&self, scope: &str, delay: Duration, action: impl FnOnce() + 'static) {
        let deadline = self.clock.now() + delay;
        let mut pending = self.pending.borrow_mut();
        if pending.contains_key(scope) {
            debug!(scope, "superseding pending notification");
        }
        pending.insert(scope.to_string(), Pending { deadline, action: Box::new(action) });
    }

    /// Cancel the pending notification for `scope`, if any. Returns whether
    /// one was pending.
    pub fn cancel(&self, scope: &str) -> bool {
        let removed = self.pending.borrow_mut().remove(scope).is_some();
        if removed {
            debug!(scope, "cancelled pending notification");
        }
        removed
    }

    pub fn has_pending(&self, scope: &str) -> bool {
        self.pending.borrow().contains_key(scope)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Earliest deadline across all scopes, if anything is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.borrow().values().map(|p| p.deadline).min()
    }

    /// Run every action whose deadline has passed. Actions run outside the
    /// internal borrow, so they may notify again (re-entrant). Returns the
    /// number of actions fired.
    pub fn fire_due(&self) -> usize {
        let now = self.clock.now();
        self.fire_where(|p| p.deadline <= now)
    }

    /// Run everything pending regardless of deadline. Returns the number of
    /// actions fired.
    pub fn flush(&self) -> usize {
        self.fire_where(|_| true)
    }

    fn fire_where(&self, due: impl Fn(&Pending) -> bool) -> usize {
        let actions: Vec<(String, Action)> = {
            let mut pending = self.pending.borrow_mut();
            let scopes: Vec<String> = pending
                .iter()
                .filter(|(_, p)| due(p))
                .map(|(scope, _)| scope.clone())
                .collect();
            scopes
                .into_iter()
                .filter_map(|scope| pending.remove(&scope).map(|p| (scope, p.action)))
                .collect()
        };
        let count = actions.len();
        for (scope, action) in actions {
            debug!(scope = %scope, "firing coalesced notification");
            action();
        }
        count
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
