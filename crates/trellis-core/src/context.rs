// File: crates/trellis-core/src/context.rs
// Summary: ChartContext wiring the registry, event bus, and redraw delay together.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::error;

use crate::bus::{Clock, EventBus, SystemClock};
use crate::chart::ChartId;
use crate::dispatch;
use crate::error::BatchError;
use crate::registry::ChartRegistry;

/// Default quiescence window before a coalesced group redraw fires.
pub const DEFAULT_REDRAW_DELAY: Duration = Duration::from_millis(40);

/// Name used when a chart is constructed without an explicit group.
pub const DEFAULT_GROUP: &str = "default";

/// Construction options for a [`ChartContext`].
pub struct ContextOptions {
    pub redraw_delay: Duration,
    pub clock: Rc<dyn Clock>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self { redraw_delay: DEFAULT_REDRAW_DELAY, clock: Rc::new(SystemClock) }
    }
}

/// Shared coordination state for a family of charts: the chart registry, the
/// coalescing event bus, and the configured redraw delay. Charts hold an
/// `Rc<ChartContext>`; tests create one context per case for isolation.
pub struct ChartContext {
    registry: ChartRegistry,
    bus: EventBus,
    redraw_delay: Duration,
    next_id: Cell<u64>,
}

impl ChartContext {
    pub fn new() -> Rc<Self> {
        Self::with_options(ContextOptions::default())
    }

    pub fn with_options(opts: ContextOptions) -> Rc<Self> {
        Rc::new(Self {
            registry: ChartRegistry::new(),
            bus: EventBus::with_clock(opts.clock),
            redraw_delay: opts.redraw_delay,
            next_id: Cell::new(0),
        })
    }

    pub fn with_redraw_delay(redraw_delay: Duration) -> Rc<Self> {
        Self::with_options(ContextOptions { redraw_delay, ..ContextOptions::default() })
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn redraw_delay(&self) -> Duration {
        self.redraw_delay
    }

    pub(crate) fn next_chart_id(&self) -> ChartId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ChartId::new(id)
    }

    /// Schedule a coalesced redraw of `group` after the configured delay.
    /// Bursts of triggers within the window collapse into one redraw pass
    /// observing the final filter state. Failures in the deferred batch are
    /// logged, not propagated (the triggering call has long returned).
    pub fn trigger_redraw(self: &Rc<Self>, group: &str) {
        let weak = Rc::downgrade(self);
        let group_name = group.to_string();
        self.bus.notify(group, self.redraw_delay, move || {
            if let Some(ctx) = weak.upgrade() {
                if let Err(err) = dispatch::redraw_group(&ctx.registry, &group_name) {
                    error!(group = group_name.as_str(), %err, "coalesced redraw reported failures");
                }
            }
        });
    }

    /// Immediately redraw `group`, propagating any per-chart failures.
    pub fn redraw_group(&self, group: &str) -> Result<(), BatchError> {
        dispatch::redraw_group(&self.registry, group)
    }

    /// Immediately rebuild `group`, propagating any per-chart failures.
    pub fn render_group(&self, group: &str) -> Result<(), BatchError> {
        dispatch::render_group(&self.registry, group)
    }

    pub fn redraw_all(&self) -> Result<(), BatchError> {
        dispatch::redraw_all(&self.registry)
    }

    pub fn render_all(&self) -> Result<(), BatchError> {
        dispatch::render_all(&self.registry)
    }

    /// Drive the bus once: fire every notification whose deadline has
    /// passed. Hosts call this from their event loop. Returns the number of
    /// notifications fired.
    pub fn pump(&self) -> usize {
        self.bus.fire_due()
    }

    /// Sleep-and-pump until nothing is pending. Only meaningful with the
    /// system clock; manual test clocks should call [`ChartContext::pump`]
    /// after advancing time instead.
    pub fn pump_until_idle(&self) {
        while let Some(deadline) = self.bus.next_deadline() {
            let now = self.bus.now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            self.bus.fire_due();
        }
    }
}
