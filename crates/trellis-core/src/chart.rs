// File: crates/trellis-core/src/chart.rs
// Summary: Chart node contract, base capability (filters + wiring), and renderer seam.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::context::ChartContext;
use crate::data::{Bin, FilterTarget, GroupSource};
use crate::error::ChartError;
use crate::filter::Filter;
use crate::key::Key;
use crate::store::FilterSet;

/// Process-unique chart identifier, issued by the owning context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChartId(u64);

impl ChartId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

/// The only surface the dispatcher sees: identity plus the two draw passes.
pub trait ChartNode {
    fn id(&self) -> ChartId;
    fn group(&self) -> &str;
    /// Full (re)build: recompute derived data and rebuild the visual from
    /// scratch. Used after structural changes.
    fn render(&mut self) -> Result<(), ChartError>;
    /// Incremental update: recompute derived data and re-apply selection
    /// styling to the existing visual.
    fn redraw(&mut self) -> Result<(), ChartError>;
}

/// Visual selection state of one rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// No filter active on the chart; everything renders plainly.
    Neutral,
    Selected,
    Deselected,
}

/// One renderable element: an aggregated bin plus its selection state.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameItem {
    pub key: Key,
    pub value: f64,
    pub selection: Selection,
}

/// The view-model a chart hands to its renderer each pass.
#[derive(Clone, Debug)]
pub struct Frame {
    pub chart: ChartId,
    pub items: Vec<FrameItem>,
}

/// External rendering collaborator. The core builds frames and calls these;
/// it never draws anything itself.
pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> Result<(), ChartError>;
    fn redraw(&mut self, frame: &Frame) -> Result<(), ChartError>;
}

/// Renderer that draws nothing; useful in tests and headless setups.
#[derive(Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame) -> Result<(), ChartError> {
        Ok(())
    }

    fn redraw(&mut self, _frame: &Frame) -> Result<(), ChartError> {
        Ok(())
    }
}

/// Base capability every concrete chart embeds: identity, group membership,
/// the active filter set, and the data-source seams. Composition, not
/// inheritance — chart types hold one of these and forward.
pub struct ChartBase {
    id: ChartId,
    group: String,
    ctx: Rc<ChartContext>,
    filters: FilterSet,
    dimension: Rc<dyn FilterTarget>,
    source: Rc<dyn GroupSource>,
}

impl ChartBase {
    /// Group membership is fixed at construction. Registration into the
    /// registry happens in the concrete chart's constructor, which owns the
    /// `Rc<RefCell<dyn ChartNode>>` this base cannot see.
    pub fn new(
        ctx: &Rc<ChartContext>,
        group: &str,
        dimension: Rc<dyn FilterTarget>,
        source: Rc<dyn GroupSource>,
    ) -> Self {
        Self {
            id: ctx.next_chart_id(),
            group: group.to_string(),
            ctx: Rc::clone(ctx),
            filters: FilterSet::new(),
            dimension,
            source,
        }
    }

    pub fn id(&self) -> ChartId {
        self.id
    }

    pub fn group_name(&self) -> &str {
        &self.group
    }

    pub fn context(&self) -> &Rc<ChartContext> {
        &self.ctx
    }

    /// Filter entry point with dc-style semantics: `None` clears every
    /// filter; `Some(f)` toggles `f` (select-if-absent, deselect-if-present).
    /// Either way the lowered predicate is pushed into the dimension and a
    /// coalesced group redraw is triggered.
    pub fn filter(&mut self, filter: Option<Filter>) {
        match filter {
            None => self.filters.clear(),
            Some(f) => {
                let selected = self.filters.toggle(f);
                debug!(chart = %self.id, selected, "toggled filter");
            }
        }
        self.sync();
    }

    /// Clear all filters (alias for `filter(None)`).
    pub fn clear_filters(&mut self) {
        self.filter(None);
    }

    /// Replace the whole filter set in one step (brush semantics): no
    /// toggling against prior state, one predicate push, one redraw trigger.
    pub fn replace_filters(&mut self, filters: Vec<Filter>) {
        self.filters.replace(filters);
        self.sync();
    }

    /// True iff any filter is active.
    pub fn has_any_filter(&self) -> bool {
        !self.filters.is_empty()
    }

    /// True iff a structurally-equal filter is active.
    pub fn has_filter(&self, filter: &Filter) -> bool {
        self.filters.contains(filter)
    }

    /// Active filters in insertion order.
    pub fn filters(&self) -> &[Filter] {
        self.filters.as_slice()
    }

    /// Selection styling decision for one key: neutral when nothing is
    /// filtered, otherwise selected iff some active filter matches.
    pub fn selection_of(&self, key: &Key) -> Selection {
        if self.filters.is_empty() {
            Selection::Neutral
        } else if self.filters.matches(key) {
            Selection::Selected
        } else {
            Selection::Deselected
        }
    }

    /// All bins from the shared source, in first-appearance order.
    pub fn data_all(&self) -> Vec<Bin> {
        self.source.all()
    }

    /// Top `n` bins from the shared source by descending value.
    pub fn data_top(&self, n: usize) -> Vec<Bin> {
        self.source.top(n)
    }

    /// Build the renderer view-model from `bins`, classifying each key
    /// against the current filter set.
    pub fn frame_from(&self, bins: Vec<Bin>) -> Frame {
        let items = bins
            .into_iter()
            .map(|bin| FrameItem {
                selection: self.selection_of(&bin.key),
                key: bin.key,
                value: bin.value,
            })
            .collect();
        Frame { chart: self.id, items }
    }

    fn sync(&self) {
        self.dimension.apply(self.filters.predicate());
        self.ctx.trigger_redraw(&self.group);
    }
}

impl Drop for ChartBase {
    fn drop(&mut self) {
        self.ctx.registry().deregister(self.id);
        // Last member out cancels the group's pending coalesced redraw, so
        // a disposed group never fires into the void.
        if self.ctx.registry().group_len(&self.group) == 0 {
            self.ctx.bus().cancel(&self.group);
        }
    }
}
