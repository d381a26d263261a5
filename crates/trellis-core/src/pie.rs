// File: crates/trellis-core/src/pie.rs
// Summary: Pie chart type; slice clicks toggle exact-match filters.

use std::cell::RefCell;
use std::rc::Rc;

use crate::caps::CapSpec;
use crate::chart::{ChartBase, ChartId, ChartNode, Frame, Renderer};
use crate::context::ChartContext;
use crate::data::{FilterTarget, GroupSource};
use crate::error::ChartError;
use crate::filter::Filter;
use crate::key::Key;

/// A pie chart over one grouped dimension. Each slice is a bin; clicking a
/// slice toggles an exact filter on the slice's key.
pub struct PieChart {
    base: ChartBase,
    cap: Option<CapSpec>,
    renderer: Box<dyn Renderer>,
}

impl PieChart {
    pub fn new(
        ctx: &Rc<ChartContext>,
        group: &str,
        dimension: Rc<dyn FilterTarget>,
        source: Rc<dyn GroupSource>,
        renderer: Box<dyn Renderer>,
    ) -> Rc<RefCell<Self>> {
        let base = ChartBase::new(ctx, group, dimension, source);
        let id = base.id();
        let chart = Rc::new(RefCell::new(Self { base, cap: None, renderer }));
        let node: Rc<RefCell<dyn ChartNode>> = chart.clone();
        ctx.registry().register(id, group, Rc::downgrade(&node));
        chart
    }

    /// Cap slices to the top N, folding the rest into an "Others" slice.
    pub fn set_cap(&mut self, cap: CapSpec) {
        self.cap = Some(cap);
    }

    /// Slice click: toggle an exact filter on `key`.
    pub fn on_click(&mut self, key: impl Into<Key>) {
        self.base.filter(Some(Filter::exact(key)));
    }

    pub fn base(&self) -> &ChartBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn frame(&self) -> Frame {
        let bins = match &self.cap {
            Some(cap) => cap.apply(self.base.data_all()),
            None => self.base.data_all(),
        };
        self.base.frame_from(bins)
    }
}

impl ChartNode for PieChart {
    fn id(&self) -> ChartId {
        self.base.id()
    }

    fn group(&self) -> &str {
        self.base.group_name()
    }

    fn render(&mut self) -> Result<(), ChartError> {
        let frame = self.frame();
        self.renderer.render(&frame)
    }

    fn redraw(&mut self) -> Result<(), ChartError> {
        let frame = self.frame();
        self.renderer.redraw(&frame)
    }
}
