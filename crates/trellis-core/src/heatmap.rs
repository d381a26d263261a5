// File: crates/trellis-core/src/heatmap.rs
// Summary: Heatmap chart type; cell and axis clicks toggle hierarchical filters.

use std::cell::RefCell;
use std::rc::Rc;

use crate::chart::{ChartBase, ChartId, ChartNode, Frame, Renderer};
use crate::context::ChartContext;
use crate::data::{FilterTarget, GroupSource};
use crate::error::ChartError;
use crate::filter::Filter;
use crate::key::Key;

/// A heatmap over a dimension keyed by two-part `Key::List([x, y])` cells.
///
/// Cell clicks toggle a full two-part hierarchy filter; axis clicks toggle a
/// one-part prefix filter, which selects the whole column through prefix
/// matching.
pub struct HeatMap {
    base: ChartBase,
    renderer: Box<dyn Renderer>,
}

impl HeatMap {
    pub fn new(
        ctx: &Rc<ChartContext>,
        group: &str,
        dimension: Rc<dyn FilterTarget>,
        source: Rc<dyn GroupSource>,
        renderer: Box<dyn Renderer>,
    ) -> Rc<RefCell<Self>> {
        let base = ChartBase::new(ctx, group, dimension, source);
        let id = base.id();
        let chart = Rc::new(RefCell::new(Self { base, renderer }));
        let node: Rc<RefCell<dyn ChartNode>> = chart.clone();
        ctx.registry().register(id, group, Rc::downgrade(&node));
        chart
    }

    /// Cell click: toggle the cell's exact `[x, y]` filter.
    pub fn on_cell_click(&mut self, x: impl Into<Key>, y: impl Into<Key>) {
        self.base.filter(Some(Filter::hierarchy(vec![x.into(), y.into()])));
    }

    /// X-axis click: toggle the `[x]` prefix filter covering every cell in
    /// that column.
    pub fn on_column_click(&mut self, x: impl Into<Key>) {
        self.base.filter(Some(Filter::hierarchy(vec![x.into()])));
    }

    pub fn base(&self) -> &ChartBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn frame(&self) -> Frame {
        self.base.frame_from(self.base.data_all())
    }
}

impl ChartNode for HeatMap {
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
