// File: crates/trellis-core/src/bubble.rs
// Summary: Bubble chart type; bubble clicks toggle exact filters, capped to top N.

use std::cell::RefCell;
use std::rc::Rc;

use crate::caps::CapSpec;
use crate::chart::{ChartBase, ChartId, ChartNode, Frame, Renderer};
use crate::context::ChartContext;
use crate::data::{FilterTarget, GroupSource};
use crate::error::ChartError;
use crate::filter::Filter;
use crate::key::Key;

/// A bubble chart over one grouped dimension; the bin value drives bubble
/// radius, so capping to the top N keeps the plot legible. Clicking a bubble
/// toggles an exact filter on its key.
pub struct BubbleChart {
    base: ChartBase,
    cap: CapSpec,
    renderer: Box<dyn Renderer>,
}

impl BubbleChart {
    const DEFAULT_CAP: usize = 10;

    pub fn new(
        ctx: &Rc<ChartContext>,
        group: &str,
        dimension: Rc<dyn FilterTarget>,
        source: Rc<dyn GroupSource>,
        renderer: Box<dyn Renderer>,
    ) -> Rc<RefCell<Self>> {
        let base = ChartBase::new(ctx, group, dimension, source);
        let id = base.id();
        let chart = Rc::new(RefCell::new(Self {
            base,
            cap: CapSpec::new(Self::DEFAULT_CAP),
            renderer,
        }));
        let node: Rc<RefCell<dyn ChartNode>> = chart.clone();
        ctx.registry().register(id, group, Rc::downgrade(&node));
        chart
    }

    pub fn set_cap(&mut self, cap: CapSpec) {
        self.cap = cap;
    }

    /// Bubble click: toggle an exact filter on `key`.
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
        self.base.frame_from(self.cap.apply(self.base.data_all()))
    }
}

impl ChartNode for BubbleChart {
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
