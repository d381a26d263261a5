// File: crates/trellis-core/src/scatter.rs
// Summary: Scatter plot chart type; brushing replaces a ranged-2D filter.

use std::cell::RefCell;
use std::rc::Rc;

use crate::caps::GridSpec;
use crate::chart::{ChartBase, ChartId, ChartNode, Frame, Renderer};
use crate::context::ChartContext;
use crate::data::{FilterTarget, GroupSource};
use crate::error::ChartError;
use crate::filter::Filter;

/// A scatter plot over a dimension keyed by `(x, y)` point keys.
///
/// Brushing does not toggle: a new extent replaces the active filter
/// wholesale, and clearing the brush clears it.
pub struct ScatterPlot {
    base: ChartBase,
    grid: GridSpec,
    brush: Option<((f64, f64), (f64, f64))>,
    renderer: Box<dyn Renderer>,
}

impl ScatterPlot {
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
            grid: GridSpec::default(),
            brush: None,
            renderer,
        }));
        let node: Rc<RefCell<dyn ChartNode>> = chart.clone();
        ctx.registry().register(id, group, Rc::downgrade(&node));
        chart
    }

    pub fn set_grid(&mut self, grid: GridSpec) {
        self.grid = grid;
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Brush gesture: `Some((corner0, corner1))` replaces the active filters
    /// with one half-open ranged-2D filter; `None` clears the brush and all
    /// filters.
    pub fn on_brush(&mut self, extent: Option<((f64, f64), (f64, f64))>) {
        self.brush = extent;
        match extent {
            Some((c0, c1)) => self.base.replace_filters(vec![Filter::ranged_2d(c0, c1)]),
            None => self.base.filter(None),
        }
    }

    pub fn brush_extent(&self) -> Option<((f64, f64), (f64, f64))> {
        self.brush
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

impl ChartNode for ScatterPlot {
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
