// File: crates/trellis-core/tests/coordination.rs
// Purpose: Cross-chart coordination scenarios — grouped redraws, toggle UI semantics,
// failure isolation, and disposal.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use trellis_core::{
    BubbleChart, CapSpec, ChartContext, ChartError, Clock, ContextOptions, DataTable, Filter,
    Frame, HeatMap, Key, PieChart, Renderer, ScatterPlot, Selection,
};

struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    fn new() -> Rc<Self> {
        Rc::new(Self { now: Cell::new(Instant::now()) })
    }

    fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

fn test_context(clock: &Rc<ManualClock>) -> Rc<ChartContext> {
    ChartContext::with_options(ContextOptions {
        redraw_delay: Duration::from_millis(40),
        clock: clock.clone(),
    })
}

/// Renderer that counts passes and remembers the last frame it saw.
#[derive(Default)]
struct CountingRenderer {
    renders: Rc<Cell<usize>>,
    redraws: Rc<Cell<usize>>,
    last_frame: Rc<RefCell<Option<Frame>>>,
}

impl Renderer for CountingRenderer {
    fn render(&mut self, frame: &Frame) -> Result<(), ChartError> {
        self.renders.set(self.renders.get() + 1);
        *self.last_frame.borrow_mut() = Some(frame.clone());
        Ok(())
    }

    fn redraw(&mut self, frame: &Frame) -> Result<(), ChartError> {
        self.redraws.set(self.redraws.get() + 1);
        *self.last_frame.borrow_mut() = Some(frame.clone());
        Ok(())
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&mut self, _frame: &Frame) -> Result<(), ChartError> {
        Err(ChartError::Renderer("boom".into()))
    }

    fn redraw(&mut self, _frame: &Frame) -> Result<(), ChartError> {
        Err(ChartError::Renderer("boom".into()))
    }
}

struct Sale {
    fruit: &'static str,
    region: &'static str,
    qty: f64,
}

fn sample_table() -> DataTable<Sale> {
    DataTable::new(vec![
        Sale { fruit: "apple", region: "north", qty: 3.0 },
        Sale { fruit: "apple", region: "south", qty: 1.0 },
        Sale { fruit: "pear", region: "north", qty: 2.0 },
        Sale { fruit: "plum", region: "south", qty: 5.0 },
        Sale { fruit: "plum", region: "north", qty: 1.0 },
    ])
}

#[test]
fn click_toggles_selection_state() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();
    let dim = table.dimension(|s| Key::from(s.fruit));
    let group = dim.group_sum(|s| s.qty);

    let pie = PieChart::new(
        &ctx,
        "g1",
        Rc::new(dim),
        Rc::new(group),
        Box::new(CountingRenderer::default()),
    );

    assert!(!pie.borrow().base().has_any_filter());

    pie.borrow_mut().on_click("apple");
    {
        let pie = pie.borrow();
        assert_eq!(pie.base().filters(), &[Filter::exact("apple")]);
        assert!(pie.base().has_filter(&Filter::exact("apple")));
        assert_eq!(pie.base().selection_of(&Key::from("apple")), Selection::Selected);
        assert_eq!(pie.base().selection_of(&Key::from("pear")), Selection::Deselected);
    }

    pie.borrow_mut().on_click("apple");
    {
        let pie = pie.borrow();
        assert!(pie.base().filters().is_empty());
        assert!(!pie.base().has_filter(&Filter::exact("apple")));
        assert_eq!(pie.base().selection_of(&Key::from("apple")), Selection::Neutral);
    }
}

#[test]
fn one_click_redraws_the_whole_group_once() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();

    let fruit_dim = table.dimension(|s| Key::from(s.fruit));
    let fruit_group = fruit_dim.group_sum(|s| s.qty);
    let region_dim = table.dimension(|s| Key::from(s.region));
    let region_group = region_dim.group_sum(|s| s.qty);

    let r1 = CountingRenderer::default();
    let r2 = CountingRenderer::default();
    let (redraws1, redraws2) = (r1.redraws.clone(), r2.redraws.clone());
    let frame2 = r2.last_frame.clone();

    let pie1 = PieChart::new(&ctx, "g1", Rc::new(fruit_dim), Rc::new(fruit_group), Box::new(r1));
    let _pie2 = PieChart::new(&ctx, "g1", Rc::new(region_dim), Rc::new(region_group), Box::new(r2));

    // A burst of clicks on chart 1 inside the debounce window...
    pie1.borrow_mut().on_click("apple");
    pie1.borrow_mut().on_click("pear");
    clock.advance(Duration::from_millis(40));
    let fired = ctx.pump();

    // ...collapses to exactly one redraw pass for the whole group.
    assert_eq!(fired, 1);
    assert_eq!(redraws1.get(), 1);
    assert_eq!(redraws2.get(), 1);

    // Chart 2's derived data reflects chart 1's final filter state:
    // apple + pear leaves north 3+2 and south 1.
    let frame = frame2.borrow();
    let frame = frame.as_ref().expect("chart 2 saw a frame");
    let north = frame.items.iter().find(|i| i.key == Key::from("north")).unwrap();
    let south = frame.items.iter().find(|i| i.key == Key::from("south")).unwrap();
    assert_eq!(north.value, 5.0);
    assert_eq!(south.value, 1.0);
}

#[test]
fn filter_none_clears_everything() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();
    let dim = table.dimension(|s| Key::from(s.fruit));
    let group = dim.group_sum(|s| s.qty);

    let pie = PieChart::new(
        &ctx,
        "g1",
        Rc::new(dim),
        Rc::new(group),
        Box::new(CountingRenderer::default()),
    );

    pie.borrow_mut().on_click("apple");
    pie.borrow_mut().on_click("pear");
    pie.borrow_mut().on_click("plum");
    assert_eq!(pie.borrow().base().filters().len(), 3);

    pie.borrow_mut().base_mut().filter(None);
    assert!(!pie.borrow().base().has_any_filter());
}

#[test]
fn own_dimension_is_excluded_from_own_group() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();

    let fruit_dim = table.dimension(|s| Key::from(s.fruit));
    let fruit_group = fruit_dim.group_sum(|s| s.qty);
    let region_dim = table.dimension(|s| Key::from(s.region));
    let region_group = region_dim.group_sum(|s| s.qty);

    let r1 = CountingRenderer::default();
    let frame1 = r1.last_frame.clone();
    let pie1 = PieChart::new(
        &ctx,
        "g1",
        Rc::new(fruit_dim),
        Rc::new(fruit_group),
        Box::new(r1),
    );
    let r2 = CountingRenderer::default();
    let frame2 = r2.last_frame.clone();
    let _pie2 = PieChart::new(&ctx, "g1", Rc::new(region_dim), Rc::new(region_group), Box::new(r2));

    pie1.borrow_mut().on_click("plum");
    clock.advance(Duration::from_millis(40));
    ctx.pump();

    // Chart 1 still shows its full domain (selection narrows siblings, not
    // itself)...
    let f1 = frame1.borrow();
    let f1 = f1.as_ref().unwrap();
    assert_eq!(f1.items.len(), 3);
    let apple = f1.items.iter().find(|i| i.key == Key::from("apple")).unwrap();
    assert_eq!(apple.value, 4.0);
    assert_eq!(apple.selection, Selection::Deselected);

    // ...while chart 2 sees only plum rows.
    let f2 = frame2.borrow();
    let f2 = f2.as_ref().unwrap();
    let north = f2.items.iter().find(|i| i.key == Key::from("north")).unwrap();
    let south = f2.items.iter().find(|i| i.key == Key::from("south")).unwrap();
    assert_eq!(north.value, 1.0);
    assert_eq!(south.value, 5.0);
}

#[test]
fn failing_chart_does_not_stop_its_siblings() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();

    let dim1 = table.dimension(|s| Key::from(s.fruit));
    let group1 = dim1.group_sum(|s| s.qty);
    let dim2 = table.dimension(|s| Key::from(s.region));
    let group2 = dim2.group_sum(|s| s.qty);

    let bad = PieChart::new(&ctx, "g1", Rc::new(dim1), Rc::new(group1), Box::new(FailingRenderer));
    let ok = CountingRenderer::default();
    let redraws = ok.redraws.clone();
    let _good = PieChart::new(&ctx, "g1", Rc::new(dim2), Rc::new(group2), Box::new(ok));

    let err = ctx.redraw_group("g1").expect_err("batch reports the failure");
    assert_eq!(err.failures.len(), 1);
    assert_eq!(err.failures[0].0, bad.borrow().base().id());
    assert_eq!(redraws.get(), 1, "the healthy sibling still redrew");
}

#[test]
fn disposal_deregisters_and_cancels_a_lone_pending_redraw() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();
    let dim = table.dimension(|s| Key::from(s.fruit));
    let group = dim.group_sum(|s| s.qty);

    let pie = PieChart::new(
        &ctx,
        "g1",
        Rc::new(dim),
        Rc::new(group),
        Box::new(CountingRenderer::default()),
    );
    assert_eq!(ctx.registry().group_len("g1"), 1);

    pie.borrow_mut().on_click("apple");
    assert!(ctx.bus().has_pending("g1"));

    drop(pie);
    assert_eq!(ctx.registry().group_len("g1"), 0);
    assert!(!ctx.bus().has_pending("g1"), "last member out cancels the timer");

    clock.advance(Duration::from_millis(40));
    assert_eq!(ctx.pump(), 0);
}

#[test]
fn unknown_group_and_double_deregister_are_noops() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);

    assert!(ctx.redraw_group("nope").is_ok());
    assert!(ctx.render_group("nope").is_ok());

    let table = sample_table();
    let dim = table.dimension(|s| Key::from(s.fruit));
    let group = dim.group_sum(|s| s.qty);
    let pie = PieChart::new(
        &ctx,
        "g1",
        Rc::new(dim),
        Rc::new(group),
        Box::new(CountingRenderer::default()),
    );
    let id = pie.borrow().base().id();
    assert!(ctx.registry().deregister(id));
    assert!(!ctx.registry().deregister(id), "second deregister is a no-op");
}

#[test]
fn default_group_with_zero_delay_fires_on_the_next_pump() {
    // System clock + zero delay: the coalesced entry is due immediately.
    let ctx = ChartContext::with_redraw_delay(Duration::ZERO);
    let table = sample_table();
    let dim = table.dimension(|s| Key::from(s.fruit));
    let group = dim.group_sum(|s| s.qty);

    let r = CountingRenderer::default();
    let redraws = r.redraws.clone();
    let pie = PieChart::new(
        &ctx,
        trellis_core::DEFAULT_GROUP,
        Rc::new(dim),
        Rc::new(group),
        Box::new(r),
    );

    let id = pie.borrow().base().id();
    assert_eq!(ctx.registry().group_of(id).as_deref(), Some(trellis_core::DEFAULT_GROUP));

    pie.borrow_mut().on_click("apple");
    assert_eq!(ctx.pump(), 1);
    assert_eq!(redraws.get(), 1);
}

#[test]
fn scatter_brush_replaces_and_clears() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = DataTable::new(vec![(1.0, 1.0), (2.0, 2.0), (3.5, 3.5)]);
    let dim = table.dimension(|&(x, y): &(f64, f64)| Key::pair(x, y));
    let group = dim.group_count();

    let scatter = ScatterPlot::new(
        &ctx,
        "g1",
        Rc::new(dim),
        Rc::new(group),
        Box::new(CountingRenderer::default()),
    );

    scatter.borrow_mut().on_brush(Some(((1.0, 1.0), (3.0, 3.0))));
    {
        let s = scatter.borrow();
        assert_eq!(s.base().filters(), &[Filter::ranged_2d((1.0, 1.0), (3.0, 3.0))]);
        assert_eq!(s.base().selection_of(&Key::pair(2.0, 2.0)), Selection::Selected);
        assert_eq!(s.base().selection_of(&Key::pair(3.5, 3.5)), Selection::Deselected);
    }

    // A second brush replaces, never accumulates.
    scatter.borrow_mut().on_brush(Some(((2.0, 2.0), (4.0, 4.0))));
    assert_eq!(scatter.borrow().base().filters().len(), 1);

    scatter.borrow_mut().on_brush(None);
    assert!(!scatter.borrow().base().has_any_filter());
    assert!(scatter.borrow().brush_extent().is_none());
}

#[test]
fn heatmap_column_click_selects_the_whole_column() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();
    let cell_dim = table.dimension(|s| Key::pair(s.fruit, s.region));
    let cell_group = cell_dim.group_sum(|s| s.qty);

    let heat = HeatMap::new(
        &ctx,
        "g1",
        Rc::new(cell_dim),
        Rc::new(cell_group),
        Box::new(CountingRenderer::default()),
    );

    heat.borrow_mut().on_column_click("apple");
    {
        let h = heat.borrow();
        assert_eq!(h.base().selection_of(&Key::pair("apple", "north")), Selection::Selected);
        assert_eq!(h.base().selection_of(&Key::pair("apple", "south")), Selection::Selected);
        assert_eq!(h.base().selection_of(&Key::pair("pear", "north")), Selection::Deselected);
    }

    // Toggling the same column off restores neutrality.
    heat.borrow_mut().on_column_click("apple");
    assert_eq!(
        heat.borrow().base().selection_of(&Key::pair("apple", "north")),
        Selection::Neutral
    );
}

#[test]
fn bubble_click_narrows_siblings_in_another_group_not_at_all() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();

    let fruit_dim = table.dimension(|s| Key::from(s.fruit));
    let fruit_group = fruit_dim.group_sum(|s| s.qty);
    let region_dim = table.dimension(|s| Key::from(s.region));
    let region_group = region_dim.group_sum(|s| s.qty);

    let r1 = CountingRenderer::default();
    let redraws_g1 = r1.redraws.clone();
    let bubble = BubbleChart::new(&ctx, "g1", Rc::new(fruit_dim), Rc::new(fruit_group), Box::new(r1));

    let r2 = CountingRenderer::default();
    let redraws_g2 = r2.redraws.clone();
    let _other = PieChart::new(&ctx, "g2", Rc::new(region_dim), Rc::new(region_group), Box::new(r2));

    bubble.borrow_mut().on_click("plum");
    clock.advance(Duration::from_millis(40));
    ctx.pump();

    assert_eq!(redraws_g1.get(), 1, "own group redraws");
    assert_eq!(redraws_g2.get(), 0, "other groups are untouched");
    assert!(bubble.borrow().base().has_filter(&Filter::exact("plum")));
}

#[test]
fn cap_folds_the_tail_into_others() {
    let clock = ManualClock::new();
    let ctx = test_context(&clock);
    let table = sample_table();
    let dim = table.dimension(|s| Key::from(s.fruit));
    let group = dim.group_sum(|s| s.qty);

    let r = CountingRenderer::default();
    let frame = r.last_frame.clone();
    let pie = PieChart::new(&ctx, "g1", Rc::new(dim), Rc::new(group), Box::new(r));
    pie.borrow_mut().set_cap(CapSpec::new(2));

    ctx.render_group("g1").expect("render succeeds");
    let f = frame.borrow();
    let f = f.as_ref().unwrap();
    assert_eq!(f.items.len(), 3, "two kept slices plus the fold");
    // plum 6.0 and apple 4.0 survive; pear 2.0 folds.
    assert_eq!(f.items[0].key, Key::from("plum"));
    assert_eq!(f.items[1].key, Key::from("apple"));
    assert_eq!(f.items[2].key, Key::from("Others"));
    assert_eq!(f.items[2].value, 2.0);
}
