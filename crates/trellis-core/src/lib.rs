// File: crates/trellis-core/src/lib.rs
// Summary: Core library entry point; exports the filter coordination API and chart types.

pub mod bubble;
pub mod bus;
pub mod caps;
pub mod chart;
pub mod context;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod heatmap;
pub mod key;
pub mod pie;
pub mod registry;
pub mod scatter;
pub mod store;

pub use bubble::BubbleChart;
pub use bus::{Clock, EventBus, SystemClock};
pub use caps::{CapSpec, GridSpec};
pub use chart::{ChartBase, ChartId, ChartNode, Frame, FrameItem, NullRenderer, Renderer, Selection};
pub use context::{ChartContext, ContextOptions, DEFAULT_GROUP, DEFAULT_REDRAW_DELAY};
pub use data::{Bin, DataTable, Dimension, FilterTarget, GroupAgg, GroupSource, Predicate};
pub use error::{BatchError, ChartError};
pub use filter::Filter;
pub use heatmap::HeatMap;
pub use key::Key;
pub use pie::PieChart;
pub use registry::ChartRegistry;
pub use scatter::ScatterPlot;
pub use store::FilterSet;
