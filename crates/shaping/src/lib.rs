//! # market-lens shaping engine
//!
//! Turns a filtered record set plus a view configuration into the structures the
//! rendering collaborators draw: grouped/stacked series for bar and line charts,
//! heatmap cells, a dense matrix grid, table rows and ordered waterfall bars.
//!
//! Every function iterates the selected years inclusively and reads absent years as
//! `0.0`. Empty input produces empty (never missing) output with zero extrema.

pub mod grouping;
pub mod heatmap;
pub mod matrix;
pub mod series;
pub mod table;
pub mod view;
pub mod waterfall;

pub use grouping::{KEY_SEPARATOR, composite_key, requires_stacking, split_key};
pub use heatmap::{HeatmapCell, HeatmapData, heatmap};
pub use matrix::{MatrixData, matrix};
pub use series::{SeriesData, SeriesPoint, grouped_series};
pub use table::{TableRow, YearValue, percent_growth, table_rows};
pub use view::{ViewData, ViewKind, shape};
pub use waterfall::{BarKind, WaterfallBar, waterfall};
