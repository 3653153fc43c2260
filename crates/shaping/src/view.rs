use crate::heatmap::{HeatmapData, heatmap};
use crate::matrix::{MatrixData, matrix};
use crate::series::{SeriesData, grouped_series};
use crate::table::{TableRow, table_rows};
use crate::waterfall::{WaterfallBar, waterfall};
use core_types::{DataRecord, FilterState};
use serde::Serialize;

/// The visualization a caller wants data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Bar,
    Line,
    /// A single-year heatmap; `None` uses the last year of the range.
    Heatmap { year: Option<i32> },
    Matrix,
    Table,
    Waterfall,
}

/// View-ready output, one variant per output shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum ViewData {
    Series(SeriesData),
    Heatmap(HeatmapData),
    Matrix(MatrixData),
    Table(Vec<TableRow>),
    Waterfall(Vec<WaterfallBar>),
}

/// Reshapes already-filtered records for one view kind.
pub fn shape(records: &[&DataRecord], state: &FilterState, kind: ViewKind) -> ViewData {
    let range = state.year_range;
    match kind {
        ViewKind::Bar | ViewKind::Line => ViewData::Series(grouped_series(records, state)),
        ViewKind::Heatmap { year } => ViewData::Heatmap(heatmap(records, year.unwrap_or(range.end()))),
        ViewKind::Matrix => ViewData::Matrix(matrix(records, range)),
        ViewKind::Table => ViewData::Table(table_rows(records, range)),
        ViewKind::Waterfall => {
            ViewData::Waterfall(waterfall(records, state.view_mode.primary_dimension(), range))
        }
    }
}
