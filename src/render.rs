//! Terminal rendering of engine output with `comfy-table`.

use analytics::MetricsReport;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{DataKind, FilterState};
use dataset::DatasetRepository;
use diagnostics::DiagnosticEvent;
use shaping::{BarKind, HeatmapData, MatrixData, SeriesData, TableRow, WaterfallBar};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn number(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

fn percent(value: f64) -> Cell {
    Cell::new(format!("{value:.2}%")).set_alignment(CellAlignment::Right)
}

pub fn summary(repo: &DatasetRepository, state: &FilterState, kept: usize, anomalies: &[DiagnosticEvent]) {
    let metadata = repo.metadata();
    let (base, forecast) = metadata.analysis_years();
    let mut table = new_table();
    table.set_header(vec!["Property", "Value"]);
    table.add_row(vec!["Market".to_string(), metadata.market_name.clone()]);
    table.add_row(vec!["Analysis years".to_string(), format!("{base} - {forecast}")]);
    table.add_row(vec!["Value records".to_string(), repo.records(DataKind::Value).len().to_string()]);
    table.add_row(vec!["Volume records".to_string(), repo.records(DataKind::Volume).len().to_string()]);
    table.add_row(vec![
        "Segment types".to_string(),
        repo.segment_types().collect::<Vec<_>>().join(", "),
    ]);
    table.add_row(vec![
        "Year range".to_string(),
        format!("{} - {}", state.year_range.start(), state.year_range.end()),
    ]);
    table.add_row(vec!["Geographies selected".to_string(), state.selected_geography_count().to_string()]);
    table.add_row(vec!["Segments selected".to_string(), state.selected_segment_count().to_string()]);
    table.add_row(vec!["Records kept".to_string(), kept.to_string()]);
    table.add_row(vec!["Dimension anomalies".to_string(), anomalies.len().to_string()]);
    println!("{table}");

    for event in anomalies {
        println!("  ! {event}");
    }
}

pub fn series(data: &SeriesData) {
    let mut table = new_table();
    let mut header = vec!["Year".to_string()];
    header.extend(data.keys.iter().cloned());
    table.set_header(header);
    for point in &data.points {
        let mut row = vec![Cell::new(point.year)];
        row.extend(data.keys.iter().map(|key| number(point.value(key))));
        table.add_row(row);
    }
    if data.stacked {
        println!("(stacked by secondary dimension)");
    }
    println!("{table}");
}

pub fn heatmap(data: &HeatmapData) {
    let mut table = new_table();
    table.set_header(vec!["Geography", "Segment", "Value"]);
    for cell in &data.cells {
        table.add_row(vec![
            Cell::new(&cell.geography),
            Cell::new(&cell.segment),
            Cell::new(cell.display_value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("Heatmap for {} (min {:.2}, max {:.2})", data.year, data.min_value, data.max_value);
    println!("{table}");
}

pub fn matrix(data: &MatrixData) {
    let mut table = new_table();
    let mut header = vec!["Geography".to_string()];
    header.extend(data.segments.iter().cloned());
    table.set_header(header);
    for (geography, values) in data.geographies.iter().zip(&data.values) {
        let mut row = vec![Cell::new(geography)];
        row.extend(values.iter().map(|value| number(*value)));
        table.add_row(row);
    }
    println!("Matrix for {} (min {:.2}, max {:.2})", data.year, data.min_value, data.max_value);
    println!("{table}");
}

pub fn table(rows: &[TableRow]) {
    let mut table = new_table();
    table.set_header(vec!["Geography", "Segment type", "Segment", "Start", "End", "CAGR", "Growth"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.geography),
            Cell::new(&row.segment_type),
            Cell::new(&row.segment),
            number(row.base_value),
            number(row.end_value),
            row.cagr.map_or_else(|| Cell::new("-"), percent),
            percent(row.growth_pct),
        ]);
    }
    println!("{table}");
}

pub fn waterfall(bars: &[WaterfallBar]) {
    let mut table = new_table();
    table.set_header(vec!["Step", "Kind", "Value"]);
    for bar in bars {
        let kind = match bar.kind {
            BarKind::Start => "start",
            BarKind::Increase => "+",
            BarKind::Decrease => "-",
            BarKind::End => "end",
        };
        table.add_row(vec![Cell::new(&bar.label), Cell::new(kind), number(bar.value)]);
    }
    println!("{table}");
}

pub fn metrics(report: &MetricsReport) {
    println!(
        "{} / {} ({} -> {}), geography base total {:.2}",
        report.geography,
        report.segment_type,
        report.base_year,
        report.forecast_year,
        report.geography_base_total
    );
    let mut table = new_table();
    table.set_header(vec![
        "Segment", "Members", "Base", "Forecast", "Growth", "CAGR", "Share", "Growth idx", "Share idx",
        "Opportunity",
    ]);
    for segment in &report.segments {
        table.add_row(vec![
            Cell::new(&segment.segment),
            Cell::new(segment.members).set_alignment(CellAlignment::Right),
            number(segment.base_value),
            number(segment.forecast_value),
            number(segment.absolute_growth),
            percent(segment.cagr_pct),
            percent(segment.market_share_pct),
            number(segment.growth_index),
            number(segment.share_index),
            number(segment.opportunity_index),
        ]);
    }
    println!("{table}");

    for excluded in &report.excluded {
        println!("  excluded {}: {}", excluded.segment, excluded.reason);
    }
}
