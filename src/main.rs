use analytics::{AnalysisParams, MetricsEngine};
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use configuration::{Config, init_tracing, load_config};
use core_types::{
    AdvancedSegmentSelection, DataKind, DataRecord, FilterState, FilterUpdate, SegmentSelection,
    ViewMode, YearRange,
};
use dataset::DatasetRepository;
use diagnostics::{DiagnosticEvent, MemorySink, Tee, TracingSink};
use filter::FilterEngine;
use hierarchy::GeographyResolver;
use shaping::{ViewData, ViewKind, shape};
use std::collections::BTreeSet;
use std::path::PathBuf;

mod render;

/// The main entry point for the market-lens analysis tool.
fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    // Held until exit so the file writer flushes.
    let _log_guard = init_tracing(&config.logging)?;

    let path = cli.dataset.clone().unwrap_or_else(|| config.dataset.path.clone());
    let repo = DatasetRepository::open(&path)
        .with_context(|| format!("failed to load dataset {}", path.display()))?;

    // Anomalies are logged as they are found and kept for the summary.
    let anomalies = MemorySink::new();
    repo.validate_dimensions(&Tee::new(&TracingSink, &anomalies));

    let app = App { config, repo, json: cli.json };

    // Execute the appropriate command
    match cli.command {
        Commands::Summary(args) => app.summary(&args, &anomalies.drain()),
        Commands::Series(args) => app.view(&args, ViewKind::Line),
        Commands::Heatmap(args) => app.view(&args.filter, ViewKind::Heatmap { year: args.year }),
        Commands::Matrix(args) => app.view(&args, ViewKind::Matrix),
        Commands::Table(args) => app.view(&args, ViewKind::Table),
        Commands::Waterfall(args) => app.view(&args, ViewKind::Waterfall),
        Commands::Metrics(args) => app.metrics(&args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Explore market sizing data by geography and segment.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file; a missing file means defaults.
    #[arg(long, global = true, default_value = "market-lens.toml")]
    config: PathBuf,

    /// Dataset document, overriding `dataset.path` from the configuration.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Print view data as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the dataset and how many records the filters keep.
    Summary(FilterArgs),
    /// Year-by-year grouped values, stacked when the view mode calls for it.
    Series(FilterArgs),
    /// Geography x segment values for one year.
    Heatmap(HeatmapArgs),
    /// Dense geography x segment grid at the middle of the year range.
    Matrix(FilterArgs),
    /// One row per record with base, end and growth.
    Table(FilterArgs),
    /// Start-to-end change broken down by the primary dimension.
    Waterfall(FilterArgs),
    /// Growth, share and opportunity metrics for one geography and segment type.
    Metrics(MetricsArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// Geography to keep; repeat for several. Omit to keep all.
    #[arg(long = "geography")]
    geographies: Vec<String>,

    /// Also keep the regions and countries below each selected geography.
    #[arg(long)]
    expand_geographies: bool,

    /// Segment to keep within the segment type; repeat for several.
    #[arg(long = "segment")]
    segments: Vec<String>,

    /// Cross-type selection as TYPE=SEGMENT; repeat for several. Overrides --segment.
    #[arg(long = "pair")]
    pairs: Vec<SegmentSelection>,

    /// Restrict single-type filtering to this segment type.
    #[arg(long)]
    segment_type: Option<String>,

    /// First year of the range; defaults to the dataset base year.
    #[arg(long)]
    from: Option<i32>,

    /// Last year of the range; defaults to the dataset forecast year.
    #[arg(long)]
    to: Option<i32>,

    /// Record collection to analyze; defaults to `dataset.data_kind`.
    #[arg(long, value_enum)]
    kind: Option<DataKind>,

    /// Which dimension leads the grouping.
    #[arg(long, value_enum)]
    mode: Option<ViewMode>,
}

#[derive(Args)]
struct HeatmapArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Year to show; defaults to the end of the range.
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Args)]
struct MetricsArgs {
    /// Geography to analyze.
    #[arg(long)]
    geography: String,

    /// Segment type whose top-level segments are compared.
    #[arg(long)]
    segment_type: String,

    /// Overrides `analysis.base_year`.
    #[arg(long)]
    base_year: Option<i32>,

    /// Overrides `analysis.forecast_year`.
    #[arg(long)]
    forecast_year: Option<i32>,

    /// Record collection to analyze; defaults to `dataset.data_kind`.
    #[arg(long, value_enum)]
    kind: Option<DataKind>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

struct App {
    config: Config,
    repo: DatasetRepository,
    json: bool,
}

impl App {
    /// Folds the command-line filters into a fresh `FilterState`.
    fn filter_state(&self, args: &FilterArgs) -> anyhow::Result<FilterState> {
        let (base, forecast) = self.repo.metadata().analysis_years();
        let year_range = YearRange::new(args.from.unwrap_or(base), args.to.unwrap_or(forecast))?;

        let mut geographies: BTreeSet<String> = args.geographies.iter().cloned().collect();
        if args.expand_geographies {
            geographies = GeographyResolver::new(self.repo.geographies()).expand_selection(&geographies);
        }
        let advanced = (!args.pairs.is_empty()).then(|| AdvancedSegmentSelection::new(args.pairs.clone()));

        let mut state = FilterState::default();
        state.merge(FilterUpdate {
            geographies: Some(geographies),
            segments: Some(args.segments.iter().cloned().collect()),
            advanced_segments: Some(advanced),
            segment_type: Some(args.segment_type.clone()),
            year_range: Some(year_range),
            data_kind: Some(args.kind.unwrap_or(self.config.dataset.data_kind)),
            view_mode: args.mode,
        });
        Ok(state)
    }

    fn filtered<'a>(&'a self, state: &FilterState) -> anyhow::Result<Vec<&'a DataRecord>> {
        let records = self.repo.require_records(state.data_kind)?;
        Ok(FilterEngine::new(&TracingSink).apply(records, state))
    }

    fn summary(&self, args: &FilterArgs, anomalies: &[DiagnosticEvent]) -> anyhow::Result<()> {
        let state = self.filter_state(args)?;
        let kept = self.filtered(&state)?.len();
        render::summary(&self.repo, &state, kept, anomalies);
        Ok(())
    }

    fn view(&self, args: &FilterArgs, kind: ViewKind) -> anyhow::Result<()> {
        let state = self.filter_state(args)?;
        let records = self.filtered(&state)?;
        if records.is_empty() {
            tracing::warn!("no records match the current filters");
        }
        let data = shape(&records, &state, kind);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&data)?);
            return Ok(());
        }
        match &data {
            ViewData::Series(series) => render::series(series),
            ViewData::Heatmap(map) => render::heatmap(map),
            ViewData::Matrix(grid) => render::matrix(grid),
            ViewData::Table(rows) => render::table(rows),
            ViewData::Waterfall(bars) => render::waterfall(bars),
        }
        Ok(())
    }

    fn metrics(&self, args: &MetricsArgs) -> anyhow::Result<()> {
        let (base_year, forecast_year) =
            self.config.analysis.resolve_years(self.repo.metadata().analysis_years());
        let params = AnalysisParams {
            base_year: args.base_year.unwrap_or(base_year),
            forecast_year: args.forecast_year.unwrap_or(forecast_year),
            max_growth_multiple: self.config.analysis.max_growth_multiple,
            max_cagr_pct: self.config.analysis.max_cagr_pct,
        };
        let engine = MetricsEngine::new(params)?;

        let dimension = self.repo.segment_dimension(&args.segment_type);
        if dimension.is_none() {
            tracing::warn!(segment_type = %args.segment_type, "segment type not declared in dimensions");
        }

        let state = FilterState {
            geographies: BTreeSet::from([args.geography.clone()]),
            data_kind: args.kind.unwrap_or(self.config.dataset.data_kind),
            ..FilterState::default()
        };
        let records = self.filtered(&state)?;
        if records.is_empty() {
            bail!("no {:?} records for geography '{}'", state.data_kind, args.geography);
        }

        let report = engine.compute(&args.geography, &args.segment_type, &records, dimension, &TracingSink);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            render::metrics(&report);
        }
        Ok(())
    }
}
