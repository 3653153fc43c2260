use crate::enums::{DataKind, GeographyLevel, SegmentLevel};
use crate::series::TimeSeries;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Parent -> children adjacency map of a segment tree.
pub type Adjacency = BTreeMap<String, Vec<String>>;

/// Ancestor names of a record's segment, one slot per level.
///
/// `level_1` holds the segment type itself. Inapplicable levels hold `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentHierarchy {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub level_1: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub level_2: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub level_3: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub level_4: String,
}

impl SegmentHierarchy {
    /// The name stored at `level` (1-4), or `None` for an empty slot or a level out of range.
    pub fn level(&self, level: u8) -> Option<&str> {
        let name = match level {
            1 => &self.level_1,
            2 => &self.level_2,
            3 => &self.level_3,
            4 => &self.level_4,
            _ => return None,
        };
        if name.is_empty() { None } else { Some(name.as_str()) }
    }
}

/// One (geography, segment type, segment) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub geography: String,
    #[serde(default)]
    pub geography_level: GeographyLevel,
    #[serde(default)]
    pub parent_geography: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub segment_type: String,
    pub segment: String,
    #[serde(default)]
    pub segment_level: SegmentLevel,
    #[serde(default)]
    pub segment_hierarchy: SegmentHierarchy,
    #[serde(default)]
    pub time_series: TimeSeries,
    /// Precomputed compound annual growth rate in percent, if the source provided one.
    #[serde(default)]
    pub cagr: Option<f64>,
    #[serde(default)]
    pub market_share: Option<f64>,
}

impl DataRecord {
    /// Convenience constructor for a leaf record with no stored hierarchy.
    pub fn new(
        geography: impl Into<String>,
        segment_type: impl Into<String>,
        segment: impl Into<String>,
        time_series: TimeSeries,
    ) -> Self {
        let segment_type = segment_type.into();
        Self {
            geography: geography.into(),
            geography_level: GeographyLevel::Unknown,
            parent_geography: None,
            segment_hierarchy: SegmentHierarchy {
                level_1: segment_type.clone(),
                ..SegmentHierarchy::default()
            },
            segment_type,
            segment: segment.into(),
            segment_level: SegmentLevel::Leaf,
            time_series,
            cagr: None,
            market_share: None,
        }
    }

    pub fn value_at(&self, year: i32) -> f64 {
        self.time_series.value_at(year)
    }
}

/// The global -> region -> country tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographyDimension {
    /// Holds the single root name; stored as a list to match the source document.
    #[serde(default)]
    pub global: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub countries: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub all_geographies: Vec<String>,
}

impl GeographyDimension {
    pub fn root(&self) -> Option<&str> {
        self.global.first().map(String::as_str)
    }
}

/// The items of one segment type, with or without a parent -> children map.
///
/// A missing or unrecognised `type` degrades instead of failing the document: the
/// entry is hierarchical when it carries a non-empty map, flat otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", from = "RawSegmentDimension")]
pub enum SegmentDimension {
    Flat { items: Vec<String> },
    Hierarchical { items: Vec<String>, hierarchy: Adjacency },
}

/// The wire shape of a segment dimension, before its `type` is interpreted.
#[derive(Deserialize)]
struct RawSegmentDimension {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    items: Option<Vec<String>>,
    #[serde(default)]
    hierarchy: Option<Adjacency>,
}

impl From<RawSegmentDimension> for SegmentDimension {
    fn from(raw: RawSegmentDimension) -> Self {
        let items = raw.items.unwrap_or_default();
        let hierarchy = raw.hierarchy.unwrap_or_default();
        match raw.kind.as_deref() {
            Some("flat") => SegmentDimension::Flat { items },
            Some("hierarchical") => SegmentDimension::Hierarchical { items, hierarchy },
            _ if hierarchy.is_empty() => SegmentDimension::Flat { items },
            _ => SegmentDimension::Hierarchical { items, hierarchy },
        }
    }
}

impl SegmentDimension {
    pub fn items(&self) -> &[String] {
        match self {
            SegmentDimension::Flat { items } | SegmentDimension::Hierarchical { items, .. } => items,
        }
    }

    /// The adjacency map, if this dimension has one.
    pub fn hierarchy(&self) -> Option<&Adjacency> {
        match self {
            SegmentDimension::Flat { .. } => None,
            SegmentDimension::Hierarchical { hierarchy, .. } => Some(hierarchy),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub geographies: GeographyDimension,
    #[serde(default)]
    pub segments: BTreeMap<String, SegmentDimension>,
}

/// Descriptive facts about the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub market_name: String,
    pub market_type: String,
    pub industry: String,
    pub currency: String,
    pub value_unit: String,
    pub volume_unit: String,
    pub has_value: bool,
    pub has_volume: bool,
    pub years: Vec<i32>,
    pub start_year: Option<i32>,
    pub base_year: Option<i32>,
    pub forecast_year: Option<i32>,
    pub historical_years: Vec<i32>,
    pub forecast_years: Vec<i32>,
}

pub const DEFAULT_BASE_YEAR: i32 = 2024;
pub const DEFAULT_FORECAST_YEAR: i32 = 2032;

impl Metadata {
    /// Default (base, forecast) years for growth metrics.
    ///
    /// Explicit `base_year`/`forecast_year` entries win. Otherwise base is 2024 when the
    /// dataset covers it, else the latest year before it, else the first year; forecast
    /// is the last year.
    pub fn analysis_years(&self) -> (i32, i32) {
        let (base, forecast) = self.derived_years();
        (self.base_year.unwrap_or(base), self.forecast_year.unwrap_or(forecast))
    }

    fn derived_years(&self) -> (i32, i32) {
        let mut years = self.years.clone();
        years.sort_unstable();
        years.dedup();
        let (Some(&first), Some(&last)) = (years.first(), years.last()) else {
            return (DEFAULT_BASE_YEAR, DEFAULT_FORECAST_YEAR);
        };
        let base = if years.contains(&DEFAULT_BASE_YEAR) {
            DEFAULT_BASE_YEAR
        } else {
            years
                .iter()
                .copied()
                .filter(|year| *year <= DEFAULT_BASE_YEAR)
                .max()
                .unwrap_or(first)
        };
        (base, last)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub geography_segment_matrix: Vec<DataRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSets {
    #[serde(default)]
    pub value: RecordSet,
    #[serde(default)]
    pub volume: RecordSet,
}

/// The whole immutable dataset document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub data: DataSets,
}

impl Dataset {
    pub fn records(&self, kind: DataKind) -> &[DataRecord] {
        match kind {
            DataKind::Value => &self.data.value.geography_segment_matrix,
            DataKind::Volume => &self.data.volume.geography_segment_matrix,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
