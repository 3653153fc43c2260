use crate::enums::{DataKind, ViewMode};
use crate::error::CoreError;
use crate::structs::{DEFAULT_BASE_YEAR, DEFAULT_FORECAST_YEAR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// An inclusive `[start, end]` year span with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Every year from start to end, inclusive.
    pub fn years(&self) -> impl Iterator<Item = i32> + Clone {
        self.start..=self.end
    }

    /// The representative year used by single-year views: the floored midpoint.
    pub fn midpoint(&self) -> i32 {
        // Widened so extreme bounds cannot overflow; the result lies within the range.
        (i64::from(self.start) + i64::from(self.end)).div_euclid(2) as i32
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self { start: DEFAULT_BASE_YEAR, end: DEFAULT_FORECAST_YEAR }
    }
}

impl TryFrom<(i32, i32)> for YearRange {
    type Error = CoreError;

    fn try_from((start, end): (i32, i32)) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

impl From<YearRange> for (i32, i32) {
    fn from(range: YearRange) -> Self {
        (range.start, range.end)
    }
}

/// One explicitly selected `(segment type, segment)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentSelection {
    pub segment_type: String,
    pub segment: String,
}

impl SegmentSelection {
    pub fn new(segment_type: impl Into<String>, segment: impl Into<String>) -> Self {
        Self { segment_type: segment_type.into(), segment: segment.into() }
    }
}

impl FromStr for SegmentSelection {
    type Err = CoreError;

    /// Parses `TYPE=SEGMENT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((segment_type, segment))
                if !segment_type.trim().is_empty() && !segment.trim().is_empty() =>
            {
                Ok(Self::new(segment_type.trim(), segment.trim()))
            }
            _ => Err(CoreError::InvalidInput(
                "segment selection".to_string(),
                format!("expected TYPE=SEGMENT, got '{s}'"),
            )),
        }
    }
}

/// Cross-type segment comparison: a list of explicit (type, segment) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSegmentSelection {
    pub selections: Vec<SegmentSelection>,
}

impl AdvancedSegmentSelection {
    pub fn new(selections: Vec<SegmentSelection>) -> Self {
        Self { selections }
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn contains(&self, segment_type: &str, segment: &str) -> bool {
        self.selections
            .iter()
            .any(|s| s.segment_type == segment_type && s.segment == segment)
    }

    /// Selected segment names belonging to one segment type.
    pub fn segments_of_type<'a>(&'a self, segment_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.selections
            .iter()
            .filter(move |s| s.segment_type == segment_type)
            .map(|s| s.segment.as_str())
    }
}

/// The user's current selection. The only mutable entity of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub geographies: BTreeSet<String>,
    #[serde(default)]
    pub segments: BTreeSet<String>,
    #[serde(default)]
    pub advanced_segments: Option<AdvancedSegmentSelection>,
    /// Segment type for the single-type selection path; `None` accepts every type.
    #[serde(default)]
    pub segment_type: Option<String>,
    #[serde(default)]
    pub year_range: YearRange,
    #[serde(default)]
    pub data_kind: DataKind,
    #[serde(default)]
    pub view_mode: ViewMode,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            geographies: BTreeSet::new(),
            segments: BTreeSet::new(),
            advanced_segments: None,
            segment_type: None,
            year_range: YearRange::default(),
            data_kind: DataKind::default(),
            view_mode: ViewMode::default(),
        }
    }
}

impl FilterState {
    /// The advanced selection, only when it actually selects something.
    pub fn active_advanced(&self) -> Option<&AdvancedSegmentSelection> {
        self.advanced_segments.as_ref().filter(|adv| !adv.is_empty())
    }

    /// Number of segments the user picked, whichever selection path is active.
    pub fn selected_segment_count(&self) -> usize {
        match self.active_advanced() {
            Some(adv) => adv.len(),
            None => self.segments.len(),
        }
    }

    pub fn selected_geography_count(&self) -> usize {
        self.geographies.len()
    }

    /// Applies a partial update field by field.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(geographies) = update.geographies {
            self.geographies = geographies;
        }
        if let Some(segments) = update.segments {
            self.segments = segments;
        }
        if let Some(advanced) = update.advanced_segments {
            self.advanced_segments = advanced;
        }
        if let Some(segment_type) = update.segment_type {
            self.segment_type = segment_type;
        }
        if let Some(year_range) = update.year_range {
            self.year_range = year_range;
        }
        if let Some(data_kind) = update.data_kind {
            self.data_kind = data_kind;
        }
        if let Some(view_mode) = update.view_mode {
            self.view_mode = view_mode;
        }
    }
}

/// A partial [`FilterState`]. `None` leaves a field untouched; the nested options
/// on `advanced_segments` and `segment_type` allow clearing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterUpdate {
    pub geographies: Option<BTreeSet<String>>,
    pub segments: Option<BTreeSet<String>>,
    pub advanced_segments: Option<Option<AdvancedSegmentSelection>>,
    pub segment_type: Option<Option<String>>,
    pub year_range: Option<YearRange>,
    pub data_kind: Option<DataKind>,
    pub view_mode: Option<ViewMode>,
}
