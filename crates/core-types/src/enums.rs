use serde::{Deserialize, Serialize};

/// Position of a geography within the global -> region -> country tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeographyLevel {
    Global,
    Region,
    Country,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Whether a record describes an aggregate segment or a terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SegmentLevel {
    Parent,
    #[default]
    #[serde(other)]
    Leaf,
}

/// Selects which record collection of the dataset is analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DataKind {
    #[default]
    Value,
    Volume,
}

/// Governs which dimension becomes the primary grouping key for chart output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ViewMode {
    #[default]
    SegmentMode,
    GeographyMode,
    Matrix,
}

/// One of the two dimensions a record can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Geography,
    Segment,
}

impl ViewMode {
    /// The dimension that owns the bars of a chart in this mode.
    ///
    /// Matrix views lay geographies out as rows, so geography leads there too.
    pub fn primary_dimension(&self) -> Dimension {
        match self {
            ViewMode::SegmentMode => Dimension::Segment,
            ViewMode::GeographyMode | ViewMode::Matrix => Dimension::Geography,
        }
    }
}

impl Dimension {
    /// Returns the other dimension.
    pub fn opposite(&self) -> Self {
        match self {
            Dimension::Geography => Dimension::Segment,
            Dimension::Segment => Dimension::Geography,
        }
    }
}
