use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

/// Why a segment unit was left out of a metrics comparison set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    NonPositiveBase,
    NonPositiveForecast,
    NonFiniteShare,
    NonFiniteCagr,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExclusionReason::NonPositiveBase => "base value is not positive",
            ExclusionReason::NonPositiveForecast => "forecast value is not positive",
            ExclusionReason::NonFiniteShare => "market share is not finite",
            ExclusionReason::NonFiniteCagr => "CAGR is not finite",
        };
        f.write_str(text)
    }
}

/// Everything the engine reports to its observability collaborator.
///
/// Serialized adjacently tagged, e.g.
/// `{"type": "CycleDetected", "payload": {"node": "A", "revisited": "B"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DiagnosticEvent {
    /// Expansion reached a node already on the current path.
    CycleDetected { node: String, revisited: String },
    /// A node was reached twice from one root through different branches.
    SharedDescendant { root: String, node: String },
    /// A child listed under more than one parent of one segment type.
    MultipleParents { segment_type: String, child: String, parents: Vec<String> },
    /// A segment no top-level unit reaches, e.g. one caught in a parent cycle.
    /// It is measured on its own.
    UnrootedSegment { segment_type: String, segment: String },
    /// A country listed under more than one region.
    CountryInMultipleRegions { country: String, regions: Vec<String> },
    /// Counts from one filter pass.
    FilterApplied { input: usize, output: usize, advanced: bool, suppressed_by_parent: usize },
    /// A segment unit left out of index normalization.
    UnitExcluded { segment: String, reason: ExclusionReason },
}

impl DiagnosticEvent {
    pub fn level(&self) -> LogLevel {
        match self {
            DiagnosticEvent::CycleDetected { .. }
            | DiagnosticEvent::SharedDescendant { .. }
            | DiagnosticEvent::MultipleParents { .. }
            | DiagnosticEvent::UnrootedSegment { .. }
            | DiagnosticEvent::CountryInMultipleRegions { .. } => LogLevel::Warn,
            DiagnosticEvent::UnitExcluded { .. } => LogLevel::Info,
            DiagnosticEvent::FilterApplied { .. } => LogLevel::Debug,
        }
    }

    /// True for events that describe malformed dimension data.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DiagnosticEvent::CycleDetected { .. }
                | DiagnosticEvent::SharedDescendant { .. }
                | DiagnosticEvent::MultipleParents { .. }
                | DiagnosticEvent::UnrootedSegment { .. }
                | DiagnosticEvent::CountryInMultipleRegions { .. }
        )
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::CycleDetected { node, revisited } => {
                write!(f, "cycle in hierarchy: '{node}' leads back to '{revisited}'")
            }
            DiagnosticEvent::SharedDescendant { root, node } => {
                write!(f, "'{node}' is reachable more than once below '{root}'")
            }
            DiagnosticEvent::MultipleParents { segment_type, child, parents } => write!(
                f,
                "'{child}' has {} parents in '{segment_type}': {}",
                parents.len(),
                parents.join(", ")
            ),
            DiagnosticEvent::UnrootedSegment { segment_type, segment } => {
                write!(f, "'{segment}' in '{segment_type}' has no top-level ancestor; measured standalone")
            }
            DiagnosticEvent::CountryInMultipleRegions { country, regions } => {
                write!(f, "'{country}' is listed under regions {}", regions.join(", "))
            }
            DiagnosticEvent::FilterApplied { input, output, advanced, suppressed_by_parent } => {
                write!(
                    f,
                    "filtered {input} -> {output} records (advanced: {advanced}, suppressed by parent: {suppressed_by_parent})"
                )
            }
            DiagnosticEvent::UnitExcluded { segment, reason } => {
                write!(f, "'{segment}' excluded from comparison: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_adjacently_tagged() {
        let event = DiagnosticEvent::CycleDetected { node: "A".into(), revisited: "B".into() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CycleDetected");
        assert_eq!(json["payload"]["revisited"], "B");
    }

    #[test]
    fn structural_events_warn() {
        let event = DiagnosticEvent::MultipleParents {
            segment_type: "T".into(),
            child: "C".into(),
            parents: vec!["A".into(), "B".into()],
        };
        assert!(event.is_structural());
        assert_eq!(event.level(), LogLevel::Warn);
        assert_eq!(event.to_string(), "'C' has 2 parents in 'T': A, B");
    }
}
