use core_types::{Adjacency, SegmentHierarchy};
use diagnostics::{DiagnosticEvent, DiagnosticsSink};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::RangeInclusive;

/// Read-only queries over one parent -> children adjacency map.
///
/// Malformed input never fails a query: unknown nodes behave as standalone leaves,
/// and any cycle or shared child stops expansion at the first repeat and is reported
/// to the sink.
pub struct HierarchyResolver<'a> {
    hierarchy: &'a Adjacency,
    sink: &'a dyn DiagnosticsSink,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(hierarchy: &'a Adjacency, sink: &'a dyn DiagnosticsSink) -> Self {
        Self { hierarchy, sink }
    }

    /// Direct children of `node`; empty for leaves and unknown names.
    pub fn children_of(&self, node: &str) -> &'a [String] {
        self.hierarchy.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when `node` has at least one child.
    pub fn is_parent(&self, node: &str) -> bool {
        !self.children_of(node).is_empty()
    }

    /// Every name that appears as somebody's child.
    pub fn child_names(&self) -> BTreeSet<&'a str> {
        self.hierarchy.values().flatten().map(String::as_str).collect()
    }

    /// Top-level names, sorted.
    ///
    /// A root is either a parent that is never a child, or an item of `items`
    /// that is neither parent nor child.
    pub fn roots_of(&self, items: &[String]) -> Vec<String> {
        let children = self.child_names();
        let mut roots: BTreeSet<&str> = self
            .hierarchy
            .iter()
            .filter(|(parent, kids)| !kids.is_empty() && !children.contains(parent.as_str()))
            .map(|(parent, _)| parent.as_str())
            .collect();
        roots.extend(
            items
                .iter()
                .map(String::as_str)
                .filter(|item| !self.is_parent(item) && !children.contains(item)),
        );
        roots.into_iter().map(str::to_string).collect()
    }

    /// All nodes reachable below `node`, depth-first, each at most once.
    ///
    /// A child that is already on the current path is a cycle; a child already
    /// reached through another branch is a shared descendant. Both are reported
    /// and not expanded again.
    pub fn descendants_of(&self, node: &str) -> Vec<String> {
        let mut path = vec![node];
        let mut visited = HashSet::from([node]);
        let mut out = Vec::new();
        self.expand(node, node, &mut path, &mut visited, &mut out);
        out
    }

    fn expand<'n>(
        &self,
        root: &'n str,
        node: &'n str,
        path: &mut Vec<&'n str>,
        visited: &mut HashSet<&'n str>,
        out: &mut Vec<String>,
    ) where
        'a: 'n,
    {
        for child in self.children_of(node) {
            let child = child.as_str();
            if path.contains(&child) {
                self.sink.record(DiagnosticEvent::CycleDetected {
                    node: node.to_string(),
                    revisited: child.to_string(),
                });
                continue;
            }
            if !visited.insert(child) {
                self.sink.record(DiagnosticEvent::SharedDescendant {
                    root: root.to_string(),
                    node: child.to_string(),
                });
                continue;
            }
            out.push(child.to_string());
            path.push(child);
            self.expand(root, child, path, visited, out);
            path.pop();
        }
    }

    /// `node` together with all of its descendants: the set aggregated as one unit.
    pub fn unit_of(&self, node: &str) -> BTreeSet<String> {
        let mut unit: BTreeSet<String> = self.descendants_of(node).into_iter().collect();
        unit.insert(node.to_string());
        unit
    }

    /// Every parent listing `node` as a child, sorted. More than one is an anomaly.
    pub fn parents_of(&self, node: &str) -> Vec<&'a str> {
        self.hierarchy
            .iter()
            .filter(|(_, kids)| kids.iter().any(|kid| kid == node))
            .map(|(parent, _)| parent.as_str())
            .collect()
    }

    /// Ancestors of `node`, nearest first, following the first parent at each step.
    pub fn ancestors_of(&self, node: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([node.to_string()]);
        let mut current = node.to_string();
        while let Some(parent) = self.parents_of(&current).first().copied() {
            if !seen.insert(parent.to_string()) {
                self.sink.record(DiagnosticEvent::CycleDetected {
                    node: current,
                    revisited: parent.to_string(),
                });
                break;
            }
            ancestors.push(parent.to_string());
            current = parent.to_string();
        }
        ancestors
    }

    /// Reports every child with several parents and every cycle in the map.
    ///
    /// Returns the number of anomalies found.
    pub fn validate(&self, segment_type: &str) -> usize {
        let mut anomalies = 0;

        let mut parents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (parent, kids) in self.hierarchy {
            for kid in kids {
                parents.entry(kid.as_str()).or_default().insert(parent.as_str());
            }
        }
        for (child, owners) in parents.iter().filter(|(_, owners)| owners.len() > 1) {
            anomalies += 1;
            self.sink.record(DiagnosticEvent::MultipleParents {
                segment_type: segment_type.to_string(),
                child: child.to_string(),
                parents: owners.iter().map(|p| p.to_string()).collect(),
            });
        }

        // Three-colour DFS: a child that is still in progress closes a cycle.
        let mut done: HashSet<&str> = HashSet::new();
        let mut in_progress: HashSet<&str> = HashSet::new();
        for start in self.hierarchy.keys() {
            anomalies += self.find_cycles(start, &mut in_progress, &mut done);
        }

        if anomalies > 0 {
            tracing::warn!(segment_type, anomalies, "segment hierarchy failed validation");
        }
        anomalies
    }

    fn find_cycles(
        &self,
        node: &'a str,
        in_progress: &mut HashSet<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> usize {
        if done.contains(node) {
            return 0;
        }
        in_progress.insert(node);
        let mut cycles = 0;
        for child in self.children_of(node) {
            let child = child.as_str();
            if in_progress.contains(child) {
                cycles += 1;
                self.sink.record(DiagnosticEvent::CycleDetected {
                    node: node.to_string(),
                    revisited: child.to_string(),
                });
            } else {
                cycles += self.find_cycles(child, in_progress, done);
            }
        }
        in_progress.remove(node);
        done.insert(node);
        cycles
    }
}

/// True if `candidate` is stored at one of `levels` of a record's ancestry.
///
/// Level 1 holds the segment type name and is skipped even when `levels` includes it.
pub fn stored_ancestor_within(
    hierarchy: &SegmentHierarchy,
    candidate: &str,
    levels: RangeInclusive<u8>,
) -> bool {
    levels
        .filter(|level| *level >= 2)
        .any(|level| hierarchy.level(level) == Some(candidate))
}

/// True if `candidate` is stored as one of the record's ancestors (levels 2-4).
pub fn is_ancestor_of(hierarchy: &SegmentHierarchy, candidate: &str) -> bool {
    stored_ancestor_within(hierarchy, candidate, 2..=4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::{MemorySink, NullSink};

    fn adjacency(pairs: &[(&str, &[&str])]) -> Adjacency {
        pairs
            .iter()
            .map(|(parent, kids)| (parent.to_string(), kids.iter().map(|k| k.to_string()).collect()))
            .collect()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn roots_are_sorted_parents_and_standalone_items() {
        let map = adjacency(&[
            ("Whole Spices", &["Pepper", "Cardamom"]),
            ("Blends", &["Garam Masala", "Curry Powder"]),
            ("Curry Powder", &["Madras Curry"]),
            ("Empty", &[]),
        ]);
        let items = names(&["Salt", "Pepper", "Madras Curry", "Empty", "Blends"]);
        let resolver = HierarchyResolver::new(&map, &NullSink);
        assert_eq!(resolver.roots_of(&items), names(&["Blends", "Empty", "Salt", "Whole Spices"]));
    }

    #[test]
    fn descendants_expand_depth_first() {
        let map = adjacency(&[
            ("Blends", &["Curry Powder", "Garam Masala"]),
            ("Curry Powder", &["Madras Curry"]),
        ]);
        let resolver = HierarchyResolver::new(&map, &NullSink);
        assert_eq!(
            resolver.descendants_of("Blends"),
            names(&["Curry Powder", "Madras Curry", "Garam Masala"])
        );
        assert!(resolver.descendants_of("Unknown").is_empty());
        assert_eq!(resolver.unit_of("Curry Powder").len(), 2);
    }

    #[test]
    fn cycles_stop_expansion_and_are_reported() {
        let map = adjacency(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);
        let sink = MemorySink::new();
        let resolver = HierarchyResolver::new(&map, &sink);
        assert_eq!(resolver.descendants_of("A"), names(&["B", "C"]));
        assert_eq!(
            sink.events(),
            vec![DiagnosticEvent::CycleDetected { node: "C".into(), revisited: "A".into() }]
        );
    }

    #[test]
    fn shared_children_are_visited_once() {
        let map = adjacency(&[("Root", &["X", "Y"]), ("X", &["Z"]), ("Y", &["Z"])]);
        let sink = MemorySink::new();
        let resolver = HierarchyResolver::new(&map, &sink);
        assert_eq!(resolver.descendants_of("Root"), names(&["X", "Z", "Y"]));
        assert_eq!(
            sink.events(),
            vec![DiagnosticEvent::SharedDescendant { root: "Root".into(), node: "Z".into() }]
        );
    }

    #[test]
    fn ancestors_walk_up_nearest_first() {
        let map = adjacency(&[("Spices", &["Blends"]), ("Blends", &["Curry Powder"])]);
        let resolver = HierarchyResolver::new(&map, &NullSink);
        assert_eq!(resolver.ancestors_of("Curry Powder"), names(&["Blends", "Spices"]));
        assert!(resolver.ancestors_of("Spices").is_empty());
    }

    #[test]
    fn validate_reports_multiple_parents_and_cycles() {
        let map = adjacency(&[("A", &["C"]), ("B", &["C"]), ("C", &["D"]), ("D", &["C"])]);
        let sink = MemorySink::new();
        let resolver = HierarchyResolver::new(&map, &sink);
        assert_eq!(resolver.validate("By Product"), 2);
        let events = sink.events();
        assert!(events.contains(&DiagnosticEvent::MultipleParents {
            segment_type: "By Product".into(),
            child: "C".into(),
            parents: names(&["A", "B", "D"]),
        }));
        assert!(events.iter().any(|e| matches!(e, DiagnosticEvent::CycleDetected { .. })));
    }

    #[test]
    fn ancestor_match_skips_level_one() {
        let stored = SegmentHierarchy {
            level_1: "By Product".into(),
            level_2: "Blends".into(),
            level_3: "Curry Powder".into(),
            level_4: String::new(),
        };
        assert!(is_ancestor_of(&stored, "Blends"));
        assert!(is_ancestor_of(&stored, "Curry Powder"));
        assert!(!is_ancestor_of(&stored, "By Product"));
        assert!(!is_ancestor_of(&stored, ""));
    }

    #[test]
    fn ancestor_match_respects_level_bounds() {
        let stored = SegmentHierarchy {
            level_1: "By Product".into(),
            level_2: "Spices".into(),
            level_3: "Blends".into(),
            level_4: "Curry Powder".into(),
        };
        assert!(stored_ancestor_within(&stored, "Blends", 2..=3));
        assert!(!stored_ancestor_within(&stored, "Curry Powder", 2..=3));
        assert!(is_ancestor_of(&stored, "Curry Powder"));
        assert!(!stored_ancestor_within(&stored, "By Product", 1..=4));
    }
}
