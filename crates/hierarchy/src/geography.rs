use core_types::{GeographyDimension, GeographyLevel};
use diagnostics::{DiagnosticEvent, DiagnosticsSink};
use std::collections::{BTreeMap, BTreeSet};

/// Lookups over the global -> region -> country tree.
#[derive(Debug, Clone, Copy)]
pub struct GeographyResolver<'a> {
    dimension: &'a GeographyDimension,
}

impl<'a> GeographyResolver<'a> {
    pub fn new(dimension: &'a GeographyDimension) -> Self {
        Self { dimension }
    }

    fn is_global(&self, name: &str) -> bool {
        self.dimension.global.iter().any(|g| g == name)
    }

    fn is_region(&self, name: &str) -> bool {
        self.dimension.regions.iter().any(|r| r == name) || self.dimension.countries.contains_key(name)
    }

    /// Regions in declaration order, followed by any region only named in the country map.
    fn regions(&self) -> Vec<&'a str> {
        let mut regions: Vec<&str> = self.dimension.regions.iter().map(String::as_str).collect();
        for region in self.dimension.countries.keys() {
            if !regions.contains(&region.as_str()) {
                regions.push(region);
            }
        }
        regions
    }

    pub fn level_of(&self, name: &str) -> GeographyLevel {
        if self.is_global(name) {
            GeographyLevel::Global
        } else if self.is_region(name) {
            GeographyLevel::Region
        } else if self.region_of(name).is_some() {
            GeographyLevel::Country
        } else {
            GeographyLevel::Unknown
        }
    }

    fn region_of(&self, country: &str) -> Option<&'a str> {
        self.regions().into_iter().find(|region| {
            self.dimension
                .countries
                .get(*region)
                .is_some_and(|countries| countries.iter().any(|c| c == country))
        })
    }

    /// The enclosing geography: the root for a region, the first listing region for a country.
    pub fn parent_of(&self, name: &str) -> Option<&'a str> {
        match self.level_of(name) {
            GeographyLevel::Region => self.dimension.root(),
            GeographyLevel::Country => self.region_of(name),
            GeographyLevel::Global | GeographyLevel::Unknown => None,
        }
    }

    /// Direct children: regions below the root, countries below a region.
    pub fn children_of(&self, name: &str) -> Vec<&'a str> {
        match self.level_of(name) {
            GeographyLevel::Global => self.regions(),
            GeographyLevel::Region => self
                .dimension
                .countries
                .get(name)
                .map(|countries| countries.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            GeographyLevel::Country | GeographyLevel::Unknown => Vec::new(),
        }
    }

    /// Pre-expands a selection for callers that want "region" to mean "region and
    /// its countries". The selected names themselves are always kept.
    pub fn expand_selection(&self, selection: &BTreeSet<String>) -> BTreeSet<String> {
        let mut expanded = selection.clone();
        let mut pending: Vec<&str> = selection.iter().map(String::as_str).collect();
        while let Some(name) = pending.pop() {
            for child in self.children_of(name) {
                if expanded.insert(child.to_string()) {
                    pending.push(child);
                }
            }
        }
        expanded
    }

    /// Reports countries listed under more than one region. Returns how many were found.
    pub fn validate(&self, sink: &dyn DiagnosticsSink) -> usize {
        let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for region in self.regions() {
            for country in self.dimension.countries.get(region).into_iter().flatten() {
                let entry = owners.entry(country.as_str()).or_default();
                if !entry.contains(&region) {
                    entry.push(region);
                }
            }
        }
        let mut anomalies = 0;
        for (country, regions) in owners.into_iter().filter(|(_, regions)| regions.len() > 1) {
            anomalies += 1;
            sink.record(DiagnosticEvent::CountryInMultipleRegions {
                country: country.to_string(),
                regions: regions.into_iter().map(str::to_string).collect(),
            });
        }
        if anomalies > 0 {
            tracing::warn!(anomalies, "geography dimension failed validation");
        }
        anomalies
    }
}
