//! Feature index construction
//!
//! The index is an immutable snapshot derived from the raw feature list: the
//! de-duplicated features in first-occurrence order plus the facet lookup sets
//! used to populate pickers and validate selections.

use crate::Feature;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Build statistics, reported through tracing after each build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildInfo {
    /// Records received from the source
    pub input_records: usize,
    /// Records dropped because an earlier record had the same id
    pub duplicates: usize,
    /// Records dropped because they have no location
    pub unlocated: usize,
}

/// De-duplicated features and derived facet lookups
///
/// Equal inputs always produce equal indices, so two builds can be compared
/// with `==`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureIndex {
    /// State names present in the features
    states: BTreeSet<String>,
    /// Municipalities observed under each state
    municipalities_by_state: BTreeMap<String, BTreeSet<String>>,
    /// Communities observed under each (state, municipality) pair
    communities_by_state_municipality: BTreeMap<(String, String), BTreeSet<String>>,
    /// Every people value, independent of the hierarchy
    peoples: BTreeSet<String>,
    /// Surviving features in first-occurrence order
    features: Vec<Feature>,
    info: BuildInfo,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FeatureIndex {
    /// Build an index from a raw, possibly duplicated, feature list
    ///
    /// The first record per `record_id` wins; records without an id are never
    /// merged. Records without a location are dropped. Blank facet values
    /// contribute nothing to the lookup sets.
    pub fn build(raw: Vec<Feature>) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("index::build");

        let mut index = Self {
            info: BuildInfo {
                input_records: raw.len(),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut seen_ids: HashSet<String> = HashSet::with_capacity(raw.len());

        for feature in raw {
            if let Some(id) = feature.record_id.as_deref().filter(|id| !id.is_empty()) {
                if !seen_ids.insert(id.to_string()) {
                    index.info.duplicates += 1;
                    continue;
                }
            }

            if feature.location.is_none() {
                index.info.unlocated += 1;
                continue;
            }

            index.insert_facets(&feature);
            index.features.push(feature);
        }

        tracing::debug!(
            "Built feature index: {} features ({} duplicates, {} unlocated), {} states, {} peoples",
            index.features.len(),
            index.info.duplicates,
            index.info.unlocated,
            index.states.len(),
            index.peoples.len()
        );

        index
    }

    /// Register the facet values of one surviving feature
    fn insert_facets(&mut self, feature: &Feature) {
        let state = feature.state.as_str();
        let municipality = feature.municipality.as_str();
        let community = feature.community_or_locality();

        if !state.is_empty() {
            self.states.insert(state.to_string());

            if !municipality.is_empty() {
                self.municipalities_by_state
                    .entry(state.to_string())
                    .or_default()
                    .insert(municipality.to_string());

                if !community.is_empty() {
                    self.communities_by_state_municipality
                        .entry((state.to_string(), municipality.to_string()))
                        .or_default()
                        .insert(community.to_string());
                }
            }
        }

        if !feature.people.is_empty() {
            self.peoples.insert(feature.people.clone());
        }
    }

    /// All state names
    #[inline]
    pub fn states(&self) -> &BTreeSet<String> {
        &self.states
    }

    /// All people values
    #[inline]
    pub fn peoples(&self) -> &BTreeSet<String> {
        &self.peoples
    }

    /// Municipalities observed under a state
    #[inline]
    pub fn municipalities(&self, state: &str) -> Option<&BTreeSet<String>> {
        self.municipalities_by_state.get(state)
    }

    /// Communities observed under a (state, municipality) pair
    pub fn communities(&self, state: &str, municipality: &str) -> Option<&BTreeSet<String>> {
        self.communities_by_state_municipality
            .get(&(state.to_string(), municipality.to_string()))
    }

    /// Full state → municipalities map
    #[inline]
    pub fn municipalities_by_state(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.municipalities_by_state
    }

    /// Full (state, municipality) → communities map
    #[inline]
    pub fn communities_by_state_municipality(
        &self,
    ) -> &BTreeMap<(String, String), BTreeSet<String>> {
        &self.communities_by_state_municipality
    }

    /// Whether the (state, municipality) pair exists
    pub fn contains_municipality(&self, state: &str, municipality: &str) -> bool {
        self.municipalities(state)
            .is_some_and(|set| set.contains(municipality))
    }

    /// Whether the (state, municipality, community) triple exists
    pub fn contains_community(&self, state: &str, municipality: &str, community: &str) -> bool {
        self.communities(state, municipality)
            .is_some_and(|set| set.contains(community))
    }

    /// De-duplicated features in first-occurrence order
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of indexed features
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Statistics from the build that produced this index
    #[inline]
    pub fn info(&self) -> BuildInfo {
        self.info
    }
}

impl FromIterator<Feature> for FeatureIndex {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::build(iter.into_iter().collect())
    }
}
