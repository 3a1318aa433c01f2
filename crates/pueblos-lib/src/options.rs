//! Facet option resolution
//!
//! For a partial selection, computes the values each picker may offer. Every
//! offered value matches at least one feature when combined with the other
//! facets that constrain it, so a user can never pick a dead end.

use crate::predicate::matching;
use crate::{Facet, FeatureIndex, FilterSelection, utils};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Legal, collated choices for every facet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacetOptions {
    pub states: Vec<String>,
    pub municipalities: Vec<String>,
    pub communities: Vec<String>,
    pub peoples: Vec<String>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FacetOptions {
    /// Resolve the options for all four facets
    pub fn resolve(index: &FeatureIndex, selection: &FilterSelection) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("options::resolve");

        Self {
            states: state_options(index, selection),
            municipalities: municipality_options(index, selection),
            communities: community_options(index, selection),
            peoples: people_options(index, selection),
        }
    }

    /// Options for a single facet
    pub fn for_facet(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::State => &self.states,
            Facet::Municipality => &self.municipalities,
            Facet::Community => &self.communities,
            Facet::People => &self.peoples,
        }
    }

    /// Whether `value` is currently offered for `facet`
    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.for_facet(facet).iter().any(|option| option == value)
    }
}

/// Selection containing only the listed facets of `selection`
fn restricted_to(selection: &FilterSelection, facets: &[Facet]) -> FilterSelection {
    facets
        .iter()
        .fold(FilterSelection::empty(), |restricted, &facet| {
            restricted.with(facet, selection.get(facet))
        })
}

/// Collated values of `facet` over the features matching `probe`
fn values_under(index: &FeatureIndex, probe: &FilterSelection, facet: Facet) -> Vec<String> {
    utils::sorted_collated(matching(index, probe).map(|feature| feature.facet(facet)))
}

/// States, restricted to those holding the selected people
pub fn state_options(index: &FeatureIndex, selection: &FilterSelection) -> Vec<String> {
    if selection.is_set(Facet::People) {
        let probe = restricted_to(selection, &[Facet::People]);
        values_under(index, &probe, Facet::State)
    } else {
        utils::sorted_collated(index.states().iter().map(String::as_str))
    }
}

/// Municipalities of the selected state, restricted by people when set
pub fn municipality_options(index: &FeatureIndex, selection: &FilterSelection) -> Vec<String> {
    if !selection.is_set(Facet::State) {
        return Vec::new();
    }

    if selection.is_set(Facet::People) {
        let probe = restricted_to(selection, &[Facet::State, Facet::People]);
        values_under(index, &probe, Facet::Municipality)
    } else {
        index
            .municipalities(&selection.state)
            .map(|set| utils::sorted_collated(set.iter().map(String::as_str)))
            .unwrap_or_default()
    }
}

/// Communities of the selected (state, municipality), restricted by people when set
///
/// The people-aware variant scans features directly: the index only holds
/// per-pair aggregates, which cannot be intersected with a people value.
pub fn community_options(index: &FeatureIndex, selection: &FilterSelection) -> Vec<String> {
    if !selection.is_set(Facet::State) || !selection.is_set(Facet::Municipality) {
        return Vec::new();
    }

    if selection.is_set(Facet::People) {
        let probe = restricted_to(
            selection,
            &[Facet::State, Facet::Municipality, Facet::People],
        );
        values_under(index, &probe, Facet::Community)
    } else {
        index
            .communities(&selection.state, &selection.municipality)
            .map(|set| utils::sorted_collated(set.iter().map(String::as_str)))
            .unwrap_or_default()
    }
}

/// Peoples present under the selected hierarchy (all peoples when none is set)
pub fn people_options(index: &FeatureIndex, selection: &FilterSelection) -> Vec<String> {
    if !selection.has_hierarchy() {
        return utils::sorted_collated(index.peoples().iter().map(String::as_str));
    }

    let probe = restricted_to(
        selection,
        &[Facet::State, Facet::Municipality, Facet::Community],
    );
    values_under(index, &probe, Facet::People)
}
