//! The single filter predicate
//!
//! [`matches`] is the only definition of "this feature passes the current
//! selection". The results counter, the option resolver, the reconciler's
//! compatibility checks and the map-layer filter all go through it.

use crate::{Facet, Feature, FeatureIndex, FilterSelection};

/// Whether a feature satisfies every non-empty facet of the selection
///
/// The community facet is compared against the feature's community name, or
/// its locality name when the community is absent.
#[inline]
pub fn matches(feature: &Feature, selection: &FilterSelection) -> bool {
    Facet::ALL
        .iter()
        .all(|&facet| !selection.is_set(facet) || feature.facet(facet) == selection.get(facet))
}

/// Number of indexed features matching the selection
pub fn count(index: &FeatureIndex, selection: &FilterSelection) -> usize {
    #[cfg(feature = "profiling")]
    profiling::scope!("predicate::count");

    matching(index, selection).count()
}

/// Whether at least one indexed feature matches the selection
///
/// This is the compatibility primitive used when reconciling edits and when
/// deciding which options to offer.
pub fn exists(index: &FeatureIndex, selection: &FilterSelection) -> bool {
    index.features().iter().any(|feature| matches(feature, selection))
}

/// Iterate over the indexed features matching the selection, in index order
pub fn matching<'a>(
    index: &'a FeatureIndex,
    selection: &'a FilterSelection,
) -> impl Iterator<Item = &'a Feature> + 'a {
    index
        .features()
        .iter()
        .filter(move |feature| matches(feature, selection))
}
