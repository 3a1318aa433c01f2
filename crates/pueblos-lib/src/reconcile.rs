//! Selection reconciliation
//!
//! Every user edit goes through [`reconcile`], which turns the edit into a new,
//! internally consistent selection:
//!
//! - a municipality is only set under a state that contains it, and a community
//!   only under a (state, municipality) pair that contains it;
//! - editing a hierarchical facet clears its descendants, and drops the people
//!   facet when the two no longer share a feature;
//! - editing the people facet never fills in the hierarchy; it prunes the
//!   hierarchy top-down from the first level that shares no feature with it.
//!
//! Invalid transitions are resolved, never rejected. [`revalidate`] applies the
//! same checks to an existing selection after the index is rebuilt.

use crate::{Facet, FacetError, FeatureIndex, FilterSelection, exists};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single-facet edit request
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacetEdit {
    pub facet: Facet,
    /// New value; empty clears the facet
    pub value: String,
}

impl FacetEdit {
    pub fn new(facet: Facet, value: impl Into<String>) -> Self {
        Self {
            facet,
            value: value.into(),
        }
    }

    /// An edit that clears `facet`
    pub fn clear(facet: Facet) -> Self {
        Self::new(facet, "")
    }
}

impl fmt::Display for FacetEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.facet, self.value)
    }
}

impl FromStr for FacetEdit {
    type Err = FacetError;

    /// Parses `facet=value`; `facet=` clears the facet.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| FacetError::InvalidEdit(s.to_string()))?;
        Ok(Self::new(name.parse()?, value.trim()))
    }
}

/// Apply a single-facet edit and restore selection consistency
///
/// Total over any selection and edit. The result always satisfies the
/// hierarchy invariant and is the canonical empty selection when nothing is
/// left set.
pub fn reconcile(
    selection: &FilterSelection,
    facet: Facet,
    value: &str,
    index: &FeatureIndex,
) -> FilterSelection {
    #[cfg(feature = "profiling")]
    profiling::scope!("reconcile::reconcile");

    let mut next = enforce_hierarchy(selection.clone(), index);
    let value = admissible_value(&next, facet, value, index);

    match facet {
        Facet::State => {
            next.set(Facet::State, value);
            next.clear(Facet::Municipality);
            next.clear(Facet::Community);
            if !value.is_empty() {
                drop_incompatible_people(&mut next, index);
            }
        }
        Facet::Municipality => {
            next.set(Facet::Municipality, value);
            next.clear(Facet::Community);
            if !value.is_empty() {
                drop_incompatible_people(&mut next, index);
            }
        }
        Facet::Community => {
            next.set(Facet::Community, value);
            if !value.is_empty() {
                drop_incompatible_people(&mut next, index);
            }
        }
        Facet::People => {
            next.set(Facet::People, value);
            if !value.is_empty() {
                prune_hierarchy_for_people(&mut next, index);
            }
        }
    }

    let next = normalize(next);
    tracing::debug!(
        "Reconciled {}={:?}: {:?} -> {:?}",
        facet,
        value,
        selection,
        next
    );
    next
}

/// Re-check an existing selection against a (possibly rebuilt) index
///
/// Hierarchical values no longer present are cleared top-down with their
/// descendants; the people facet is then cleared when it is unknown or shares
/// no feature with what remains of the hierarchy. Idempotent.
pub fn revalidate(selection: &FilterSelection, index: &FeatureIndex) -> FilterSelection {
    let mut next = enforce_hierarchy(selection.clone(), index);

    if next.is_set(Facet::People)
        && (!index.peoples().contains(&next.people) || !exists(index, &next))
    {
        next.clear(Facet::People);
    }

    let next = normalize(next);
    if &next != selection {
        tracing::debug!("Revalidated selection: {:?} -> {:?}", selection, next);
    }
    next
}

/// The edited value if the hierarchy admits it, otherwise the empty string
///
/// A municipality must exist under the current state and a community under the
/// current (state, municipality) pair. People values are always admissible.
fn admissible_value<'a>(
    selection: &FilterSelection,
    facet: Facet,
    value: &'a str,
    index: &FeatureIndex,
) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        return "";
    }

    let admissible = match facet {
        Facet::State => index.states().contains(value),
        Facet::Municipality => {
            selection.is_set(Facet::State) && index.contains_municipality(&selection.state, value)
        }
        Facet::Community => {
            selection.is_set(Facet::State)
                && selection.is_set(Facet::Municipality)
                && index.contains_community(&selection.state, &selection.municipality, value)
        }
        Facet::People => true,
    };

    if admissible {
        value
    } else {
        tracing::debug!("Dropping {}={:?}: not present under the current selection", facet, value);
        ""
    }
}

/// Clear hierarchical values that are missing from the index, with their descendants
fn enforce_hierarchy(mut selection: FilterSelection, index: &FeatureIndex) -> FilterSelection {
    if selection.is_set(Facet::State) && !index.states().contains(&selection.state) {
        clear_from(&mut selection, Facet::State);
    }

    if selection.is_set(Facet::Municipality)
        && !index.contains_municipality(&selection.state, &selection.municipality)
    {
        clear_from(&mut selection, Facet::Municipality);
    }

    if selection.is_set(Facet::Community)
        && !index.contains_community(
            &selection.state,
            &selection.municipality,
            &selection.community,
        )
    {
        selection.clear(Facet::Community);
    }

    selection
}

/// Clear `facet` and every hierarchical facet below it
fn clear_from(selection: &mut FilterSelection, facet: Facet) {
    let hierarchy = [Facet::State, Facet::Municipality, Facet::Community];
    if let Some(start) = hierarchy.iter().position(|&level| level == facet) {
        for &level in &hierarchy[start..] {
            selection.clear(level);
        }
    }
}

/// Hierarchy wins over people: drop people when no feature satisfies both
fn drop_incompatible_people(selection: &mut FilterSelection, index: &FeatureIndex) {
    if selection.is_set(Facet::People) && !exists(index, selection) {
        selection.clear(Facet::People);
    }
}

/// People wins over hierarchy: clear from the first level incompatible with it
fn prune_hierarchy_for_people(selection: &mut FilterSelection, index: &FeatureIndex) {
    let mut probe = FilterSelection::empty().with(Facet::People, &selection.people);

    for level in [Facet::State, Facet::Municipality, Facet::Community] {
        if !selection.is_set(level) {
            return;
        }
        probe.set(level, selection.get(level));
        if !exists(index, &probe) {
            clear_from(selection, level);
            return;
        }
    }
}

/// Blank out whitespace-only facets, collapsing to the canonical empty selection
fn normalize(mut selection: FilterSelection) -> FilterSelection {
    for facet in Facet::ALL {
        if !selection.is_set(facet) {
            selection.clear(facet);
        }
    }

    if selection.is_empty() {
        FilterSelection::empty()
    } else {
        selection
    }
}
