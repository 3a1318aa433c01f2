//! The four-facet filter selection

use crate::Facet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current filter state: one optional value per facet
///
/// An empty string means "no constraint on this facet". Blank values are
/// stored as the empty string so there is a single representation of "unset".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterSelection {
    pub state: String,
    pub municipality: String,
    pub community: String,
    pub people: String,
}

impl FilterSelection {
    /// The canonical all-empty selection
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Value of a facet (empty when unset)
    #[inline]
    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::State => &self.state,
            Facet::Municipality => &self.municipality,
            Facet::Community => &self.community,
            Facet::People => &self.people,
        }
    }

    /// Set a facet without any consistency check
    ///
    /// Use [`crate::reconcile`] for user edits; this is the raw field write.
    pub fn set(&mut self, facet: Facet, value: &str) {
        let value = if value.trim().is_empty() {
            String::new()
        } else {
            value.to_string()
        };
        match facet {
            Facet::State => self.state = value,
            Facet::Municipality => self.municipality = value,
            Facet::Community => self.community = value,
            Facet::People => self.people = value,
        }
    }

    /// Builder form of [`FilterSelection::set`]
    pub fn with(mut self, facet: Facet, value: &str) -> Self {
        self.set(facet, value);
        self
    }

    #[inline]
    pub fn clear(&mut self, facet: Facet) {
        self.set(facet, "");
    }

    /// Whether the facet constrains the result (blank values never do)
    #[inline]
    pub fn is_set(&self, facet: Facet) -> bool {
        !self.get(facet).trim().is_empty()
    }

    /// True when no facet constrains the result
    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|&facet| !self.is_set(facet))
    }

    /// True when at least one of state, municipality or community is set
    pub fn has_hierarchy(&self) -> bool {
        self.most_specific_hierarchical().is_some()
    }

    /// The deepest hierarchical facet that is set, if any
    pub fn most_specific_hierarchical(&self) -> Option<Facet> {
        [Facet::Community, Facet::Municipality, Facet::State]
            .into_iter()
            .find(|&facet| self.is_set(facet))
    }

    /// Number of facets that constrain the result
    pub fn active_count(&self) -> usize {
        Facet::ALL.iter().filter(|&&facet| self.is_set(facet)).count()
    }
}
