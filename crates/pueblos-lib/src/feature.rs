//! Feature records and facet names
//!
//! A [`Feature`] is one geographic record of an indigenous community. Its four
//! facet attributes are plain strings where the empty string means "no value";
//! loaders coerce anything else into that shape before the engine sees it.

use crate::FacetError;
use geo::Point;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One filterable dimension of the dataset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Facet {
    State,
    Municipality,
    Community,
    People,
}

impl Facet {
    /// All facets, hierarchical ones first in nesting order
    pub const ALL: [Facet; 4] = [
        Facet::State,
        Facet::Municipality,
        Facet::Community,
        Facet::People,
    ];

    /// Whether this facet nests under the state > municipality > community hierarchy
    #[inline]
    pub fn is_hierarchical(self) -> bool {
        !matches!(self, Facet::People)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Municipality => "municipality",
            Self::Community => "community",
            Self::People => "people",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Facet {
    type Err = FacetError;

    /// Parses English or Spanish facet names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "state" | "estado" | "entidad" => Ok(Self::State),
            "municipality" | "municipio" => Ok(Self::Municipality),
            "community" | "comunidad" | "locality" | "localidad" => Ok(Self::Community),
            "people" | "pueblo" => Ok(Self::People),
            _ => Err(FacetError::UnknownFacet {
                name: s.to_string(),
            }),
        }
    }
}

/// A single geographic record
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feature {
    /// Identity used for de-duplication (None = always unique)
    pub record_id: Option<String>,
    pub state: String,
    pub municipality: String,
    /// Community name, may be empty when only a locality name is known
    pub community: String,
    /// Locality name, used when `community` is empty
    pub locality: String,
    /// Indigenous people ("pueblo"), the cross-cutting facet
    pub people: String,
    /// Point location in WGS84 (x = longitude, y = latitude)
    pub location: Option<Point<f64>>,
}

impl Feature {
    /// Create a located feature with no facet values
    pub fn new(location: Point<f64>) -> Self {
        Self {
            location: Some(location),
            ..Default::default()
        }
    }

    pub fn with_record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_municipality(mut self, municipality: impl Into<String>) -> Self {
        self.municipality = municipality.into();
        self
    }

    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.community = community.into();
        self
    }

    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = locality.into();
        self
    }

    pub fn with_people(mut self, people: impl Into<String>) -> Self {
        self.people = people.into();
        self
    }

    /// Community name, falling back to the locality name when absent
    #[inline]
    pub fn community_or_locality(&self) -> &str {
        if self.community.is_empty() {
            &self.locality
        } else {
            &self.community
        }
    }

    /// Value of the given facet as seen by filters and the index
    #[inline]
    pub fn facet(&self, facet: Facet) -> &str {
        match facet {
            Facet::State => &self.state,
            Facet::Municipality => &self.municipality,
            Facet::Community => self.community_or_locality(),
            Facet::People => &self.people,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_community_falls_back_to_locality() {
        let feature = Feature::new(Point::new(-96.7, 17.0)).with_locality("San Blas");
        assert_eq!(feature.community_or_locality(), "San Blas");
        assert_eq!(feature.facet(Facet::Community), "San Blas");

        let feature = feature.with_community("Atempa");
        assert_eq!(feature.facet(Facet::Community), "Atempa");
    }

    #[test]
    fn test_parse_facet_names() {
        assert_eq!("state".parse::<Facet>().unwrap(), Facet::State);
        assert_eq!("Municipio".parse::<Facet>().unwrap(), Facet::Municipality);
        assert_eq!(" comunidad ".parse::<Facet>().unwrap(), Facet::Community);
        assert_eq!("PUEBLO".parse::<Facet>().unwrap(), Facet::People);
    }

    #[test]
    fn test_unknown_facet_is_rejected() {
        let err = "region".parse::<Facet>().unwrap_err();
        assert!(matches!(err, FacetError::UnknownFacet { name } if name == "region"));
    }

    #[test]
    fn test_facet_display_roundtrip() {
        for facet in Facet::ALL {
            assert_eq!(facet.to_string().parse::<Facet>().unwrap(), facet);
        }
    }

    #[test]
    fn test_only_people_is_cross_cutting() {
        assert!(Facet::State.is_hierarchical());
        assert!(Facet::Community.is_hierarchical());
        assert!(!Facet::People.is_hierarchical());
    }
}
