//! Camera framing recommendations
//!
//! The framing tier depends only on how deep into the state > municipality >
//! community hierarchy the selection goes. A people-only selection frames like
//! an empty one, however few features it matches.

use crate::predicate::matching;
use crate::{Facet, FeatureIndex, FilterSelection};
use geo::{BoundingRect, MultiPoint, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Framing tier, from widest to closest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ViewportTier {
    Overview,
    State,
    Municipality,
    Community,
}

impl ViewportTier {
    /// Tier for the most specific hierarchical facet of the selection
    pub fn for_selection(selection: &FilterSelection) -> Self {
        match selection.most_specific_hierarchical() {
            Some(Facet::Community) => Self::Community,
            Some(Facet::Municipality) => Self::Municipality,
            Some(Facet::State) => Self::State,
            Some(Facet::People) | None => Self::Overview,
        }
    }
}

/// Screen-space padding in pixels around the framed area
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    /// Uniform padding with a wider left edge for the side panel
    pub const fn with_side_panel(edge: f64, panel: f64) -> Self {
        Self {
            top: edge,
            right: edge,
            bottom: edge,
            left: panel,
        }
    }
}

/// Zoom ceiling and padding for one tier
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TierFraming {
    pub max_zoom: f64,
    pub padding: Padding,
}

/// Framing for each of the four tiers
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewportPolicy {
    pub overview: TierFraming,
    pub state: TierFraming,
    pub municipality: TierFraming,
    pub community: TierFraming,
}

impl Default for ViewportPolicy {
    fn default() -> Self {
        let panel = Padding::with_side_panel(50.0, 420.0);
        Self {
            overview: TierFraming {
                max_zoom: 5.0,
                padding: Padding::with_side_panel(20.0, 380.0),
            },
            state: TierFraming {
                max_zoom: 7.5,
                padding: panel,
            },
            municipality: TierFraming {
                max_zoom: 10.0,
                padding: panel,
            },
            community: TierFraming {
                max_zoom: 13.0,
                padding: panel,
            },
        }
    }
}

/// Recommended camera framing for a selection
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewportRecommendation {
    pub tier: ViewportTier,
    pub max_zoom: f64,
    pub padding: Padding,
    /// WGS84 bounds of the matching features (x = longitude, y = latitude)
    pub bounds: Option<Rect<f64>>,
}

impl ViewportPolicy {
    /// Framing for a tier
    pub fn framing(&self, tier: ViewportTier) -> TierFraming {
        match tier {
            ViewportTier::Overview => self.overview,
            ViewportTier::State => self.state,
            ViewportTier::Municipality => self.municipality,
            ViewportTier::Community => self.community,
        }
    }

    /// Recommend a framing from the selection alone (no bounds)
    pub fn recommend(&self, selection: &FilterSelection) -> ViewportRecommendation {
        let tier = ViewportTier::for_selection(selection);
        let framing = self.framing(tier);
        ViewportRecommendation {
            tier,
            max_zoom: framing.max_zoom,
            padding: framing.padding,
            bounds: None,
        }
    }

    /// Recommend a framing and attach the bounds of the matching features
    ///
    /// The tier is the same as [`ViewportPolicy::recommend`]; bounds are `None`
    /// when nothing matches.
    pub fn recommend_for(
        &self,
        index: &FeatureIndex,
        selection: &FilterSelection,
    ) -> ViewportRecommendation {
        #[cfg(feature = "profiling")]
        profiling::scope!("viewport::recommend_for");

        let points: MultiPoint<f64> = matching(index, selection)
            .filter_map(|feature| feature.location)
            .collect();

        ViewportRecommendation {
            bounds: points.bounding_rect(),
            ..self.recommend(selection)
        }
    }
}
