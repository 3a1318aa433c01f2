//! Pueblos Library - Faceted Filter Engine for Indigenous Communities Maps
//!
//! This library keeps a four-facet selection (state, municipality, community and
//! people) consistent over a geographic dataset of indigenous communities, and
//! derives from it the exact predicate used both for counting results and for
//! restricting the rendered map layer.
//!
//! # Architecture
//!
//! - **[`FeatureIndex`]**: De-duplicated features plus the facet lookup sets
//! - **[`FacetOptions`]**: Legal choices for every facet under a partial selection
//! - **[`reconcile`]**: Restores selection consistency after a single-facet edit
//! - **[`matches`] / [`count`]**: The one predicate shared by counter and map layer
//! - **[`ViewportPolicy`]**: Camera framing keyed on hierarchy depth
//! - **[`FacetController`]**: Owner of the index and the session selection
//!
//! # Data Flow
//!
//! ```text
//! GeoJSON ──loader──▶ Vec<Feature> ──build──▶ FeatureIndex
//!                                                 │
//!          FacetEdit ──reconcile──▶ FilterSelection ──▶ options / count / viewport
//! ```

mod controller;
mod feature;
mod index;
pub mod loader;
mod options;
mod predicate;
mod reconcile;
mod selection;
pub mod utils;
mod viewport;

// Public API exports
pub use controller::FacetController;
pub use feature::{Facet, Feature};
pub use index::{BuildInfo, FeatureIndex};
pub use loader::FieldMapping;
pub use options::{
    FacetOptions, community_options, municipality_options, people_options, state_options,
};
pub use predicate::{count, exists, matches, matching};
pub use reconcile::{FacetEdit, reconcile, revalidate};
pub use selection::FilterSelection;
pub use viewport::{Padding, TierFraming, ViewportPolicy, ViewportRecommendation, ViewportTier};

/// Error types for the facet engine
#[derive(Debug, thiserror::Error)]
pub enum FacetError {
    #[error("Unknown facet: {name}")]
    UnknownFacet { name: String },

    #[error("Invalid edit {0:?}, expected facet=value")]
    InvalidEdit(String),

    #[error("GeoJSON parsing error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Unsupported GeoJSON document: {0}")]
    UnsupportedGeoJson(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FacetError>;
