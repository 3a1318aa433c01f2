//! FacetController - owner of the index and the session selection
//!
//! The controller is the single writer of the [`FilterSelection`]. Every edit
//! goes through [`reconcile`], every index swap through [`revalidate`], and all
//! derived values (options, count, predicate, viewport) are read from here so
//! the counter and the map layer always see the same selection.

use crate::predicate::matching;
use crate::{
    Facet, FacetEdit, FacetOptions, Feature, FeatureIndex, FilterSelection, Result,
    ViewportPolicy, ViewportRecommendation, count, matches, reconcile, revalidate,
};
use std::cell::OnceCell;
use std::sync::Arc;

/// Session state for the facet pickers
#[derive(Debug, Clone)]
pub struct FacetController {
    /// Current feature index (read-only, shareable)
    index: Arc<FeatureIndex>,
    /// The one selection instance
    selection: FilterSelection,
    /// Camera framing configuration
    policy: ViewportPolicy,
    /// Options for the current (index, selection), computed on first use
    options: OnceCell<FacetOptions>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FacetController {
    /// Create a controller with an empty selection
    pub fn new(index: Arc<FeatureIndex>) -> Self {
        Self {
            index,
            selection: FilterSelection::empty(),
            policy: ViewportPolicy::default(),
            options: OnceCell::new(),
        }
    }

    /// Build the index from raw features and wrap it in a controller
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self::new(Arc::new(FeatureIndex::build(features)))
    }

    /// Use a custom viewport policy
    pub fn with_policy(mut self, policy: ViewportPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn index(&self) -> &Arc<FeatureIndex> {
        &self.index
    }

    #[inline]
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    #[inline]
    pub fn policy(&self) -> &ViewportPolicy {
        &self.policy
    }

    /// Apply an edit to one facet and return the reconciled selection
    pub fn edit(&mut self, facet: Facet, value: &str) -> &FilterSelection {
        let next = reconcile(&self.selection, facet, value, &self.index);
        self.replace_selection(next);
        &self.selection
    }

    /// Apply a parsed edit
    pub fn apply(&mut self, edit: &FacetEdit) -> &FilterSelection {
        self.edit(edit.facet, &edit.value)
    }

    /// Apply an edit addressed by facet name
    ///
    /// Unknown facet names are a caller error and leave the selection untouched.
    pub fn apply_named(&mut self, facet: &str, value: &str) -> Result<&FilterSelection> {
        let facet: Facet = facet.parse()?;
        Ok(self.edit(facet, value))
    }

    /// Reset to the canonical empty selection
    pub fn clear(&mut self) {
        self.replace_selection(FilterSelection::empty());
    }

    /// Swap in a rebuilt index and revalidate the selection against it
    ///
    /// Returns `true` when the selection had to change.
    pub fn replace_index(&mut self, index: Arc<FeatureIndex>) -> bool {
        let next = revalidate(&self.selection, &index);
        let changed = next != self.selection;
        if changed {
            tracing::info!(
                "Selection adjusted after index rebuild: {:?} -> {:?}",
                self.selection,
                next
            );
        }

        self.index = index;
        self.selection = next;
        self.options = OnceCell::new();
        changed
    }

    /// Legal options for every facet under the current selection
    pub fn options(&self) -> &FacetOptions {
        self.options
            .get_or_init(|| FacetOptions::resolve(&self.index, &self.selection))
    }

    /// Number of features matching the current selection
    pub fn count(&self) -> usize {
        count(&self.index, &self.selection)
    }

    /// Features matching the current selection, in index order
    pub fn matching(&self) -> impl Iterator<Item = &Feature> + '_ {
        matching(&self.index, &self.selection)
    }

    /// Snapshot of the current filter as a standalone predicate
    ///
    /// Hand this to the map layer: it evaluates the same [`matches`] the
    /// counter uses, against the selection at the time of the call.
    pub fn predicate(&self) -> impl Fn(&Feature) -> bool + Send + Sync + 'static {
        let selection = self.selection.clone();
        move |feature: &Feature| matches(feature, &selection)
    }

    /// Camera framing for the current selection, with the bounds of its matches
    pub fn viewport(&self) -> ViewportRecommendation {
        self.policy.recommend_for(&self.index, &self.selection)
    }

    /// Store a new selection, dropping cached options only when it differs
    fn replace_selection(&mut self, next: FilterSelection) {
        if next != self.selection {
            self.selection = next;
            self.options = OnceCell::new();
        }
    }
}
