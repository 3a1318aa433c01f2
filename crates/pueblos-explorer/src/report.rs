//! Report printed after the edits are replayed

use pueblos_lib::{Facet, FacetController, FacetOptions, FilterSelection, ViewportRecommendation};
use serde::Serialize;
use std::fmt;

/// Snapshot of the controller state
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub selection: FilterSelection,
    pub count: usize,
    pub total: usize,
    pub options: FacetOptions,
    pub viewport: ViewportRecommendation,
}

impl Report {
    pub fn from_controller(controller: &FacetController) -> Self {
        Self {
            selection: controller.selection().clone(),
            count: controller.count(),
            total: controller.index().len(),
            options: controller.options().clone(),
            viewport: controller.viewport(),
        }
    }

    /// Text rendering with at most `max_options` values per facet (0 = all)
    pub fn display(&self, max_options: usize) -> ReportDisplay<'_> {
        ReportDisplay {
            report: self,
            max_options,
        }
    }
}

pub struct ReportDisplay<'a> {
    report: &'a Report,
    max_options: usize,
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        writeln!(f, "Selection:")?;
        for facet in Facet::ALL {
            let value = report.selection.get(facet);
            let shown = if value.is_empty() { "(any)" } else { value };
            writeln!(f, "  {:<13} {}", facet.name(), shown)?;
        }

        writeln!(f, "Matches: {} of {}", report.count, report.total)?;

        writeln!(f, "Options:")?;
        for facet in Facet::ALL {
            let values = report.options.for_facet(facet);
            let limit = if self.max_options == 0 {
                values.len()
            } else {
                self.max_options.min(values.len())
            };
            let mut line = values[..limit].join(", ");
            if limit < values.len() {
                line.push_str(&format!(", ... ({} more)", values.len() - limit));
            }
            writeln!(f, "  {:<13} [{}] {}", facet.name(), values.len(), line)?;
        }

        let viewport = &report.viewport;
        write!(
            f,
            "Viewport: {:?} max_zoom={} padding=({}, {}, {}, {})",
            viewport.tier,
            viewport.max_zoom,
            viewport.padding.top,
            viewport.padding.right,
            viewport.padding.bottom,
            viewport.padding.left
        )?;
        if let Some(bounds) = viewport.bounds {
            write!(
                f,
                " bounds=[{:.4}, {:.4}, {:.4}, {:.4}]",
                bounds.min().x,
                bounds.min().y,
                bounds.max().x,
                bounds.max().y
            )?;
        }
        Ok(())
    }
}
