mod logging;
mod report;
mod settings;

use clap::Parser;
use pueblos_lib::{FacetController, FacetEdit, FacetError, loader};
use report::Report;
use settings::Settings;
use std::io::Write;
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
enum ExplorerError {
    #[error(transparent)]
    Facet(#[from] FacetError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    logging::setup_logging();
    let settings = Settings::parse();

    ExitCode::from(finish(run(&settings), &mut std::io::stderr()))
}

/// Map the run result to an exit status, writing any error to `stderr`
///
/// The error is written whatever the log filter is.
fn finish(result: Result<(), ExplorerError>, stderr: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{}", e);
            let _ = writeln!(stderr, "Error: {e}");
            1
        }
    }
}

fn run(settings: &Settings) -> Result<(), ExplorerError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("explorer::run");

    // Reject malformed edits before the (possibly slow) load
    let edits = settings
        .edits
        .iter()
        .map(|edit| edit.parse::<FacetEdit>())
        .collect::<Result<Vec<_>, _>>()?;

    let features =
        loader::load_from_files(settings.geojson_files.clone(), &settings.field_mapping())?;
    let mut controller = FacetController::from_features(features);

    let info = controller.index().info();
    tracing::info!(
        "Indexed {} features ({} duplicates, {} without location)",
        controller.index().len(),
        info.duplicates,
        info.unlocated
    );

    for edit in &edits {
        let selection = controller.apply(edit);
        tracing::info!("{} -> {:?}", edit, selection);
    }

    let report = Report::from_controller(&controller);
    if settings.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.display(settings.max_options));
    }

    Ok(())
}
