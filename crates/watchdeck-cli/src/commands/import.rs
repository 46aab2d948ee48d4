use super::import_ui::ImportUI;
use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use serde_json::json;
use std::path::PathBuf;
use watchdeck_core::{ImportError, ImportFormat, ImportOutcome, Importer};

pub async fn run_import(file: Option<PathBuf>, ids: Option<String>, output: &Output) -> Result<()> {
    tracing::debug!("Import command started");

    let (input, format) = match (file, ids) {
        (Some(path), None) => {
            let content = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
            (content, ImportFormat::Tabular)
        }
        (None, Some(list)) => (list, ImportFormat::IdList),
        _ => {
            return Err(color_eyre::eyre::eyre!(
                "Provide a CSV file or --ids with a comma-separated id list"
            ));
        }
    };

    let client = super::tmdb_client()?;

    // Offline is a precondition failure: the run must not start at all.
    if let Err(e) = client.probe().await {
        let err = ImportError::Offline(e);
        output.error("Catalog is unreachable. Check your network connection and try again.");
        return Err(color_eyre::eyre::eyre!("{}", err));
    }

    let store = super::profile_store()?;
    let mut profile = super::load_profile(&store)?;

    let importer = Importer::new(&client, &store);

    // Ctrl-C cancels cooperatively; entries resolved so far are kept.
    let token = importer.cancellation_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, stopping import after the current lookup");
            token.cancel();
        }
    });

    let ui = ImportUI::new();
    let watcher = ui.watch(importer.progress());

    let result = importer.run(&input, format, &mut profile).await;

    watcher.abort();
    ctrl_c.abort();
    ui.finish();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e @ ImportError::MissingIdColumn) => {
            output.error("The input has no id column. The header must name \"id\" or \"The Movie Database Id\".");
            return Err(color_eyre::eyre::eyre!("{}", e));
        }
        Err(ImportError::Lookup { id, source }) => {
            output.error(format!(
                "Lookup for id {} failed; the import was aborted and nothing was added.",
                id
            ));
            return Err(color_eyre::eyre::eyre!("lookup for id {} failed: {}", id, source));
        }
        Err(e) => return Err(color_eyre::eyre::eyre!("Import failed: {}", e)),
    };

    report_outcome(&outcome, output);
    Ok(())
}

fn report_outcome(outcome: &ImportOutcome, output: &Output) {
    match output.format() {
        crate::output::OutputFormat::Human => {
            if outcome.added.is_empty() {
                output.info("No movies were added.");
            } else {
                output.success(format!(
                    "Imported {} movie{}.",
                    outcome.added.len(),
                    if outcome.added.len() == 1 { "" } else { "s" }
                ));
            }

            if !outcome.not_found.is_empty() {
                output.warn(format!(
                    "Ids not found in the catalog: {}",
                    outcome.not_found.join(", ")
                ));
            }
            if !outcome.already_present.is_empty() {
                output.warn(format!(
                    "Ids already in the collection: {}",
                    outcome.already_present.join(", ")
                ));
            }
        }
        _ => {
            let added: Vec<&str> = outcome
                .added
                .iter()
                .map(|entry| entry.movie.id.as_str())
                .collect();
            output.json(&json!({
                "added": added,
                "not_found": outcome.not_found,
                "already_present": outcome.already_present,
            }));
        }
    }
}
