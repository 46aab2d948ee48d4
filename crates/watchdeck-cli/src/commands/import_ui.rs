use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;
use watchdeck_core::ImportProgress;

fn is_interactive() -> bool {
    std::io::stderr().is_terminal()
}

/// Progress bar for an import run, fed by polling the reconciler's shared
/// progress handle from a separate task. Falls back to periodic log lines
/// when stderr is not a terminal.
pub struct ImportUI {
    bar: ProgressBar,
    interactive: bool,
}

impl ImportUI {
    pub fn new() -> Self {
        let interactive = is_interactive();
        let bar = if interactive {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("█▉▊▋▌▍▎▏  "),
            );
            bar.set_message("Importing...");
            bar
        } else {
            ProgressBar::hidden()
        };

        Self { bar, interactive }
    }

    /// Spawn the polling task. It runs until aborted; the import future
    /// itself is not touched.
    pub fn watch(&self, progress: ImportProgress) -> tokio::task::JoinHandle<()> {
        let bar = self.bar.clone();
        let interactive = self.interactive;
        tokio::spawn(async move {
            let mut last_logged = 0;
            loop {
                let total = progress.total();
                let processed = progress.processed();
                if interactive {
                    if total > 0 {
                        bar.set_length(total as u64);
                    }
                    bar.set_position(processed as u64);
                } else if processed > last_logged {
                    last_logged = processed;
                    tracing::info!(
                        operation = "progress",
                        current = processed,
                        total = total,
                        "Import progress update"
                    );
                }
                tokio::time::sleep(Duration::from_millis(120)).await;
            }
        })
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}
