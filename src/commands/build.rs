//! Build the static site

use anyhow::Result;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::Watcher;

use crate::content::{DocumentIndex, DocumentLoader};
use crate::generator::Generator;
use crate::Site;

/// Run a full build.
///
/// Documents that fail to parse are reported individually and excluded; the
/// valid ones are still rendered and emitted. A non-empty error set fails
/// the build after emitting, so nothing is withheld and nothing fails
/// silently.
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = DocumentLoader::new(site);
    let (documents, errors) = loader.load_all();

    tracing::info!("Loaded {} documents", documents.len());

    let index = DocumentIndex::build(documents);

    let generator = Generator::new(site)?;
    generator.generate(&index)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    if !errors.is_empty() {
        for e in &errors {
            tracing::error!("{}", e);
        }
        anyhow::bail!("{} document(s) failed to load", errors.len());
    }

    Ok(())
}

/// Watch for file changes and rebuild.
///
/// Each rebuild re-reads the configuration and constructs a fresh `Site`,
/// so edits to `_config.yml` take effect without restarting.
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(site.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    if site.layouts_dir.exists() {
        watcher.watch(site.layouts_dir.as_ref(), notify::RecursiveMode::Recursive)?;
    }

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    while await_change(&rx, Duration::from_millis(500)) {
        tracing::info!("File changed, rebuilding...");
        match Site::new(&site.base_dir) {
            Ok(fresh) => {
                if let Err(e) = run(&fresh) {
                    tracing::error!("Build failed: {}", e);
                }
            }
            Err(e) => tracing::error!("Failed to reload configuration: {}", e),
        }
    }

    Ok(())
}

/// Block until a change arrives, then absorb the rest of the burst: an
/// editor save delivers several events within milliseconds, and they should
/// produce one rebuild. Events that land while a rebuild is running stay
/// queued in the channel and are picked up on the next call, so a change is
/// never dropped.
///
/// Returns false once the watcher channel has closed and drained.
fn await_change<T>(rx: &Receiver<T>, quiet: Duration) -> bool {
    if rx.recv().is_err() {
        return false;
    }
    loop {
        match rx.recv_timeout(quiet) {
            Ok(_more) => continue,
            Err(RecvTimeoutError::Timeout) => return true,
            // Channel closed mid-burst: still rebuild for what we saw
            Err(RecvTimeoutError::Disconnected) => return true,
        }
    }
}
