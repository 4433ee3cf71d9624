//! Periodic removal of expired upload directories.
//!
//! Extracted images live under `{temp_dir}/images/{pdf_id}`. The sweeper
//! removes upload directories whose modification time is older than the
//! configured retention. It runs on its own task; a failed sweep is
//! logged and the loop continues.

use std::fs;
use std::path::Path;
use std::time::Duration;

use pdfpix_core::Config;

/// Spawn the background cleanup task. No-op when cleanup is disabled.
pub fn spawn_cleanup_task(config: &Config) {
    if !config.cleanup_enabled {
        tracing::info!("Image cleanup disabled");
        return;
    }

    let images_dir = config.images_dir();
    let retention = Duration::from_secs(config.image_retention_secs);
    let interval_secs = config.cleanup_interval_secs;

    tracing::info!(
        images_dir = %images_dir.display(),
        retention_secs = config.image_retention_secs,
        interval_secs,
        "Image cleanup task started"
    );

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            match sweep_expired(&images_dir, retention) {
                Ok(removed) if removed > 0 => {
                    tracing::info!(removed, "Removed expired upload directories");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Image cleanup sweep failed");
                }
            }
        }
    });
}

/// Remove upload directories older than the retention. Returns how many
/// were removed. Individual failures skip that directory.
fn sweep_expired(images_dir: &Path, retention: Duration) -> std::io::Result<usize> {
    if !images_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(images_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok());

        let expired = match age {
            Some(age) => age >= retention,
            // Unreadable mtime: leave the directory alone
            None => false,
        };

        if expired {
            match fs::remove_dir_all(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(
                        dir = %entry.path().display(),
                        error = %e,
                        "Failed to remove expired upload directory"
                    );
                }
            }
        }
    }

    Ok(removed)
}
