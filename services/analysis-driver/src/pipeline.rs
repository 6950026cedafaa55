//! Long-lived task topology (spec.md §5): a directory poller, an analysis
//! task that owns the single [`AnalysisDriver`], and a publish task that is
//! the sole writer of the SimplexList/VortexList files and fans out new
//! records via a `watch` channel. Connected by bounded `mpsc` channels so a
//! slow analysis stage applies backpressure to the poller rather than
//! unbounded memory growth.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use ingestion::{is_quiescent, DirectoryPoller, RadarFileSource};
use vortrac_core::{PressureObservation, VortexRecord};

use crate::driver::{AnalysisDriver, CycleOutcome};

/// How often the poller re-scans the watch directory.
const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Gap between the two size reads the quiescence check compares.
const QUIESCENCE_CHECK: Duration = Duration::from_secs(1);

pub struct PipelineHandles {
    pub vortex_updates: watch::Receiver<Option<VortexRecord>>,
    pub poller: tokio::task::JoinHandle<()>,
    pub analysis: tokio::task::JoinHandle<()>,
    pub publish: tokio::task::JoinHandle<()>,
}

/// Spawn the three pipeline tasks. `pressure_obs` is the full set of surface
/// observations loaded at startup; the driver re-filters it by time window
/// on every cycle.
#[allow(clippy::too_many_arguments)]
pub fn spawn(
    watch_dir: PathBuf,
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
    source: Arc<dyn RadarFileSource>,
    mut driver: AnalysisDriver,
    pressure_obs: Vec<PressureObservation>,
    simplex_list_path: PathBuf,
    vortex_list_path: PathBuf,
    abort: Arc<AtomicBool>,
) -> PipelineHandles {
    let (file_tx, mut file_rx) = mpsc::channel::<PathBuf>(16);
    let (cycle_tx, mut cycle_rx) = mpsc::channel::<CycleOutcome>(16);
    let (vortex_tx, vortex_updates) = watch::channel(None);

    let poll_abort = abort.clone();
    let poller = tokio::spawn(async move {
        let mut poller = DirectoryPoller::new();
        loop {
            if poll_abort.load(Ordering::Relaxed) {
                break;
            }
            for discovered in poller.poll(&watch_dir, start, end) {
                if is_quiescent(&discovered.path, QUIESCENCE_CHECK).await {
                    if file_tx.send(discovered.path).await.is_err() {
                        return;
                    }
                } else {
                    warn!(path = %discovered.path.display(), "file not yet quiescent, will retry next poll");
                }
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    });

    let analysis_abort = abort.clone();
    let analysis = tokio::spawn(async move {
        while let Some(path) = file_rx.recv().await {
            if analysis_abort.load(Ordering::Relaxed) {
                break;
            }
            let volume = match source.load_volume(&path) {
                Ok(volume) => volume,
                Err(err) => {
                    error!(error = %err, path = %path.display(), "failed to load radar volume, skipping");
                    continue;
                }
            };
            let outcome = driver.run_cycle(&volume, &pressure_obs, &analysis_abort);
            if cycle_tx.send(outcome).await.is_err() {
                return;
            }
        }
    });

    let publish = tokio::spawn(async move {
        while let Some(outcome) = cycle_rx.recv().await {
            for record in &outcome.simplex_records {
                if let Err(err) = storage::append_simplex_record(&simplex_list_path, record) {
                    error!(error = %err, "failed to append simplex record");
                }
            }
            if outcome.cancelled {
                info!("cycle cancelled before completion, not publishing a vortex record");
                continue;
            }
            if let Err(err) = storage::append_vortex_record(&vortex_list_path, &outcome.vortex_record) {
                error!(error = %err, "failed to append vortex record");
                continue;
            }
            let _ = vortex_tx.send(Some(outcome.vortex_record));
        }
    });

    PipelineHandles {
        vortex_updates,
        poller,
        analysis,
        publish,
    }
}
