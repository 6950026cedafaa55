//! Directory poller: watches a radar data directory for new volume files
//! and enqueues only those whose timestamp falls within the configured
//! start/end window (spec.md §6, scenario S5).
//!
//! Grounded on `original_source/trunk/Radar/RadarFactory.cpp`'s
//! `hasUnprocessedData`/`updateDataQueue` polling loop and its file-size
//! quiescence check (spec.md §5: a 1-second window repeated until two
//! consecutive reads agree the file has stopped growing).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::filename::{parse_filename, ParsedFilename};

/// One file the poller has decided is ready to hand to the analysis stage.
#[derive(Debug, Clone)]
pub struct DiscoveredVolume {
    pub path: PathBuf,
    pub parsed: ParsedFilename,
}

/// Tracks which filenames have already been enqueued, so repeated polls of
/// the same directory don't resubmit old files.
#[derive(Debug, Default)]
pub struct DirectoryPoller {
    seen: HashSet<PathBuf>,
}

impl DirectoryPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `dir` once, returning newly discovered volumes whose parsed
    /// timestamp falls within `[start, end]` (inclusive). Files with
    /// unparseable names are skipped (and warned, from `parse_filename`).
    pub fn poll(
        &mut self,
        dir: &Path,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> Vec<DiscoveredVolume> {
        let mut discovered = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path().to_path_buf();
            if self.seen.contains(&path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(parsed) = parse_filename(name) else {
                self.seen.insert(path);
                continue;
            };
            if parsed.time < start || parsed.time > end {
                debug!(file = name, "outside configured start/end window, not enqueued");
                self.seen.insert(path);
                continue;
            }
            self.seen.insert(path.clone());
            discovered.push(DiscoveredVolume { path, parsed });
        }
        discovered.sort_by_key(|v| v.parsed.time);
        discovered
    }
}

/// `true` once a file's size has stopped changing across two reads
/// `interval` apart — the quiescence check spec.md §5 requires before a
/// volume file is considered fully written.
pub async fn is_quiescent(path: &Path, interval: Duration) -> bool {
    let Ok(first) = tokio::fs::metadata(path).await else {
        return false;
    };
    tokio::time::sleep(interval).await;
    let Ok(second) = tokio::fs::metadata(path).await else {
        return false;
    };
    if first.len() != second.len() {
        warn!(path = %path.display(), "file still growing, deferring");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs::File;

    #[test]
    fn poll_respects_start_end_window() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("KAMX_20050825_0608.nc")).unwrap();
        File::create(dir.path().join("KAMX_20050825_0900.nc")).unwrap();

        let mut poller = DirectoryPoller::new();
        let start = Utc.with_ymd_and_hms(2005, 8, 25, 6, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2005, 8, 25, 7, 0, 0).unwrap();
        let discovered = poller.poll(dir.path(), start, end);

        assert_eq!(discovered.len(), 1);
        assert_eq!(discovered[0].parsed.radar_id, "KAMX");
    }

    #[test]
    fn poll_does_not_resubmit_seen_files() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("KAMX_20050825_0608.nc")).unwrap();

        let mut poller = DirectoryPoller::new();
        let start = Utc.with_ymd_and_hms(2005, 8, 25, 6, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2005, 8, 25, 7, 0, 0).unwrap();
        assert_eq!(poller.poll(dir.path(), start, end).len(), 1);
        assert_eq!(poller.poll(dir.path(), start, end).len(), 0);
    }
}
