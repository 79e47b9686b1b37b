//! Directory of per-day schedule artifacts
//!
//! Each artifact is `{dir}/{YYYY-MM-DD}.json` holding the raw shift array
//! exactly as fetched. Writes go to a temp file in the same directory, are
//! fsynced, then renamed over the target so readers never see a torn file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use shiftsync_core::ScheduleStore;
use shiftsync_domain::constants::DATE_FORMAT;
use shiftsync_domain::{Result, Schedule, ShiftSyncError};
use tracing::{debug, instrument};

use crate::errors::{InfraError, IntoShiftSyncError, Surface};

/// Filesystem-backed [`ScheduleStore`]
#[derive(Debug, Clone)]
pub struct FileScheduleStore {
    dir: PathBuf,
}

impl FileScheduleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact path for `key`.
    pub fn path_for(&self, key: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", key.format(DATE_FORMAT)))
    }

    /// Read and shape-check an artifact at an explicit path.
    ///
    /// # Errors
    /// `Storage` when the file cannot be read or is not a JSON array of
    /// objects.
    pub async fn read_artifact(path: &Path) -> Result<Schedule> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ShiftSyncError::Storage(format!("cannot read {}: {err}", path.display()))
        })?;
        parse_artifact(path, &bytes)
    }
}

fn parse_artifact(path: &Path, bytes: &[u8]) -> Result<Schedule> {
    Schedule::parse(bytes).map_err(|err| {
        ShiftSyncError::Storage(format!("corrupt schedule artifact {}: {err}", path.display()))
    })
}

#[async_trait]
impl ScheduleStore for FileScheduleStore {
    #[instrument(skip(self))]
    async fn load(&self, key: NaiveDate) -> Result<Option<Schedule>> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => parse_artifact(&path, &bytes).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No stored schedule");
                Ok(None)
            }
            Err(err) => Err(err.into_shiftsync(Surface::Storage)),
        }
    }

    #[instrument(skip(self, schedule), fields(shifts = schedule.len()))]
    async fn save(&self, key: NaiveDate, schedule: &Schedule) -> Result<()> {
        let bytes = schedule
            .to_json_pretty()
            .map_err(|err| ShiftSyncError::Storage(format!("cannot serialize schedule: {err}")))?;
        let dir = self.dir.clone();
        let target = self.path_for(key);

        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &bytes))
            .await
            .map_err(|err| ShiftSyncError::Internal(format!("schedule write task failed: {err}")))?
            .map_err(ShiftSyncError::from)
    }

    fn locate(&self, key: NaiveDate) -> String {
        self.path_for(key).display().to_string()
    }
}

/// Write `bytes` to `target` via temp file, fsync and rename.
fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> std::result::Result<(), InfraError> {
    fs::create_dir_all(dir)?;

    let file_name = target.file_name().and_then(|n| n.to_str()).unwrap_or("schedule.json");
    let temp = dir.join(format!(".{file_name}.{}.tmp", std::process::id()));

    let written = (|| -> std::result::Result<(), InfraError> {
        let mut file = File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp, target)?;
        Ok(())
    })();

    if written.is_err() {
        let _ = fs::remove_file(&temp);
        return written;
    }

    // Persist the rename itself.
    #[cfg(unix)]
    File::open(dir)?.sync_all()?;

    debug!(path = %target.display(), bytes = bytes.len(), "Wrote schedule artifact");
    Ok(())
}
