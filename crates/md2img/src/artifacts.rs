//! Temporary artifact lifecycle
//!
//! Every successful render is saved to a uniquely named PNG, recorded in the
//! artifact registry, and scheduled for deletion once its TTL elapses. At
//! shutdown the registry is drained and the deletion task group is given a
//! bounded grace period to finish.
//!
//! # Concurrency
//!
//! The registry is the only shared mutable state in the pipeline. Its mutex is
//! held for the append and drain critical sections and never across a render or
//! an await point. Deletion tasks run on a [`TaskTracker`]; callers never await
//! them and shutdown does not cancel them.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::config::ConvertConfig;
use crate::error::{Md2ImgError, Result};
use crate::render::ImageHandle;

/// A rendered image persisted to disk pending delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

type ArtifactRegistry = Arc<Mutex<Vec<RenderedArtifact>>>;

/// Owns every temp file produced by the pipeline
#[derive(Debug)]
pub struct ArtifactLifecycleManager {
    registry: ArtifactRegistry,
    tasks: TaskTracker,
    artifact_dir: Option<PathBuf>,
    ttl: Duration,
}

impl ArtifactLifecycleManager {
    /// Create a manager writing to `artifact_dir` (system temp dir when `None`)
    pub fn new(artifact_dir: Option<PathBuf>, ttl: Duration) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Vec::new())),
            tasks: TaskTracker::new(),
            artifact_dir,
            ttl,
        }
    }

    pub fn from_config(config: &ConvertConfig) -> Self {
        Self::new(config.artifact_dir.clone(), config.artifact_ttl())
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Save a render result to a fresh temp PNG
    ///
    /// Runs on the blocking pool. A file left behind by a failed save is removed.
    pub async fn persist(&self, handle: ImageHandle) -> Result<PathBuf> {
        let dir = self.artifact_dir.clone();
        tokio::task::spawn_blocking(move || {
            let path = create_temp_png(dir.as_deref())?;
            if let Err(e) = handle.save(&path) {
                let _ = delete_file(&path);
                return Err(e);
            }
            Ok(path)
        })
        .await
        .map_err(|e| Md2ImgError::SaveFailed(format!("save task failed: {}", e)))?
    }

    /// Record a path in the registry
    ///
    /// A path already present is not added twice.
    pub fn track(&self, path: &Path) {
        let mut registry = lock(&self.registry);
        if registry.iter().any(|artifact| artifact.path == path) {
            return;
        }
        registry.push(RenderedArtifact {
            path: path.to_path_buf(),
            created_at: Utc::now(),
        });
        debug!(path = %path.display(), tracked = registry.len(), "Tracking artifact");
    }

    /// Delete `path` once `ttl` has elapsed
    ///
    /// Fire-and-forget: the task runs in the background and every deletion error
    /// is swallowed. The registry entry is dropped after the file is gone.
    pub fn schedule_delete(&self, path: PathBuf, ttl: Duration) {
        let registry = Arc::clone(&self.registry);
        self.tasks.spawn(async move {
            tokio::time::sleep(ttl).await;

            let removal = tokio::fs::remove_file(&path).await;
            match classify_removal(removal, &path) {
                Ok(true) => debug!(path = %path.display(), "Deleted expired artifact"),
                Ok(false) => debug!(path = %path.display(), "Expired artifact already gone"),
                Err(e) => debug!(error = %e, "Ignoring artifact deletion failure"),
            }

            lock(&registry).retain(|artifact| artifact.path != path);
        });
    }

    /// Track a freshly saved artifact and schedule its deletion with the default TTL
    pub fn register(&self, path: &Path) {
        self.track(path);
        self.schedule_delete(path.to_path_buf(), self.ttl);
    }

    /// Delete every tracked file and clear the registry
    ///
    /// Best effort: a failed deletion does not stop the others. Returns the
    /// number of files actually removed.
    pub fn drain_all(&self) -> usize {
        let mut registry = lock(&self.registry);
        let mut removed = 0;
        for artifact in registry.iter() {
            match delete_file(&artifact.path) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => debug!(error = %e, "Ignoring artifact deletion failure during drain"),
            }
        }
        let tracked = registry.len();
        registry.clear();
        debug!(tracked, removed, "Drained artifact registry");
        removed
    }

    /// Drain the registry and wait up to `grace` for pending deletion tasks
    ///
    /// Pending tasks are not cancelled; whatever is still sleeping when the grace
    /// period ends is left to the runtime.
    pub async fn shutdown(&self, grace: Duration) {
        let removed = self.drain_all();
        self.tasks.close();

        let finished = tokio::time::timeout(grace, self.tasks.wait()).await.is_ok();
        info!(
            removed,
            pending = self.tasks.len(),
            finished,
            "Artifact cleanup complete"
        );
    }

    /// Paths currently tracked, in creation order
    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        lock(&self.registry)
            .iter()
            .map(|artifact| artifact.path.clone())
            .collect()
    }

    /// Snapshot of the registry
    pub fn artifacts(&self) -> Vec<RenderedArtifact> {
        lock(&self.registry).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.registry).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletion tasks that have not finished yet
    pub fn pending_deletions(&self) -> usize {
        self.tasks.len()
    }
}

// A poisoned registry still holds valid paths; keep using it.
fn lock(registry: &ArtifactRegistry) -> MutexGuard<'_, Vec<RenderedArtifact>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn create_temp_png(dir: Option<&Path>) -> Result<PathBuf> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("md2img-").suffix(".png");

    let file = match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            builder.tempfile_in(dir)?
        }
        None => builder.tempfile()?,
    };

    let (_, path) = file.keep().map_err(|e| Md2ImgError::IoError(e.error))?;
    Ok(path)
}

/// Remove a file; `Ok(false)` when it did not exist
fn delete_file(path: &Path) -> Result<bool> {
    classify_removal(std::fs::remove_file(path), path)
}

fn classify_removal(result: io::Result<()>, path: &Path) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Md2ImgError::DeletionFailed(format!(
            "{}: {}",
            path.display(),
            e
        ))),
    }
}
