//! Artifact synchronization
//!
//! Copies manifest artifacts from the ALPHACAM installation into the SDK
//! workspace. An artifact is copied only when its staged copy is missing or
//! the source has a strictly newer modification time, so repeated syncs of
//! an unchanged installation touch nothing.
//!
//! Per-artifact problems (missing sources, failed copies) are logged and
//! recorded in the [`SyncReport`]; they never abort the batch.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use acam_core::retry::{RetryExecutor, TracingObserver, TransientIo};
use acam_core::types::{RetryPolicy, SyncSettings};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::fs;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::manifest::{ArtifactKind, Manifest};
use crate::workspace::WorkspacePaths;

/// A staged artifact: its manifest name and workspace location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub name: String,
    pub path: PathBuf,
}

impl StagedArtifact {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// What happened to one artifact during a sync
#[derive(Debug)]
pub enum SyncOutcome {
    /// The artifact was copied into the workspace
    Copied { bytes: u64 },
    /// The staged copy was already current
    UpToDate,
    /// The source file does not exist
    SourceMissing(SyncError),
    /// Copying failed after all retries
    CopyFailed(SyncError),
    /// The sync was cancelled before this artifact started
    Cancelled,
}

impl SyncOutcome {
    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            SyncOutcome::Copied { .. } => "copied",
            SyncOutcome::UpToDate => "up-to-date",
            SyncOutcome::SourceMissing(_) => "missing",
            SyncOutcome::CopyFailed(_) => "failed",
            SyncOutcome::Cancelled => "cancelled",
        }
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncOutcome::SourceMissing(err) | SyncOutcome::CopyFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Result for a single manifest entry
#[derive(Debug)]
pub struct ArtifactSyncResult {
    pub name: String,
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: SyncOutcome,
    /// Whether the staged file exists once the sync finished
    pub staged: bool,
}

/// Ordered outcome of syncing one manifest
#[derive(Debug)]
pub struct SyncReport {
    pub kind: ArtifactKind,
    /// One result per manifest entry, in manifest order
    pub results: Vec<ArtifactSyncResult>,
    pub duration: Duration,
}

impl SyncReport {
    /// Every artifact whose staged file exists, in manifest order
    pub fn staged(&self) -> Vec<StagedArtifact> {
        self.results
            .iter()
            .filter(|r| r.staged)
            .map(|r| StagedArtifact::new(r.name.clone(), r.target.clone()))
            .collect()
    }

    /// Number of artifacts copied by this sync
    pub fn copied_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SyncOutcome::Copied { .. }))
            .count()
    }

    /// Names whose source file was absent
    pub fn missing_sources(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SyncOutcome::SourceMissing(_)))
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Results whose copy failed
    pub fn failures(&self) -> Vec<&ArtifactSyncResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SyncOutcome::CopyFailed(_)))
            .collect()
    }

    pub fn cancelled_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SyncOutcome::Cancelled))
            .count()
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactSyncResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Stages manifest artifacts into the workspace
#[derive(Debug, Clone)]
pub struct ArtifactSyncer {
    max_concurrent: usize,
    copy_timeout: Duration,
    retry: RetryPolicy,
    jitter: bool,
    cancel: CancellationToken,
}

impl Default for ArtifactSyncer {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactSyncer {
    /// Create a syncer with the default sync settings
    pub fn new() -> Self {
        Self::from_settings(&SyncSettings::default())
    }

    /// Create a syncer from the `sync` section of the configuration
    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self {
            max_concurrent: settings.max_concurrent_copies.max(1),
            copy_timeout: Duration::from_secs(settings.copy_timeout_secs.max(1)),
            retry: settings.retry.clone(),
            jitter: true,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_copy_timeout(mut self, timeout: Duration) -> Self {
        self.copy_timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Enable or disable jitter between copy retries
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Stop starting new copies once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Sync every manifest entry into `<workspace>/<staging dir>/`
    ///
    /// Never fails as a whole: each entry gets its own outcome, and the
    /// report lists them in manifest order regardless of completion order.
    pub async fn sync(&self, paths: &WorkspacePaths, manifest: &Manifest) -> SyncReport {
        let start = Instant::now();
        let kind = manifest.kind();
        let staging_dir = paths.staging_dir(kind);

        if let Err(e) = fs::create_dir_all(&staging_dir).await {
            warn!(
                "Failed to create staging directory {}: {}",
                staging_dir.display(),
                e
            );
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut pending = FuturesUnordered::new();

        for (index, entry) in manifest.entries().iter().enumerate() {
            let source = paths.source_path(entry);
            let target = paths.target_path(kind, entry);
            let sem = Arc::clone(&semaphore);

            pending.push(async move {
                let result = self.sync_one(&sem, &entry.name, source, target).await;
                (index, result)
            });
        }

        let mut indexed = Vec::with_capacity(manifest.len());
        while let Some(item) = pending.next().await {
            indexed.push(item);
        }
        indexed.sort_by_key(|(index, _)| *index);

        let report = SyncReport {
            kind,
            results: indexed.into_iter().map(|(_, result)| result).collect(),
            duration: start.elapsed(),
        };

        info!(
            "Synced {} {} artifact(s): {} copied, {} staged, {} missing, {} failed",
            manifest.len(),
            kind,
            report.copied_count(),
            report.staged().len(),
            report.missing_sources().len(),
            report.failures().len()
        );

        report
    }

    async fn sync_one(
        &self,
        semaphore: &Semaphore,
        name: &str,
        source: PathBuf,
        target: PathBuf,
    ) -> ArtifactSyncResult {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            permit = semaphore.acquire() => permit.ok(),
        };

        if self.cancel.is_cancelled() {
            debug!("Sync cancelled before {}", name);
            let staged = is_staged_file(&target).await;
            return result(name, source, target, SyncOutcome::Cancelled, staged);
        }

        let source_meta = match fs::metadata(&source).await {
            Ok(meta) if meta.is_file() => meta,
            _ => {
                warn!("Artifact not found, skipping: {}", source.display());
                let staged = is_staged_file(&target).await;
                let error = SyncError::artifact_not_found(name, &source);
                return result(name, source, target, SyncOutcome::SourceMissing(error), staged);
            }
        };

        if !needs_copy(&source_meta, &target).await {
            debug!("{} is up to date", name);
            return result(name, source, target, SyncOutcome::UpToDate, true);
        }

        if let Some(parent) = target.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!("Failed to create {}: {}", parent.display(), e);
            }
        }

        let mtime = source_meta.modified().ok();
        let executor = RetryExecutor::new(self.retry.clone())
            .with_predicate(TransientIo)
            .with_observer(TracingObserver::new(format!("copy {}", name)))
            .with_jitter(self.jitter);

        let copied = executor
            .execute(|| copy_artifact(&source, &target, mtime, self.copy_timeout))
            .await;

        match copied {
            Ok(bytes) => {
                info!("Copied {} ({} bytes)", name, bytes);
                result(name, source, target, SyncOutcome::Copied { bytes }, true)
            }
            Err(err) => {
                let attempts = err.attempts();
                let staged = is_staged_file(&target).await;
                let error = SyncError::copy_failed(name, &target, attempts, err.into_inner());
                if staged {
                    warn!("{}; keeping the previously staged copy", error);
                } else {
                    warn!("{}", error);
                }
                result(name, source, target, SyncOutcome::CopyFailed(error), staged)
            }
        }
    }
}

fn result(
    name: &str,
    source: PathBuf,
    target: PathBuf,
    outcome: SyncOutcome,
    staged: bool,
) -> ArtifactSyncResult {
    ArtifactSyncResult {
        name: name.to_string(),
        source,
        target,
        outcome,
        staged,
    }
}

/// Copy needed when the target is missing or the source is strictly newer
async fn needs_copy(source_meta: &std::fs::Metadata, target: &Path) -> bool {
    let target_meta = match fs::metadata(target).await {
        Ok(meta) => meta,
        Err(_) => return true,
    };

    match (source_meta.modified(), target_meta.modified()) {
        (Ok(source_time), Ok(target_time)) => source_time > target_time,
        _ => true,
    }
}

async fn is_staged_file(target: &Path) -> bool {
    fs::metadata(target)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// Copy one artifact, carrying the source modification time over to the
/// staged file so later staleness checks compare like with like.
///
/// The copy lands in a sibling temporary file that is renamed over `target`
/// only once complete, so `target` is always either the previous staged
/// copy or a full new one. A copy that times out is abandoned: the blocking
/// task stops at its next chunk and removes its temporary file.
async fn copy_artifact(
    source: &Path,
    target: &Path,
    mtime: Option<SystemTime>,
    timeout: Duration,
) -> io::Result<u64> {
    let abandoned = AbandonOnDrop::default();
    let flag = Arc::clone(&abandoned.0);
    let source = source.to_path_buf();
    let target = target.to_path_buf();

    let task = tokio::task::spawn_blocking(move || {
        replace_staged_copy(&source, &target, mtime, &flag)
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined.map_err(io::Error::other)?,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("copy timed out after {:?}", timeout),
        )),
    }
}

/// Marks the in-flight copy abandoned when the waiting future goes away
#[derive(Default)]
struct AbandonOnDrop(Arc<AtomicBool>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Reader that fails once the copy has been abandoned
struct Abandonable<'a, R> {
    inner: R,
    abandoned: &'a AtomicBool,
}

impl<R: Read> Read for Abandonable<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.abandoned.load(Ordering::Relaxed) {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "copy abandoned"));
        }
        self.inner.read(buf)
    }
}

fn partial_path(target: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(
        ".{}.{}-{}.partial",
        file_name,
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ))
}

fn replace_staged_copy(
    source: &Path,
    target: &Path,
    mtime: Option<SystemTime>,
    abandoned: &AtomicBool,
) -> io::Result<u64> {
    let partial = partial_path(target);
    let outcome = write_partial(source, &partial, mtime, abandoned).and_then(|bytes| {
        if abandoned.load(Ordering::Relaxed) {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "copy abandoned"));
        }
        std::fs::rename(&partial, target)?;
        Ok(bytes)
    });

    if outcome.is_err() {
        if let Err(e) = std::fs::remove_file(&partial) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", partial.display(), e);
            }
        }
    }
    outcome
}

fn write_partial(
    source: &Path,
    partial: &Path,
    mtime: Option<SystemTime>,
    abandoned: &AtomicBool,
) -> io::Result<u64> {
    let mut reader = Abandonable {
        inner: std::fs::File::open(source)?,
        abandoned,
    };
    let mut file = std::fs::File::create(partial)?;
    let bytes = io::copy(&mut reader, &mut file)?;
    file.sync_all()?;
    if let Some(mtime) = mtime {
        file.set_modified(mtime)?;
    }
    Ok(bytes)
}
