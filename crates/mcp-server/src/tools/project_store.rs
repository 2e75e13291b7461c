use anyhow::{Context as AnyhowContext, Result};
use fs2::FileExt;
use qualcode_analysis::{Codebook, GroundedTheory, Theme, ThemeAssessment};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const SNAPSHOT_VERSION: u32 = 1;
const SNAPSHOT_FILE_NAME: &str = "snapshot_v1.json";
const SNAPSHOT_LOCK_NAME: &str = "project.lock";

/// Latest persisted results for one project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ProjectSnapshot {
    pub version: u32,
    pub project: String,
    #[serde(default)]
    pub codebook: Option<Codebook>,
    #[serde(default)]
    pub themes: Option<Vec<Theme>>,
    #[serde(default)]
    pub theme_assessment: Option<ThemeAssessment>,
    #[serde(default)]
    pub theory: Option<GroundedTheory>,
    #[serde(default)]
    pub updated_at: Option<u64>,
}

impl ProjectSnapshot {
    fn empty(project: &str) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            project: project.to_string(),
            ..Self::default()
        }
    }

    pub fn exists(&self) -> bool {
        self.updated_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ProjectStore {
    base_dir: PathBuf,
}

struct ProjectPaths {
    snapshot_path: PathBuf,
    lock_path: PathBuf,
}

impl ProjectStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn paths(&self, project: &str) -> ProjectPaths {
        let dir = self.base_dir.join(project_dir_name(project));
        ProjectPaths {
            snapshot_path: dir.join(SNAPSHOT_FILE_NAME),
            lock_path: dir.join(SNAPSHOT_LOCK_NAME),
        }
    }

    /// Read the snapshot; a project that was never written yields an empty one
    pub fn load(&self, project: &str) -> Result<ProjectSnapshot> {
        let paths = self.paths(project);
        read_snapshot(project, &paths.snapshot_path)
    }

    /// Apply `mutate` under the project lock and persist the result atomically
    pub fn update<F>(&self, project: &str, mutate: F) -> Result<ProjectSnapshot>
    where
        F: FnOnce(&mut ProjectSnapshot),
    {
        let paths = self.paths(project);
        let _lock = acquire_project_lock(&paths.lock_path)?;

        let mut snapshot = read_snapshot(project, &paths.snapshot_path)?;
        mutate(&mut snapshot);
        snapshot.version = SNAPSHOT_VERSION;
        snapshot.project = project.to_string();
        snapshot.updated_at = Some(unix_ms());

        let bytes = serde_json::to_vec_pretty(&snapshot).context("serialize project snapshot")?;
        write_atomic(&paths.snapshot_path, &bytes)?;
        log::debug!("Saved snapshot for project '{project}'");
        Ok(snapshot)
    }
}

fn read_snapshot(project: &str, path: &Path) -> Result<ProjectSnapshot> {
    if !path.exists() {
        return Ok(ProjectSnapshot::empty(project));
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read project snapshot {}", path.display()))?;
    let snapshot: ProjectSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parse project snapshot {}", path.display()))?;
    if snapshot.project != project {
        anyhow::bail!(
            "project snapshot {} belongs to '{}', not '{project}'",
            path.display(),
            snapshot.project
        );
    }
    Ok(snapshot)
}

/// Readable sanitized name plus a hash of the exact name, so names that sanitize alike
/// still get their own directory
fn project_dir_name(project: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project.as_bytes());
    let digest = hasher.finalize();
    format!(
        "{}-{}",
        safe_dir_component(project),
        hex_encode_lower(&digest[..8])
    )
}

fn hex_encode_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len().saturating_mul(2));
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Single directory component with characters outside `[A-Za-z0-9_-]` replaced
fn safe_dir_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

struct ProjectLock {
    file: File,
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn acquire_project_lock(lock_path: &Path) -> Result<ProjectLock> {
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create project dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("open project lock {}", lock_path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("lock project {}", lock_path.display()))?;
    Ok(ProjectLock { file })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().context("snapshot path has no parent")?;
    let tmp = parent.join(format!(
        ".{}.tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("snapshot"),
        std::process::id()
    ));

    {
        let mut file =
            File::create(&tmp).with_context(|| format!("create tmp {}", tmp.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("write tmp {}", tmp.display()))?;
        file.sync_all()
            .with_context(|| format!("sync tmp {}", tmp.display()))?;
    }

    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename tmp {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
