//! Config file resource - keep a file's content (and mode) as declared

use anyhow::{Context, Result};
use similar::TextDiff;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{ApplyContext, ApplyResult, Resource, ResourceKind, ResourceState};

/// A configuration file with managed content
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub content: String,
    /// Permission bits to enforce (Unix only)
    pub mode: Option<u32>,
}

/// Mode of a newly created file when none is managed
const DEFAULT_MODE: u32 = 0o644;

/// What is on disk right now
struct OnDisk {
    content: Vec<u8>,
    mode: Option<u32>,
}

/// Short content digest used as the comparable state
fn digest(bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes).to_hex();
    hash.as_str()[..16].to_string()
}

fn signature(digest: String, mode: Option<u32>) -> String {
    match mode {
        Some(mode) => format!("{digest} mode {mode:04o}"),
        None => digest,
    }
}

#[cfg(unix)]
fn file_mode(meta: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn file_mode(_meta: &fs::Metadata) -> Option<u32> {
    None
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set mode {:04o} on {}", mode, path.display()))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, _mode: u32) -> Result<()> {
    log::warn!("File modes are not supported here, leaving {} as is", path.display());
    Ok(())
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: Option<u32>) -> Self {
        self.mode = mode;
        self
    }

    fn read(&self) -> Result<Option<OnDisk>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        let meta = fs::metadata(&self.path)
            .with_context(|| format!("Failed to stat {}", self.path.display()))?;

        Ok(Some(OnDisk {
            content,
            mode: file_mode(&meta),
        }))
    }

    /// Mode to compare, only when this resource manages it
    fn managed_mode(&self, on_disk: &OnDisk) -> Option<u32> {
        self.mode.and(on_disk.mode)
    }

    /// Replace the file atomically: stage the content next to the target,
    /// give it its final mode, then rename it into place.
    fn write(&self, existing_mode: Option<u32>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let mut staged = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to stage a file in {}", dir.display()))?;
        staged
            .write_all(self.content.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .with_context(|| format!("Failed to write {}", staged.path().display()))?;

        // Unmanaged files keep their mode; new ones get the default
        let mode = self
            .mode
            .or(existing_mode)
            .or(cfg!(unix).then_some(DEFAULT_MODE));
        if let Some(mode) = mode {
            set_mode(staged.path(), mode)?;
        }

        staged
            .persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl Resource for ConfigFile {
    fn id(&self) -> String {
        format!("config:{}", self.path.display())
    }

    fn description(&self) -> String {
        format!("Write {}", self.path.display())
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Config
    }

    fn current_state(&self) -> Result<ResourceState> {
        match self.read()? {
            None => Ok(ResourceState::Absent),
            Some(on_disk) => Ok(ResourceState::Present {
                details: Some(signature(
                    digest(&on_disk.content),
                    self.managed_mode(&on_disk),
                )),
            }),
        }
    }

    fn desired_state(&self) -> ResourceState {
        // Where modes are unsupported, nothing is compared against them
        let mode = if cfg!(unix) { self.mode } else { None };
        ResourceState::Present {
            details: Some(signature(digest(self.content.as_bytes()), mode)),
        }
    }

    fn apply(&self, _ctx: &mut ApplyContext) -> Result<ApplyResult> {
        let on_disk = self.read()?;

        let content_matches = on_disk
            .as_ref()
            .is_some_and(|d| d.content == self.content.as_bytes());
        let mode_matches = match (self.mode, on_disk.as_ref()) {
            (None, _) => true,
            (Some(mode), Some(d)) => d.mode.is_none_or(|m| m == mode),
            (Some(_), None) => false,
        };

        if content_matches && mode_matches {
            return Ok(ApplyResult::NoChange);
        }

        if !content_matches {
            self.write(on_disk.as_ref().and_then(|d| d.mode))?;
        } else if let Some(mode) = self.mode {
            set_mode(&self.path, mode)?;
        }

        if on_disk.is_none() {
            Ok(ApplyResult::Created)
        } else {
            Ok(ApplyResult::Modified)
        }
    }

    fn detail_diff(&self) -> Result<Option<String>> {
        let current = match self.read()? {
            Some(on_disk) => String::from_utf8_lossy(&on_disk.content).into_owned(),
            None => String::new(),
        };
        if current == self.content {
            return Ok(None);
        }

        let path = self.path.display().to_string();
        let diff = TextDiff::from_lines(current.as_str(), self.content.as_str())
            .unified_diff()
            .context_radius(3)
            .header(&path, &path)
            .to_string();
        Ok(Some(diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctx() -> ApplyContext {
        ApplyContext::default()
    }

    #[test]
    fn test_creates_missing_file_and_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("etc/owncloud_app/config.php");
        let file = ConfigFile::new(&path, "<settings>");

        assert_eq!(file.current_state().unwrap(), ResourceState::Absent);
        assert_eq!(file.apply(&mut ctx()).unwrap(), ApplyResult::Created);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<settings>");
        assert!(!file.needs_apply().unwrap());
    }

    #[test]
    fn test_rewrites_different_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.php");
        fs::write(&path, "old").unwrap();
        let file = ConfigFile::new(&path, "new");

        assert!(file.needs_apply().unwrap());
        assert_eq!(file.apply(&mut ctx()).unwrap(), ApplyResult::Modified);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_matching_content_is_no_change() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.php");
        fs::write(&path, "same").unwrap();
        let file = ConfigFile::new(&path, "same");

        assert!(!file.needs_apply().unwrap());
        assert_eq!(file.apply(&mut ctx()).unwrap(), ApplyResult::NoChange);
    }

    #[cfg(unix)]
    #[test]
    fn test_enforces_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.php");
        fs::write(&path, "same").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        let file = ConfigFile::new(&path, "same").with_mode(Some(0o640));

        assert!(file.needs_apply().unwrap());
        assert_eq!(file.apply(&mut ctx()).unwrap(), ApplyResult::Modified);

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o640);
        assert!(!file.needs_apply().unwrap());
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o7777
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_lands_with_mode_and_no_leftovers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.php");
        let file = ConfigFile::new(&path, "<secret>").with_mode(Some(0o600));

        assert_eq!(file.apply(&mut ctx()).unwrap(), ApplyResult::Created);
        assert_eq!(mode_of(&path), 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<secret>");

        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_unmanaged_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.php");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let file = ConfigFile::new(&path, "new");

        assert_eq!(file.apply(&mut ctx()).unwrap(), ApplyResult::Modified);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(mode_of(&path), 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_unmanaged_file_gets_default_mode() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.php");
        ConfigFile::new(&path, "x").apply(&mut ctx()).unwrap();
        assert_eq!(mode_of(&path), DEFAULT_MODE);
    }

    #[test]
    fn test_detail_diff_shows_changed_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.php");
        fs::write(&path, "a\nb\n").unwrap();
        let file = ConfigFile::new(&path, "a\nc\n");

        let diff = file.detail_diff().unwrap().unwrap();
        assert!(diff.contains("-b"));
        assert!(diff.contains("+c"));

        file.apply(&mut ctx()).unwrap();
        assert!(file.detail_diff().unwrap().is_none());
    }

    #[test]
    fn test_signature_includes_mode_only_when_managed() {
        assert_eq!(signature("abc".into(), None), "abc");
        assert_eq!(signature("abc".into(), Some(0o640)), "abc mode 0640");
    }
}
