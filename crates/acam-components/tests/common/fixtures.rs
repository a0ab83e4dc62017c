//! Installation fixtures
//!
//! Builds a throwaway ALPHACAM installation and SDK workspace under a
//! temporary directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use acam_components::WorkspacePaths;
use filetime::FileTime;
use tempfile::TempDir;

/// Minimal PE image carrying a `FileVersion` resource string
pub fn pe_image(version: Option<&str>) -> Vec<u8> {
    let mut bytes = vec![0u8; 0x40];
    bytes[0] = b'M';
    bytes[1] = b'Z';
    bytes[0x3c..0x40].copy_from_slice(&0x40u32.to_le_bytes());
    bytes.extend_from_slice(b"PE\0\0");
    bytes.extend_from_slice(&[0u8; 6]);
    if let Some(version) = version {
        bytes.extend(utf16z("FileVersion"));
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend(utf16z(version));
    }
    bytes
}

fn utf16z(s: &str) -> Vec<u8> {
    let mut out: Vec<u8> = s.encode_utf16().flat_map(u16::to_le_bytes).collect();
    out.extend_from_slice(&[0, 0]);
    out
}

/// Temporary installation + workspace pair
pub struct InstallFixture {
    temp_dir: TempDir,
    paths: WorkspacePaths,
}

impl InstallFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let source = temp_dir.path().join("alphacam");
        let workspace = temp_dir.path().join("sdk");
        std::fs::create_dir_all(&source).expect("create installation dir");
        let paths = WorkspacePaths::new(source, workspace);
        Self { temp_dir, paths }
    }

    pub fn paths(&self) -> &WorkspacePaths {
        &self.paths
    }

    pub fn source(&self, name: &str) -> PathBuf {
        self.paths.source_root().join(name)
    }

    pub fn staged_binary(&self, name: &str) -> PathBuf {
        self.paths.workspace_root().join("lib").join(name)
    }

    pub fn staged_help(&self, name: &str) -> PathBuf {
        self.paths.workspace_root().join("help").join(name)
    }

    /// Install a component with an embedded version
    pub fn install_component(&self, name: &str, version: Option<&str>) -> PathBuf {
        let path = self.source(name);
        std::fs::write(&path, pe_image(version)).expect("write component");
        path
    }

    /// Install an arbitrary file
    pub fn install_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.source(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, contents).expect("write file");
        path
    }

    /// Install a help file
    pub fn install_help(&self, name: &str) -> PathBuf {
        self.install_file(name, format!("ITSF help for {}", name).as_bytes())
    }

    pub fn remove_source(&self, name: &str) {
        std::fs::remove_file(self.source(name)).expect("remove source");
    }
}

/// Set a file's modification time relative to now
pub fn set_mtime_offset(path: &Path, offset_secs: i64) {
    let now = SystemTime::now();
    let time = if offset_secs >= 0 {
        now + Duration::from_secs(offset_secs as u64)
    } else {
        now - Duration::from_secs(offset_secs.unsigned_abs())
    };
    filetime::set_file_mtime(path, FileTime::from_system_time(time)).expect("set mtime");
}

pub fn mtime(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .expect("read mtime")
}
