//! Component loading boundary
//!
//! The registry never touches component files directly: it goes through a
//! [`ComponentLoader`], which turns a staged path into an opaque
//! [`ComponentHandle`] and can report the component's embedded version.
//! Hosts that bind to the real ALPHACAM runtime provide their own loader;
//! [`FileComponentLoader`] is the portable default.

use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::LoadError;

/// Dotted or comma-separated version prefix, as found in version resources
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+(?:\s*[.,]\s*\d+){1,3}").expect("version regex is valid")
});

/// Version resource keys tried in order
const VERSION_KEYS: &[&str] = &["FileVersion", "ProductVersion", "Assembly Version"];

/// Longest version string read from a resource, in UTF-16 units
const MAX_VERSION_UNITS: usize = 64;

/// Loads staged components and reports their versions
///
/// Implementations are called from the blocking thread pool and may do
/// synchronous I/O.
pub trait ComponentLoader: Send + Sync {
    /// Load the component at `path`
    fn load(&self, path: &Path) -> Result<ComponentHandle, LoadError>;

    /// Embedded version of a loaded component, if it has one
    fn version_of(&self, handle: &ComponentHandle) -> Option<String>;
}

/// Opaque handle to a loaded component
///
/// Cheap to clone; loaders downcast it back to their own handle type.
#[derive(Clone)]
pub struct ComponentHandle(Arc<dyn Any + Send + Sync>);

impl ComponentHandle {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComponentHandle(..)")
    }
}

/// Binary format of a component file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageKind {
    /// Windows PE image (DLL or EXE)
    PortableExecutable,
    /// COM type library (MSFT or SLTG)
    TypeLibrary,
}

/// What [`FileComponentLoader`] learns about a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedImage {
    pub kind: ImageKind,
    pub size: u64,
    /// Hex-encoded SHA-256 of the file contents
    pub sha256: String,
    pub version: Option<String>,
}

/// Loader that inspects component files without executing them
#[derive(Debug, Clone, Copy, Default)]
pub struct FileComponentLoader;

impl FileComponentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Inspect component bytes read from `path`
    pub fn inspect(path: &Path, bytes: &[u8]) -> Result<LoadedImage, LoadError> {
        if bytes.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }

        let (kind, version) = if is_pe_image(bytes) {
            (ImageKind::PortableExecutable, pe_version(bytes))
        } else if bytes.starts_with(b"MSFT") {
            (ImageKind::TypeLibrary, msft_version(bytes))
        } else if bytes.starts_with(b"SLTG") {
            (ImageKind::TypeLibrary, None)
        } else {
            return Err(LoadError::UnrecognizedFormat {
                path: path.to_path_buf(),
            });
        };

        Ok(LoadedImage {
            kind,
            size: bytes.len() as u64,
            sha256: hex::encode(Sha256::digest(bytes)),
            version,
        })
    }
}

impl ComponentLoader for FileComponentLoader {
    fn load(&self, path: &Path) -> Result<ComponentHandle, LoadError> {
        let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
        let image = Self::inspect(path, &bytes)?;
        Ok(ComponentHandle::new(image))
    }

    fn version_of(&self, handle: &ComponentHandle) -> Option<String> {
        handle
            .downcast_ref::<LoadedImage>()
            .and_then(|image| image.version.clone())
    }
}

/// `MZ` header whose `e_lfanew` points at a `PE\0\0` signature
fn is_pe_image(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"MZ") {
        return false;
    }
    let Some(offset) = read_u32(bytes, 0x3c) else {
        return false;
    };
    let offset = offset as usize;
    bytes
        .get(offset..offset.saturating_add(4))
        .is_some_and(|sig| sig == b"PE\0\0")
}

/// Version string from the PE version resource
fn pe_version(bytes: &[u8]) -> Option<String> {
    VERSION_KEYS
        .iter()
        .find_map(|key| version_resource_value(bytes, key))
}

/// Find `key` as a NUL-terminated UTF-16LE string and read the value after it
fn version_resource_value(bytes: &[u8], key: &str) -> Option<String> {
    let mut needle: Vec<u8> = key.encode_utf16().flat_map(u16::to_le_bytes).collect();
    needle.extend_from_slice(&[0, 0]);

    let start = bytes
        .windows(needle.len())
        .enumerate()
        .find(|(index, window)| index % 2 == 0 && *window == needle.as_slice())
        .map(|(index, _)| index + needle.len())?;

    // Value is DWORD-aligned after the key
    let units: Vec<u16> = bytes[start..]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .skip_while(|&unit| unit == 0)
        .take_while(|&unit| unit != 0)
        .take(MAX_VERSION_UNITS)
        .collect();

    let raw = String::from_utf16(&units).ok()?;
    normalize_version(&raw)
}

/// `23, 1, 0, 45` and `23.1.0.45 (release)` both become `23.1.0.45`
fn normalize_version(raw: &str) -> Option<String> {
    let matched = VERSION_RE.find(raw)?.as_str();
    Some(
        matched
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect(),
    )
}

/// MSFT type libraries store `major | minor << 16` at offset 24
fn msft_version(bytes: &[u8]) -> Option<String> {
    let packed = read_u32(bytes, 24)?;
    let major = packed & 0xffff;
    let minor = packed >> 16;
    Some(format!("{}.{}", major, minor))
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}
