//! Project directory layout and file loading.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dlldiff_core::{Error, Result, parse_dll_number};
use tracing::{debug, warn};

/// Original assets extracted from the ROM
pub const BIN_ASSETS_DIR: &str = "bin/assets";
/// Assets produced by the build
pub const BUILD_ASSETS_DIR: &str = "build/bin/assets";
/// DLL source tree, one directory per DLL
pub const SRC_DLLS_DIR: &str = "src/dlls";

pub const DLLS_TAB_FILE: &str = "DLLS_tab.bin";

/// Which asset tree a file comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Original assets; the "expected" side of every report
    Reference,
    /// Rebuilt assets; the "found" side of every report
    Rebuilt,
}

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    base_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn assets_dir(&self, source: Source) -> PathBuf {
        match source {
            Source::Reference => self.base_dir.join(BIN_ASSETS_DIR),
            Source::Rebuilt => self.base_dir.join(BUILD_ASSETS_DIR),
        }
    }

    pub fn dll_path(&self, source: Source, id: &str) -> PathBuf {
        self.assets_dir(source).join("dlls").join(format!("{}.dll", id))
    }

    pub fn tab_path(&self, source: Source) -> PathBuf {
        self.assets_dir(source).join(DLLS_TAB_FILE)
    }

    /// Find every DLL with a source directory.
    ///
    /// A directory names a DLL when it is a plain number (`src/dlls/12`) or
    /// starts with one (`src/dlls/objects/223_cannon_claw`). Grouping
    /// directories are searched recursively. Results are sorted numerically.
    pub fn discover_dlls(&self) -> Result<Vec<String>> {
        let root = self.base_dir.join(SRC_DLLS_DIR);
        if !root.is_dir() {
            warn!("No DLL source directory @ {}", absolute(&root).display());
            return Ok(Vec::new());
        }

        let mut numbers = Vec::new();
        collect_dll_dirs(&root, &mut numbers)?;
        numbers.sort_unstable();
        numbers.dedup();
        debug!("Discovered {} DLLs under {}", numbers.len(), root.display());

        Ok(numbers.into_iter().map(|n| n.to_string()).collect())
    }
}

fn collect_dll_dirs(dir: &Path, numbers: &mut Vec<usize>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match dll_number_from_dir(&name) {
            Some(number) => numbers.push(number),
            None => collect_dll_dirs(&path, numbers)?,
        }
    }
    Ok(())
}

fn dll_number_from_dir(name: &str) -> Option<usize> {
    let prefix = name.split('_').next()?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    parse_dll_number(prefix).ok()
}

/// Read a file that must exist, reporting its absolute path when it doesn't.
pub fn read_required(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::MissingFile {
            path: absolute(path),
        }),
        Err(e) => Err(e.into()),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
