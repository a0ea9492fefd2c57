//! Executable lookup on a `PATH`-style search path.

use crate::error::ShimError;
use nix::unistd::{AccessFlags, access};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Name of the prestart hook binary installed alongside the runtime.
pub const HOOK_NAME: &str = "cgroupfs-container-runtime-hook";

/// Where packages install the hook when it is not on `PATH`.
pub const HOOK_DEFAULT_PATH: &str = "/usr/bin/cgroupfs-container-runtime-hook";

/// Returns the current `PATH`, if set.
pub fn system_path() -> Option<OsString> {
    std::env::var_os("PATH")
}

fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

/// Resolves `name` the way a shell would.
///
/// A name containing a path separator is checked as-is and never searched
/// for. Otherwise each directory of `search_path` is tried in order and the
/// first executable regular file wins.
pub fn lookup_path(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    std::env::split_paths(search_path?)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|path| is_executable(path))
}

/// Locates the hook executable, falling back to a fixed install path.
#[derive(Debug, Clone)]
pub struct HookLocator {
    search_path: Option<OsString>,
    fallback: PathBuf,
}

impl HookLocator {
    pub fn new(search_path: Option<OsString>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            search_path,
            fallback: fallback.into(),
        }
    }

    /// A locator over the process `PATH`.
    pub fn from_env(fallback: impl Into<PathBuf>) -> Self {
        Self::new(system_path(), fallback)
    }

    pub fn locate(&self, name: &str) -> Result<PathBuf, ShimError> {
        if let Some(path) = lookup_path(name, self.search_path.as_deref()) {
            return Ok(path);
        }

        tracing::debug!(
            "{} not found on search path, trying {:?}",
            name,
            self.fallback
        );

        std::fs::metadata(&self.fallback).map_err(|e| {
            ShimError::HookNotFound(format!("{} (fallback {:?}: {})", name, self.fallback, e))
        })?;

        Ok(self.fallback.clone())
    }
}

/// Picks the delegate runtime: the first of `candidates` that resolves.
pub fn find_runtime<S: AsRef<str>>(
    candidates: &[S],
    search_path: Option<&OsStr>,
) -> Result<PathBuf, ShimError> {
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if let Some(path) = lookup_path(candidate, search_path) {
            tracing::debug!("Found runtime {} at {:?}", candidate, path);
            return Ok(path);
        }
        tracing::debug!("Runtime candidate {} not found", candidate);
    }

    let names: Vec<&str> = candidates.iter().map(AsRef::as_ref).collect();
    Err(ShimError::RuntimeNotFound(format!(
        "none of {:?} found on PATH",
        names
    )))
}
