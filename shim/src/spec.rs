//! Load / modify / flush access to a bundle's `config.json`.

use crate::args::bundle_dir;
use crate::error::ShimError;
use oci_spec::runtime::Spec;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the runtime spec inside a bundle directory.
pub const SPEC_FILE_NAME: &str = "config.json";

/// Mutation applied to a loaded spec.
pub type SpecModifier<'a> = &'a mut dyn FnMut(&mut Spec) -> Result<(), ShimError>;

/// An OCI runtime spec that is loaded, modified in memory and written back.
pub trait BundleSpec {
    fn load(&mut self) -> Result<(), ShimError>;

    fn modify(&mut self, modifier: SpecModifier<'_>) -> Result<(), ShimError>;

    fn flush(&self) -> Result<(), ShimError>;
}

#[derive(Debug)]
enum Location {
    File(PathBuf),
    Args(Vec<String>),
}

/// The `config.json` of a bundle on disk.
///
/// When built from the runtime arguments the bundle is only resolved on
/// [`BundleSpec::load`], so invocations that never load the spec never
/// look at the bundle flag or the working directory.
#[derive(Debug)]
pub struct FileBundleSpec {
    location: Location,
    spec: Option<Spec>,
}

impl FileBundleSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            spec: None,
        }
    }

    /// Accessor for the bundle named by `--bundle`, or the current
    /// directory when the flag is absent.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let args = args.iter().map(|a| a.as_ref().to_string()).collect();
        Self {
            location: Location::Args(args),
            spec: None,
        }
    }

    /// Path of the spec file this accessor reads and writes.
    pub fn resolve_path(&self) -> Result<PathBuf, ShimError> {
        match &self.location {
            Location::File(path) => Ok(path.clone()),
            Location::Args(args) => {
                let bundle = match bundle_dir(args)? {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                Ok(bundle.join(SPEC_FILE_NAME))
            }
        }
    }
}

impl BundleSpec for FileBundleSpec {
    fn load(&mut self) -> Result<(), ShimError> {
        let path = self.resolve_path()?;
        tracing::debug!("Using OCI specification file {:?}", path);

        let spec = Spec::load(&path)?;
        self.location = Location::File(path);
        self.spec = Some(spec);
        Ok(())
    }

    fn modify(&mut self, modifier: SpecModifier<'_>) -> Result<(), ShimError> {
        let spec = self.spec.as_mut().ok_or(ShimError::SpecNotLoaded)?;
        modifier(spec)
    }

    fn flush(&self) -> Result<(), ShimError> {
        let (spec, path) = match (&self.spec, &self.location) {
            (Some(spec), Location::File(path)) => (spec, path),
            _ => return Err(ShimError::SpecNotLoaded),
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // write next to the target so the rename stays on one filesystem
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, spec)?;
        file.flush()?;

        if let Ok(metadata) = std::fs::metadata(path) {
            std::fs::set_permissions(file.path(), metadata.permissions())?;
        }

        file.persist(path).map_err(|e| ShimError::Io(e.error))?;
        tracing::debug!("Wrote OCI specification to {:?}", path);
        Ok(())
    }
}
