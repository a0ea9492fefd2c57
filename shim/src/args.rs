//! Inspection of the argument vector handed to the runtime.
//!
//! Arguments are never rewritten here. The shim only looks at them to decide
//! whether the bundle's spec has to be patched, and where that bundle lives.

use crate::error::ShimError;
use std::path::PathBuf;

/// Returns true if `arg` is the `--bundle` / `-b` flag in its separate-value form.
///
/// The number of leading dashes is not significant, so `-bundle` and `--b`
/// are accepted as well.
pub fn is_bundle_flag(arg: &str) -> bool {
    if !arg.starts_with('-') {
        return false;
    }

    matches!(arg.trim_start_matches('-'), "b" | "bundle")
}

/// Decides whether the invocation is a `create` that needs the spec patched.
///
/// A value consumed by a preceding bundle flag is never treated as the
/// subcommand, so `--bundle create` alone does not trigger a modification.
pub fn modification_required<S: AsRef<str>>(args: &[S]) -> bool {
    let mut previous_was_bundle = false;

    for arg in args {
        let arg = arg.as_ref();

        if !previous_was_bundle && is_bundle_flag(arg) {
            previous_was_bundle = true;
            continue;
        }

        if !previous_was_bundle && arg == "create" {
            tracing::info!("'create' command detected; modification required");
            return true;
        }

        previous_was_bundle = false;
    }

    tracing::info!("No modification required");
    false
}

/// Extracts the bundle directory from the arguments, if one was given.
///
/// Supports `--bundle <dir>`, `-b <dir>`, `--bundle=<dir>` and `-b=<dir>`.
pub fn bundle_dir<S: AsRef<str>>(args: &[S]) -> Result<Option<PathBuf>, ShimError> {
    let mut iter = args.iter().map(AsRef::as_ref);

    while let Some(arg) = iter.next() {
        if let Some((flag, value)) = arg.split_once('=') {
            if !is_bundle_flag(flag) {
                continue;
            }
            if value.is_empty() {
                return Err(ShimError::InvalidArgument(format!(
                    "{} option needs a non-empty value",
                    flag
                )));
            }
            return Ok(Some(PathBuf::from(value)));
        }

        if is_bundle_flag(arg) {
            return match iter.next() {
                Some(value) => Ok(Some(PathBuf::from(value))),
                None => Err(ShimError::InvalidArgument(format!(
                    "{} option needs an argument",
                    arg
                ))),
            };
        }
    }

    Ok(None)
}
