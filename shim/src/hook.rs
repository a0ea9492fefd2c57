//! Prestart hook injection into an OCI runtime spec.

use crate::error::ShimError;
use crate::path::HOOK_NAME;
use oci_spec::runtime::{HookBuilder, Hooks, Spec};
use std::path::Path;

/// Returns true if `spec` already declares a prestart hook pointing at our hook binary.
#[allow(deprecated)]
pub fn has_hook(spec: &Spec) -> bool {
    spec.hooks()
        .as_ref()
        .and_then(|hooks| hooks.prestart().as_ref())
        .is_some_and(|prestart| {
            prestart
                .iter()
                .any(|hook| hook.path().to_string_lossy().contains(HOOK_NAME))
        })
}

/// Appends the cgroupfs prestart hook to `spec`.
///
/// Existing prestart entries are kept in order. If any of them already
/// points at the hook binary the spec is left untouched and `false` is
/// returned, so repeated `create` calls and nested shims add it only once.
#[allow(deprecated)]
pub fn inject_hook(spec: &mut Spec, hook_path: &Path) -> Result<bool, ShimError> {
    if has_hook(spec) {
        tracing::info!("Existing cgroupfs prestart hook in OCI spec file");
        return Ok(false);
    }

    let hook = HookBuilder::default()
        .path(hook_path)
        .args(vec![
            hook_path.to_string_lossy().to_string(),
            "prestart".to_string(),
        ])
        .build()?;

    let mut hooks = spec.hooks().clone().unwrap_or_default();
    let mut prestart = hooks.prestart().clone().unwrap_or_default();
    prestart.push(hook);
    hooks.set_prestart(Some(prestart));
    spec.set_hooks(Some(hooks));

    tracing::info!("Added prestart hook {:?}", hook_path);
    Ok(true)
}
