use crate::args::modification_required;
use crate::error::ShimError;
use crate::hook::inject_hook;
use crate::path::{HOOK_NAME, HookLocator};
use crate::runtime::Runtime;
use crate::spec::BundleSpec;
use std::path::PathBuf;

fn locate_hook(hooks: &HookLocator) -> Result<PathBuf, ShimError> {
    let path = hooks.locate(HOOK_NAME)?;
    tracing::info!("Prestart hook path: {:?}", path);
    Ok(path)
}

/// Runtime shim that adds the cgroupfs prestart hook on `create`.
///
/// Every invocation is forwarded unchanged to the wrapped runtime. When the
/// arguments describe a `create`, the bundle spec is patched first; if that
/// fails the invocation stops and the wrapped runtime is never called.
pub struct CgroupfsRuntime<R, S> {
    runtime: R,
    spec: S,
    hooks: HookLocator,
}

impl<R: Runtime, S: BundleSpec> CgroupfsRuntime<R, S> {
    pub fn new(runtime: R, spec: S, hooks: HookLocator) -> Self {
        Self {
            runtime,
            spec,
            hooks,
        }
    }

    pub fn spec(&self) -> &S {
        &self.spec
    }

    /// Resolves the hook binary on `PATH`, or at its fallback install path.
    pub fn resolve_hook_path(&self) -> Result<PathBuf, ShimError> {
        locate_hook(&self.hooks)
    }

    fn modify_spec(&mut self) -> Result<(), ShimError> {
        self.spec.load().map_err(|e| ShimError::SpecLoad(Box::new(e)))?;

        let hooks = &self.hooks;
        self.spec
            .modify(&mut |spec| {
                let path = locate_hook(hooks)?;
                inject_hook(spec, &path).map(|_| ())
            })
            .map_err(|e| ShimError::Inject(Box::new(e)))?;

        self.spec
            .flush()
            .map_err(|e| ShimError::SpecFlush(Box::new(e)))?;

        Ok(())
    }
}

impl<R: Runtime, S: BundleSpec> Runtime for CgroupfsRuntime<R, S> {
    fn exec(&mut self, args: &[String]) -> Result<(), ShimError> {
        if modification_required(args) {
            self.modify_spec()?;
        }

        tracing::info!("Forwarding command to runtime");
        self.runtime.exec(args)
    }
}
