mod args;
mod config;
mod error;
mod hook;
mod path;
mod runtime;
mod shim;
mod spec;

pub use args::{bundle_dir, is_bundle_flag, modification_required};
pub use config::{
    CONFIG_DEFAULT_PATH, CONFIG_PATH_ENV, Config, HookConfig, RuntimeConfig, RuntimeMode,
};
pub use error::ShimError;
pub use hook::{has_hook, inject_hook};
pub use path::{
    HOOK_DEFAULT_PATH, HOOK_NAME, HookLocator, find_runtime, lookup_path, system_path,
};
pub use runtime::{Runtime, SpawnRuntime, SyscallExecRuntime};
pub use shim::CgroupfsRuntime;
pub use spec::{BundleSpec, FileBundleSpec, SPEC_FILE_NAME, SpecModifier};
