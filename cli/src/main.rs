mod logging;

use cgroupfs_shim::{
    CgroupfsRuntime, Config, FileBundleSpec, HookLocator, Runtime, RuntimeMode, ShimError,
    SpawnRuntime, SyscallExecRuntime, find_runtime, system_path,
};

const PROGRAM_NAME: &str = "cgroupfs-container-runtime";

fn collect_args() -> Result<Vec<String>, ShimError> {
    std::env::args_os()
        .map(|arg| {
            arg.into_string().map_err(|arg| {
                ShimError::InvalidArgument(format!("argument is not valid UTF-8: {:?}", arg))
            })
        })
        .collect()
}

fn build_runtime(config: &Config) -> Result<Box<dyn Runtime>, ShimError> {
    let path = find_runtime(&config.runtime.runtimes, system_path().as_deref())?;
    tracing::debug!("Using {:?} runtime at {:?}", config.runtime.mode, path);

    let runtime: Box<dyn Runtime> = match config.runtime.mode {
        RuntimeMode::Exec => Box::new(SyscallExecRuntime::new(path)),
        RuntimeMode::Spawn => Box::new(SpawnRuntime::new(path)),
    };
    Ok(runtime)
}

fn run() -> Result<(), ShimError> {
    let config = Config::load()?;
    logging::init(&config)?;

    let args = collect_args()?;
    tracing::debug!("Invoked with {:?}", args);

    let runtime = build_runtime(&config)?;
    let spec = FileBundleSpec::from_args(&args);
    let hooks = HookLocator::from_env(&config.hook.path);

    let mut shim = CgroupfsRuntime::new(runtime, spec, hooks);
    shim.exec(&args)
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(ShimError::RuntimeExit(code)) => std::process::exit(code),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}: {}", PROGRAM_NAME, e);
            std::process::exit(1);
        }
    }
}
