use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShimError {
    #[error("error loading OCI specification for modification: {0}")]
    SpecLoad(Box<ShimError>),

    #[error("error injecting cgroupfs container runtime hook: {0}")]
    Inject(Box<ShimError>),

    #[error("error writing modified OCI specification: {0}")]
    SpecFlush(Box<ShimError>),

    #[error("OCI specification not loaded")]
    SpecNotLoaded,

    #[error("hook executable not found: {0}")]
    HookNotFound(String),

    #[error("runtime not found: {0}")]
    RuntimeNotFound(String),

    #[error("runtime exec failed: {0}")]
    RuntimeExec(String),

    #[error("runtime exited with status {0}")]
    RuntimeExit(i32),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("oci spec error: {0}")]
    OciSpec(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("system error: {0}")]
    System(#[from] nix::errno::Errno),
}

impl From<oci_spec::OciSpecError> for ShimError {
    fn from(e: oci_spec::OciSpecError) -> Self {
        ShimError::OciSpec(e.to_string())
    }
}
