use crate::error::ShimError;
use nix::unistd::execve;
use std::ffi::{CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// An OCI runtime that accepts the full argument vector of an invocation.
///
/// `args[0]` is the name the runtime was invoked as; implementations replace
/// it with the path of the binary they run. Process-replacing
/// implementations only return on failure.
pub trait Runtime {
    fn exec(&mut self, args: &[String]) -> Result<(), ShimError>;
}

impl<R: Runtime + ?Sized> Runtime for Box<R> {
    fn exec(&mut self, args: &[String]) -> Result<(), ShimError> {
        (**self).exec(args)
    }
}

fn forwarded_args<'a>(path: &'a Path, args: &'a [String]) -> (&'a Path, &'a [String]) {
    (path, args.get(1..).unwrap_or_default())
}

fn to_cstring(value: &OsStr) -> Result<CString, ShimError> {
    CString::new(value.as_bytes())
        .map_err(|e| ShimError::InvalidArgument(format!("embedded nul byte: {}", e)))
}

/// Replaces the current process with the runtime binary.
#[derive(Debug, Clone)]
pub struct SyscallExecRuntime {
    path: PathBuf,
}

impl SyscallExecRuntime {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Runtime for SyscallExecRuntime {
    fn exec(&mut self, args: &[String]) -> Result<(), ShimError> {
        let (path, rest) = forwarded_args(&self.path, args);

        let program = to_cstring(path.as_os_str())?;
        let mut argv = Vec::with_capacity(rest.len() + 1);
        argv.push(program.clone());
        for arg in rest {
            argv.push(to_cstring(OsStr::new(arg))?);
        }

        let mut env = Vec::new();
        for (key, value) in std::env::vars_os() {
            let mut entry = key.as_bytes().to_vec();
            entry.push(b'=');
            entry.extend_from_slice(value.as_bytes());
            env.push(to_cstring(OsStr::from_bytes(&entry))?);
        }

        tracing::debug!("Exec {:?} with args {:?}", path, rest);

        match execve(&program, &argv, &env) {
            Ok(never) => match never {},
            Err(errno) => Err(ShimError::RuntimeExec(format!(
                "could not exec {:?}: {}",
                path, errno
            ))),
        }
    }
}

/// Runs the runtime binary as a child process and waits for it.
#[derive(Debug, Clone)]
pub struct SpawnRuntime {
    path: PathBuf,
}

impl SpawnRuntime {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Runtime for SpawnRuntime {
    fn exec(&mut self, args: &[String]) -> Result<(), ShimError> {
        let (path, rest) = forwarded_args(&self.path, args);

        tracing::debug!("Spawning {:?} with args {:?}", path, rest);

        let status = Command::new(path)
            .args(rest)
            .status()
            .map_err(|e| ShimError::RuntimeExec(format!("could not run {:?}: {}", path, e)))?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ShimError::RuntimeExit(code)),
            // terminated by a signal, report it the way a shell would
            None => {
                use std::os::unix::process::ExitStatusExt;
                let signal = status.signal().unwrap_or_default();
                Err(ShimError::RuntimeExit(128 + signal))
            }
        }
    }
}
