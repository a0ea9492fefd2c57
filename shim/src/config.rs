use crate::error::ShimError;
use crate::path::HOOK_DEFAULT_PATH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the runtime configuration file.
pub const CONFIG_DEFAULT_PATH: &str = "/etc/cgroupfs-container-runtime/config.toml";

/// Environment variable overriding [`CONFIG_DEFAULT_PATH`].
pub const CONFIG_PATH_ENV: &str = "CGROUPFS_CONTAINER_RUNTIME_CONFIG";

/// How the delegate runtime is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Replace the shim process with the runtime.
    #[default]
    Exec,
    /// Run the runtime as a child and exit with its status.
    Spawn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Runtime names or paths, tried in order.
    pub runtimes: Vec<String>,
    pub mode: RuntimeMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            runtimes: vec!["docker-runc".to_string(), "runc".to_string()],
            mode: RuntimeMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HookConfig {
    /// Used when the hook is not found on `PATH`.
    pub path: PathBuf,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(HOOK_DEFAULT_PATH),
        }
    }
}

/// Top-level runtime configuration (maps to `config.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub runtime: RuntimeConfig,
    pub hook: HookConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_file: None,
            runtime: RuntimeConfig::default(),
            hook: HookConfig::default(),
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self, ShimError> {
        toml::from_str(content).map_err(|e| ShimError::Config(e.to_string()))
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, ShimError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map_err(|e| match e {
                ShimError::Config(msg) => {
                    ShimError::Config(format!("{}: {}", path.display(), msg))
                }
                other => other,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ShimError::Config(format!("{}: {}", path.display(), e))),
        }
    }

    /// The config file path, honoring [`CONFIG_PATH_ENV`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_DEFAULT_PATH))
    }

    pub fn load() -> Result<Self, ShimError> {
        Self::from_file(&Self::default_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_file, None);
        assert_eq!(config.runtime.runtimes, vec!["docker-runc", "runc"]);
        assert_eq!(config.runtime.mode, RuntimeMode::Exec);
        assert_eq!(config.hook.path, PathBuf::from(HOOK_DEFAULT_PATH));
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            log-level = "debug"
            log-file = "/var/log/cgroupfs-container-runtime.log"

            [runtime]
            runtimes = ["/usr/local/sbin/runc"]
            mode = "spawn"

            [hook]
            path = "/opt/cgroupfs/bin/cgroupfs-container-runtime-hook"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/var/log/cgroupfs-container-runtime.log"))
        );
        assert_eq!(config.runtime.runtimes, vec!["/usr/local/sbin/runc"]);
        assert_eq!(config.runtime.mode, RuntimeMode::Spawn);
        assert_eq!(
            config.hook.path,
            PathBuf::from("/opt/cgroupfs/bin/cgroupfs-container-runtime-hook")
        );
    }

    #[test]
    fn test_parse_partial_keeps_other_defaults() {
        let config = Config::parse("[runtime]\nmode = \"spawn\"\n").unwrap();
        assert_eq!(config.runtime.mode, RuntimeMode::Spawn);
        assert_eq!(config.runtime.runtimes, vec!["docker-runc", "runc"]);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_parse_invalid() {
        let result = Config::parse("[runtime]\nmode = \"fork\"\n");
        assert!(matches!(result, Err(ShimError::Config(_))));
    }

    #[test]
    fn test_from_file_missing_returns_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_file_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log-level = ").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ShimError::Config(_))));
    }

    #[test]
    fn test_from_file_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[runtime]\nmode = \"fork\"\n").unwrap();

        match Config::from_file(&path) {
            Err(ShimError::Config(msg)) => {
                assert!(msg.starts_with(&path.display().to_string()));
                assert!(msg.contains("fork"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_file_matches_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let content = "log-level = \"info\"\n[runtime]\nmode = \"spawn\"\n";
        std::fs::write(&path, content).unwrap();

        assert_eq!(
            Config::from_file(&path).unwrap(),
            Config::parse(content).unwrap()
        );
    }
}
