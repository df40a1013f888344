use std::time::Duration;

use gqlsync_appsync::AppSyncConfig;
use gqlsync_reconcile::RetryPolicy;
use serde::Deserialize;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gqlsync.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub aws: AppSyncConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // AWS validations
        if self.aws.timeout_ms == Some(0) {
            return Err("aws.timeout_ms must be > 0".into());
        }
        if self.aws.region.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err("aws.region must not be empty".into());
        }
        // Retry validations
        if self.retry.max_attempts == Some(0) {
            return Err("retry.max_attempts must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Pause between attempts after a schema-lock conflict
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    /// Unbounded when absent
    #[serde(default)]
    pub max_attempts: Option<u32>,
}
fn default_pause_ms() -> u64 {
    1000
}
impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
            max_attempts: None,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::default().with_pause(Duration::from_millis(self.pause_ms));
        match self.max_attempts {
            Some(max) => policy.with_max_attempts(max),
            None => policy,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable logs
    #[serde(default)]
    pub json: bool,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

pub mod loader {
    use super::{AppConfig, DEFAULT_CONFIG_FILE};
    use config::{Config, Environment, File};
    use std::path::{Path, PathBuf};

    /// Load the config file, apply `GQLSYNC__SECTION__KEY` overrides, validate.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(format!("config file not found: {}", p.display()));
                }
                builder = builder.add_source(File::from(p.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., GQLSYNC__AWS__REGION=eu-west-1
        builder = builder.add_source(
            Environment::with_prefix("GQLSYNC")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::loader::load_config;
    use super::*;
    use std::{env, fs};

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("gqlsync.toml");
        fs::write(&path, content).expect("write toml");
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.retry.pause_ms, 1000);
        assert!(cfg.retry.max_attempts.is_none());
        assert!(cfg.aws.region.is_none());
    }

    #[test]
    fn test_file_and_env_override() {
        let (_dir, path) = write_config(
            r#"
[aws]
region = "eu-west-1"
endpoint = "http://localhost:4566"
timeout_ms = 5000

[retry]
pause_ms = 250
max_attempts = 5

[logging]
level = "debug"
json = true
"#,
        );

        let cfg = load_config(Some(&path)).expect("should parse config");
        assert_eq!(cfg.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cfg.aws.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(cfg.aws.timeout_ms, Some(5000));
        assert_eq!(cfg.retry.max_attempts, Some(5));
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);

        // Env override should win over file
        unsafe {
            env::set_var("GQLSYNC__RETRY__PAUSE_MS", "40");
        }
        let cfg_env = load_config(Some(&path)).expect("should parse config with env overrides");
        unsafe {
            env::remove_var("GQLSYNC__RETRY__PAUSE_MS");
        }
        assert_eq!(cfg_env.retry.pause_ms, 40);

        let policy = cfg_env.retry.policy();
        assert_eq!(policy.pause, Duration::from_millis(40));
        assert_eq!(policy.max_attempts, Some(5));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let (_dir, path) = write_config("[logging]\nlevel = \"loud\"\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.contains("logging.level"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let (_dir, path) = write_config("[retry]\nmax_attempts = 0\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.contains("retry.max_attempts"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some(std::path::Path::new("/nonexistent/gqlsync.toml"))).unwrap_err();
        assert!(err.contains("not found"));
    }
}
