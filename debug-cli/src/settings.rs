use config::{Config, Environment, File};
use error_common::{DebuggerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use zanzibar_debug::{ClientConfig, ExpanderConfig};

/// Prefix of the environment variables read as settings
pub const ENV_PREFIX: &str = "ZANZIBAR_DEBUG";

/// Settings file picked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "zanzibar-debug.yaml";

/// Debugger settings, layered from defaults, file, environment and flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default = "default_dedupe_calls")]
    pub dedupe_calls: bool,
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_dedupe_calls() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            store_id: String::new(),
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_depth: None,
            dedupe_calls: default_dedupe_calls(),
            deadline_secs: None,
        }
    }
}

/// Values given on the command line; `None` leaves lower layers in place
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub store_id: Option<String>,
    pub max_depth: Option<u32>,
    pub deadline_secs: Option<u64>,
    pub no_dedupe: bool,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// An explicit `config_path` must exist; otherwise
    /// [`DEFAULT_CONFIG_FILE`] is read when present.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(config_path, overrides, None)
    }

    /// Same as [`Settings::load`] with an explicit environment map
    pub fn load_with_env(
        config_path: Option<&Path>,
        overrides: &Overrides,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let mut builder = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true).source(env));

        builder = builder
            .set_override_option("api_url", overrides.api_url.clone())
            .and_then(|b| b.set_override_option("store_id", overrides.store_id.clone()))
            .and_then(|b| b.set_override_option("max_depth", overrides.max_depth))
            .and_then(|b| b.set_override_option("deadline_secs", overrides.deadline_secs))
            .map_err(config_error)?;

        if overrides.no_dedupe {
            builder = builder
                .set_override("dedupe_calls", false)
                .map_err(config_error)?;
        }

        let settings: Settings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)?;

        Ok(settings)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url, &self.store_id)
            .with_api_token(self.api_token.clone())
            .with_request_timeout(self.request_timeout_secs)
    }

    pub fn expander_config(&self) -> ExpanderConfig {
        ExpanderConfig::default()
            .with_max_depth(self.max_depth)
            .with_dedupe(self.dedupe_calls)
            .with_deadline(self.deadline_secs.map(Duration::from_secs))
    }
}

fn config_error(err: config::ConfigError) -> DebuggerError {
    DebuggerError::ConfigError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(None, &Overrides::default(), env(&[])).unwrap();
        assert_eq!(settings.api_url, "http://localhost:8080");
        assert!(settings.store_id.is_empty());
        assert_eq!(settings.request_timeout_secs, 30);
        assert!(settings.dedupe_calls);
    }

    #[test]
    fn test_layering_file_env_flags() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "api_url: http://fga.file:8080\nstore_id: from-file\nmax_depth: 4\nrequest_timeout_secs: 10"
        )
        .unwrap();

        let overrides = Overrides {
            store_id: Some("from-flag".to_string()),
            ..Overrides::default()
        };

        let settings = Settings::load_with_env(
            Some(file.path()),
            &overrides,
            env(&[
                ("ZANZIBAR_DEBUG_API_URL", "http://fga.env:8080"),
                ("ZANZIBAR_DEBUG_STORE_ID", "from-env"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.api_url, "http://fga.env:8080");
        assert_eq!(settings.store_id, "from-flag");
        assert_eq!(settings.max_depth, Some(4));
        assert_eq!(settings.request_timeout_secs, 10);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load_with_env(
            Some(Path::new("/nonexistent/zanzibar-debug.yaml")),
            &Overrides::default(),
            env(&[]),
        );
        assert!(matches!(result, Err(DebuggerError::ConfigError(_))));
    }

    #[test]
    fn test_no_dedupe_flag() {
        let overrides = Overrides {
            no_dedupe: true,
            deadline_secs: Some(3),
            ..Overrides::default()
        };
        let settings = Settings::load_with_env(None, &overrides, env(&[])).unwrap();
        let expander = settings.expander_config();
        assert!(!expander.dedupe_calls);
        assert_eq!(expander.deadline(), Some(Duration::from_secs(3)));
    }
}
