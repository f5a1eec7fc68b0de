use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::encoder::{DEFAULT_DIMENSION, DEFAULT_MODEL};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub encoder: EncoderSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_profiles_path")]
    pub profiles_path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            profiles_path: default_profiles_path(),
        }
    }
}

fn default_profiles_path() -> String { "data/profiles.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct EncoderSettings {
    /// `hash` or `fastembed`
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Maximum cached profile embeddings; 0 disables the cache
    #[serde(default = "default_cache_size")]
    pub cache_size: u64,
    pub cache_ttl_secs: Option<u64>,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model_name: default_model_name(),
            dimension: default_dimension(),
            cache_size: default_cache_size(),
            cache_ttl_secs: None,
        }
    }
}

fn default_backend() -> String { "hash".to_string() }
fn default_model_name() -> String { DEFAULT_MODEL.to_string() }
fn default_dimension() -> usize { DEFAULT_DIMENSION }
fn default_cache_size() -> u64 { 10_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_k")]
    pub default_top_k: i64,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: i64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
        }
    }
}

impl MatchingSettings {
    /// Requested `top_k`, or the configured default, capped at `max_top_k`
    pub fn resolve_top_k(&self, requested: Option<i64>) -> i64 {
        let wanted = requested.unwrap_or(self.default_top_k);
        let top_k = wanted.min(self.max_top_k);
        if top_k < wanted {
            tracing::warn!("top_k {} capped to {}", wanted, top_k);
        }
        top_k
    }
}

fn default_top_k() -> i64 { 5 }
fn default_max_top_k() -> i64 { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LUME__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LUME__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path (`CONFIG_PATH`)
    ///
    /// Replaces the `config/` files; environment overrides still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }
}

/// Apply the un-prefixed environment variables the service also honours
///
/// `USERS_JSON_PATH` overrides `store.profiles_path` and
/// `EMBEDDING_MODEL_NAME` overrides `encoder.model_name`.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(path) = env::var("USERS_JSON_PATH") {
        builder = builder.set_override("store.profiles_path", path)?;
    }
    if let Ok(model) = env::var("EMBEDDING_MODEL_NAME") {
        builder = builder.set_override("encoder.model_name", model)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.encoder.backend, "hash");
        assert_eq!(settings.encoder.dimension, 384);
        assert_eq!(settings.matching.default_top_k, 5);
        assert_eq!(settings.matching.max_top_k, 20);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_resolve_top_k() {
        let matching = MatchingSettings {
            default_top_k: 8,
            max_top_k: 10,
        };
        assert_eq!(matching.resolve_top_k(None), 8);
        assert_eq!(matching.resolve_top_k(Some(3)), 3);
        assert_eq!(matching.resolve_top_k(Some(15)), 10);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lume-semantic-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[encoder]\nbackend = \"fastembed\"\ncache_size = 0\n\n[matching]\nmax_top_k = 10\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.encoder.backend, "fastembed");
        assert_eq!(settings.encoder.cache_size, 0);
        assert_eq!(settings.matching.max_top_k, 10);
        assert_eq!(settings.store.profiles_path, "data/profiles.json");

        std::fs::remove_file(path).ok();
    }
}
