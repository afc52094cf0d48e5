//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_CACHE__TTL_SECS=60`). Every knob
//! has a default so an empty environment yields a working `Settings`.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> { Self::load_in(Path::new(".")) }

    /// Load from the config files found in `dir`. Missing files are skipped.
    pub fn load_in(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self { Self { figment } }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        match env {
            "prod" | "production" => {
                let endpoint: Option<String> = self.figment.extract_inner("remote.endpoint").ok();
                if endpoint.as_deref().is_some_and(|e| e.starts_with("http://")) {
                    tracing::warn!("remote.endpoint uses plain http in production");
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub search: SearchSettings,
    pub cache: CacheSettings,
    pub retry: RetrySettings,
    pub breakers: BreakerSettings,
    pub remote: RemoteSettings,
    pub orchestrator: OrchestratorSettings,
}

impl Settings {
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |msg: &str| Err(crate::Error::InvalidConfig(msg.to_string()));
        if self.cache.max_size == 0 { return invalid("cache.max_size must be > 0"); }
        if self.search.top_k == 0 { return invalid("search.top_k must be > 0"); }
        if self.breakers.generator.failure_threshold == 0 || self.breakers.quick.failure_threshold == 0 {
            return invalid("breaker failure_threshold must be > 0");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory of `*.json` collections. Loaded on top of the built-in dataset.
    pub documents_dir: Option<String>,
    /// JSON file promoted patterns are persisted to.
    pub patterns_file: Option<String>,
    pub use_builtin: bool,
}

impl Default for DataSettings {
    fn default() -> Self { Self { documents_dir: None, patterns_file: None, use_builtin: true } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub top_k: usize,
    /// How many ranked documents per domain the foundation considers.
    pub foundation_top_k: usize,
}

impl Default for SearchSettings {
    fn default() -> Self { Self { top_k: 10, foundation_top_k: 3 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub max_size: usize,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration { Duration::from_secs(self.ttl_secs) }
}

impl Default for CacheSettings {
    fn default() -> Self { Self { ttl_secs: 3600, max_size: 100 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub retries: u32,
    pub initial_delay_ms: u64,
}

impl RetrySettings {
    pub fn initial_delay(&self) -> Duration { Duration::from_millis(self.initial_delay_ms) }
}

impl Default for RetrySettings {
    fn default() -> Self { Self { retries: 2, initial_delay_ms: 1500 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerEntry {
    pub failure_threshold: u32,
    pub reset_timeout_ms: u64,
}

impl BreakerEntry {
    pub fn reset_timeout(&self) -> Duration { Duration::from_millis(self.reset_timeout_ms) }
}

/// Two independent breakers: one guarding full generations, a faster one for quick mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerSettings {
    pub generator: BreakerEntry,
    pub quick: BreakerEntry,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            generator: BreakerEntry { failure_threshold: 3, reset_timeout_ms: 30_000 },
            quick: BreakerEntry { failure_threshold: 3, reset_timeout_ms: 5_000 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Generator endpoint. Without one the orchestrator runs foundation-only.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl Default for RemoteSettings {
    fn default() -> Self { Self { endpoint: None, api_key: None, timeout_secs: 30 } }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    /// Save successful adaptations as `generated` patterns.
    pub promote_generated: bool,
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
