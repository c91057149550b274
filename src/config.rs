use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::{CategoryWeights, CompatibilityConfig};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub user_profiles: String,
    pub user_basic_info: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    /// Drop dealbreaker-triggered candidates instead of flagging them
    #[serde(default)]
    pub suppress_dealbreakers: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
    #[serde(default = "default_warning_gap")]
    pub warning_gap: f64,
    #[serde(default = "default_neutral_score")]
    pub neutral_score: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            scale_max: default_scale_max(),
            warning_gap: default_warning_gap(),
            neutral_score: default_neutral_score(),
        }
    }
}

fn default_scale_max() -> f64 { 10.0 }
fn default_warning_gap() -> f64 { 6.0 }
fn default_neutral_score() -> f64 { 0.5 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_the_basics_weight")]
    pub the_basics: f64,
    #[serde(default = "default_who_you_are_weight")]
    pub who_you_are: f64,
    #[serde(default = "default_relationship_style_weight")]
    pub relationship_style: f64,
    #[serde(default = "default_lifestyle_weight")]
    pub lifestyle: f64,
    #[serde(default = "default_life_future_weight")]
    pub life_future: f64,
    #[serde(default = "default_the_deeper_stuff_weight")]
    pub the_deeper_stuff: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            the_basics: default_the_basics_weight(),
            who_you_are: default_who_you_are_weight(),
            relationship_style: default_relationship_style_weight(),
            lifestyle: default_lifestyle_weight(),
            life_future: default_life_future_weight(),
            the_deeper_stuff: default_the_deeper_stuff_weight(),
        }
    }
}

fn default_the_basics_weight() -> f64 { 0.25 }
fn default_who_you_are_weight() -> f64 { 0.20 }
fn default_relationship_style_weight() -> f64 { 0.20 }
fn default_lifestyle_weight() -> f64 { 0.15 }
fn default_life_future_weight() -> f64 { 0.10 }
fn default_the_deeper_stuff_weight() -> f64 { 0.10 }

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
fn default_log_format() -> String { "full".to_string() }

impl ScoringSettings {
    /// Build the immutable scoring configuration, rejecting bad weights
    pub fn to_compatibility_config(&self) -> Result<CompatibilityConfig, ConfigError> {
        let weights = CategoryWeights {
            the_basics: self.weights.the_basics,
            who_you_are: self.weights.who_you_are,
            relationship_style: self.weights.relationship_style,
            lifestyle: self.weights.lifestyle,
            life_future: self.weights.life_future,
            the_deeper_stuff: self.weights.the_deeper_stuff,
        };

        if !weights.is_valid() {
            return Err(ConfigError::Message(format!(
                "scoring weights must be non-negative and sum to 1.0 (got {})",
                weights.sum()
            )));
        }

        if !self.scale_max.is_finite() || self.scale_max <= 1.0 {
            return Err(ConfigError::Message(format!(
                "scoring.scale_max must be greater than 1 (got {})",
                self.scale_max
            )));
        }

        if !(0.0..=1.0).contains(&self.neutral_score) {
            return Err(ConfigError::Message(format!(
                "scoring.neutral_score must be within [0, 1] (got {})",
                self.neutral_score
            )));
        }

        Ok(CompatibilityConfig {
            weights,
            scale_max: self.scale_max,
            warning_gap: self.warning_gap,
            neutral_score: self.neutral_score,
        })
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with COMPAT_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., COMPAT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("COMPAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("COMPAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known unprefixed environment variables on top of the config
///
/// `DATABASE_URL` and the `APPWRITE_*` variables are what the hosting
/// platform injects.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("database.url", env::var("DATABASE_URL").ok()),
        ("cache.redis_url", env::var("REDIS_URL").ok()),
        ("appwrite.endpoint", env::var("APPWRITE_ENDPOINT").ok()),
        ("appwrite.api_key", env::var("APPWRITE_API_KEY").ok()),
        ("appwrite.project_id", env::var("APPWRITE_PROJECT_ID").ok()),
        ("appwrite.database_id", env::var("APPWRITE_DATABASE_ID").ok()),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (key, value) in overrides {
        if let Some(value) = value {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
