use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main configuration structure loaded from safeline.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub system: SystemConfig,
    pub scoring: ScoringConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// System-level configuration for model providers and the database
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub embedding_provider: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub topic_provider: String,
    pub topic_endpoint: String,
    pub database_url: String,
    pub database_ns: String,
    pub database_db: String,
}

/// Tunables for the semantic layer
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub similarity_threshold: f32,
}

/// Runtime configuration sourced purely from the environment
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub database_user: String,
    pub database_pass: String,
    pub http_bind: SocketAddr,
    pub log_level: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            embedding_provider: "openai".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: 1536,
            topic_provider: "remote".to_string(),
            topic_endpoint: String::new(),
            database_url: "ws://127.0.0.1:8000".to_string(),
            database_ns: "safeline".to_string(),
            database_db: "protected".to_string(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.35,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            database_user: "root".to_string(),
            database_pass: "root".to_string(),
            http_bind: "127.0.0.1:5000"
                .parse()
                .expect("default bind address should parse"),
            log_level: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            scoring: ScoringConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut config = Self::default();

        if let Ok(user) = std::env::var("SAFE_DB_USER") {
            config.database_user = user;
        }
        if let Ok(pass) = std::env::var("SAFE_DB_PASS") {
            config.database_pass = pass;
        }
        if let Ok(bind) = std::env::var("SAFE_HTTP_BIND") {
            match bind.parse() {
                Ok(addr) => config.http_bind = addr,
                Err(_) => tracing::warn!("SAFE_HTTP_BIND '{}' is not a socket address", bind),
            }
        }
        config.log_level = std::env::var("SAFE_LOG").ok().filter(|s| !s.is_empty());

        config
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses SAFELINE_CONFIG environment variable or defaults to "safeline.toml".
    pub fn load() -> anyhow::Result<Self> {
        // Load environment variables: SAFE_ENV_FILE if set, else ./.env
        if let Ok(env_path) = std::env::var("SAFE_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path =
            std::env::var("SAFELINE_CONFIG").unwrap_or_else(|_| "safeline.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Apply env overrides (env-first)
        if let Ok(db_url) = std::env::var("SAFE_DB_URL") {
            config.system.database_url = db_url;
        }
        if let Ok(db_ns) = std::env::var("SAFE_DB_NS") {
            config.system.database_ns = db_ns;
        }
        if let Ok(db_name) = std::env::var("SAFE_DB_DB") {
            config.system.database_db = db_name;
        }
        if let Ok(provider) = std::env::var("SAFE_EMBED_PROVIDER") {
            config.system.embedding_provider = provider;
        }
        if let Ok(model) = std::env::var("SAFE_EMBED_MODEL") {
            config.system.embedding_model = model;
        }
        if let Some(dim) = std::env::var("SAFE_EMBED_DIM")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            config.system.embedding_dimensions = dim;
        }
        if let Ok(provider) = std::env::var("SAFE_TOPIC_PROVIDER") {
            config.system.topic_provider = provider;
        }
        if let Ok(endpoint) = std::env::var("SAFE_TOPIC_ENDPOINT") {
            config.system.topic_endpoint = endpoint;
        }

        // Load runtime configuration from environment variables
        config.runtime = RuntimeConfig::load_from_env();

        // Validate configuration

        // Basic database URL format check (warn only; persistence is best-effort)
        if !config.system.database_url.starts_with("ws://")
            && !config.system.database_url.starts_with("wss://")
            && !config.system.database_url.starts_with("http://")
            && !config.system.database_url.starts_with("https://")
        {
            tracing::warn!(
                "Database URL '{}' doesn't start with ws://, wss://, http://, or https://",
                config.system.database_url
            );
        }

        // Clamp the semantic threshold into cosine range
        if !(0.0..=1.0).contains(&config.scoring.similarity_threshold) {
            tracing::warn!(
                "similarity_threshold {} outside [0,1], clamping",
                config.scoring.similarity_threshold
            );
            config.scoring.similarity_threshold =
                config.scoring.similarity_threshold.clamp(0.0, 1.0);
        }

        // Validate provider/dimension coherence
        match config.system.embedding_provider.as_str() {
            "openai" => match config.system.embedding_model.as_str() {
                "text-embedding-3-small" => {
                    if config.system.embedding_dimensions != 1536 {
                        tracing::warn!(
                            "OpenAI text-embedding-3-small should use 1536 dimensions, got {}",
                            config.system.embedding_dimensions
                        );
                    }
                }
                "text-embedding-3-large" => {
                    if config.system.embedding_dimensions != 3072 {
                        tracing::warn!(
                            "OpenAI text-embedding-3-large should use 3072 dimensions, got {}",
                            config.system.embedding_dimensions
                        );
                    }
                }
                _ => tracing::warn!(
                    "Unknown OpenAI embedding model '{}', dimension validation skipped",
                    config.system.embedding_model
                ),
            },
            "fake" | "none" => {}
            _ => tracing::warn!(
                "Unknown embedding provider '{}', validation skipped",
                config.system.embedding_provider
            ),
        }

        Ok(config)
    }
}
