//! Application configuration
//!
//! Layered with the `config` crate: compiled defaults, an optional
//! `arcane-warding.{toml,json,yaml}` file, then `ARCANE_WARDING__*`
//! environment variables (for example `ARCANE_WARDING__SERVER__PORT=4000`
//! or `ARCANE_WARDING__COORDINATOR__ROOM=table-1`).

use std::time::Duration;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::application::services::EngineSettings;
use crate::domain::value_objects::WardRules;
use crate::infrastructure::localization::PhraseCatalog;

const FILE_STEM: &str = "arcane-warding";
const ENV_PREFIX: &str = "ARCANE_WARDING";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Seconds a remote participant has to answer a dialog
    pub timeout_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Seconds before an unused projected ward is withdrawn
    pub expiry_secs: u64,
    /// Seconds between sweeps for expired one-shot subscriptions
    pub sweep_interval_secs: u64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            expiry_secs: 60,
            sweep_interval_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Headless coordinator hosted by the relay
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Room the coordinator joins; none disables it
    pub room: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub ward: WardRules,
    pub confirmation: ConfirmationConfig,
    pub projection: ProjectionConfig,
    /// Path of the phrase catalog
    pub locale_path: String,
    pub server: ServerConfig,
    pub coordinator: CoordinatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ward: WardRules::default(),
            confirmation: ConfirmationConfig::default(),
            projection: ProjectionConfig::default(),
            locale_path: "lang/en.json".to_string(),
            server: ServerConfig::default(),
            coordinator: CoordinatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional file and the environment
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(FILE_STEM).required(false))
                .add_source(environment()),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .build()
            .context("Failed to assemble configuration sources")?
            .try_deserialize::<Self>()
            .context("Invalid configuration")?;
        if config.projection.sweep_interval_secs == 0 {
            anyhow::bail!("projection.sweep_interval_secs must be at least 1");
        }
        if config.confirmation.timeout_secs == 0 {
            anyhow::bail!("confirmation.timeout_secs must be at least 1");
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.projection.sweep_interval_secs)
    }

    /// Load the configured phrase catalog
    pub fn phrase_catalog(&self) -> Result<PhraseCatalog> {
        PhraseCatalog::load(&self.locale_path)
            .with_context(|| format!("Invalid phrase catalog at {}", self.locale_path))
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            rules: self.ward.clone(),
            confirmation_timeout: Duration::from_secs(self.confirmation.timeout_secs),
            projection_expiry: Duration::from_secs(self.projection.expiry_secs),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("ward.charging_schools")
}
