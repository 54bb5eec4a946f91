//! CLI configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty file (or no file) yields a ledger
//! with the KuttaKoin launch parameters. Amounts in the `[token]` table are
//! decimal token strings (`"150847000"`, `"0.5"`) because TOML integers stop
//! at `i64`.

use std::path::Path;

use kutta_ledger::GenesisConfig;
use kutta_types::{AccountId, TokenAmount, TokenParams, TypeError};
use kutta_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(#[from] TypeError),
}

/// Top-level configuration for the `kutta` binary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Account that creates the ledger and owns it afterwards.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Log level filter, e.g. "info" or "warn,kutta_ledger=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub token: TokenConfig,
}

/// Genesis parameters as they appear in the `[token]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Hard cap, in whole tokens with optional decimals.
    #[serde(default = "default_cap")]
    pub cap: String,

    #[serde(default = "default_initial_supply")]
    pub initial_supply: String,

    #[serde(default = "default_block_reward_divisor")]
    pub block_reward_divisor: u64,

    #[serde(default = "default_max_block_reward")]
    pub max_block_reward: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_owner() -> String {
    "owner".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_name() -> String {
    TokenParams::DEFAULT_NAME.to_string()
}

fn default_symbol() -> String {
    TokenParams::DEFAULT_SYMBOL.to_string()
}

fn default_cap() -> String {
    TokenParams::DEFAULT_CAP.format_units()
}

fn default_initial_supply() -> String {
    TokenParams::DEFAULT_INITIAL_SUPPLY.format_units()
}

fn default_block_reward_divisor() -> u64 {
    TokenParams::DEFAULT_BLOCK_REWARD_DIVISOR as u64
}

fn default_max_block_reward() -> String {
    TokenParams::DEFAULT_MAX_BLOCK_REWARD.format_units()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn owner_account(&self) -> Result<AccountId, ConfigError> {
        Ok(self.owner.parse()?)
    }

    /// Resolve the configuration into a validated genesis.
    pub fn genesis(&self) -> Result<GenesisConfig, ConfigError> {
        let params = self.token.to_params()?;
        params.validate()?;
        Ok(GenesisConfig {
            owner: self.owner_account()?,
            params,
        })
    }
}

impl TokenConfig {
    /// Convert the decimal strings to base-unit amounts.
    pub fn to_params(&self) -> Result<TokenParams, ConfigError> {
        Ok(TokenParams {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            cap: TokenAmount::parse_units(&self.cap)?,
            initial_supply: TokenAmount::parse_units(&self.initial_supply)?,
            initial_block_reward_divisor: u128::from(self.block_reward_divisor),
            max_block_reward: TokenAmount::parse_units(&self.max_block_reward)?,
        })
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            token: TokenConfig::default(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            cap: default_cap(),
            initial_supply: default_initial_supply(),
            block_reward_divisor: default_block_reward_divisor(),
            max_block_reward: default_max_block_reward(),
        }
    }
}
