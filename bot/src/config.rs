use crate::error::Error;
use crate::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use steam::{Credentials, SteamId};
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConfigFormat {
    Toml,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    /// Accounts whose inventories are sent to the partner.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Receiver of every outgoing offer.
    pub main: Partner,
    /// Account whose incoming offers are triaged.
    pub main_account: MonitoringAccount,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub destination: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            destination: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub shared_secret: String,
    pub identity_secret: String,
}

impl From<&Account> for Credentials {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            password: account.password.clone(),
            shared_secret: account.shared_secret.clone(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Partner {
    /// 32-bit account id.
    pub partner: u32,
    /// Trade offer access token of the partner.
    pub token: String,
}

impl Partner {
    pub fn steam_id(&self) -> SteamId {
        SteamId::from_account_id(self.partner)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MonitoringAccount {
    pub username: String,
    pub password: String,
    pub shared_secret: String,
}

impl From<&MonitoringAccount> for Credentials {
    fn from(account: &MonitoringAccount) -> Self {
        Self {
            username: account.username.clone(),
            password: account.password.clone(),
            shared_secret: account.shared_secret.clone(),
        }
    }
}

/// Minimum spacing, in seconds, between units of work of each kind.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PacingConfig {
    pub account_secs: u64,
    pub session_secs: u64,
    pub confirmation_list_secs: u64,
    pub confirmation_secs: u64,
    pub received_offers_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            account_secs: 1,
            session_secs: 3,
            confirmation_list_secs: 3,
            confirmation_secs: 1,
            received_offers_secs: 3,
        }
    }
}

impl PacingConfig {
    pub fn none() -> Self {
        Self {
            account_secs: 0,
            session_secs: 0,
            confirmation_list_secs: 0,
            confirmation_secs: 0,
            received_offers_secs: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginFailurePolicy {
    /// Stop the whole run.
    #[default]
    Abort,
    /// Leave the account out and carry on with the rest.
    Skip,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub on_login_failure: LoginFailurePolicy,
    /// Exit with status 0 even after a fatal error.
    pub always_exit_zero: bool,
}

impl Config {
    pub fn load(path: &Path, format: ConfigFormat) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| Error::ConfigRead(path.to_path_buf(), e))?;
        Self::parse(&content, format)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for account in &self.accounts {
            if account.username.trim().is_empty() {
                return Err(Error::Config("account with empty username".into()));
            }
            if !seen.insert(account.username.as_str()) {
                return Err(Error::Config(format!(
                    "account {} is listed more than once",
                    account.username
                )));
            }
        }
        if self.main_account.username.trim().is_empty() {
            return Err(Error::Config("main_account.username is empty".into()));
        }
        Ok(())
    }
}
