//! Configuration management
//!
//! Two kinds of configuration live here:
//! - [`Settings`]: tool settings with layered loading (compiled defaults →
//!   global `rushctl.toml` → `./rushctl.toml` → `RUSHCTL_*` env vars),
//! - [`BootConfig`]: the chain bootstrap runbook (`boot_config.json`), read
//!   once and iterated over, plus the image repository [`Credentials`]
//!   (`credentials.ini`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Asset, BandwidthWeight, RamQuota};

/// Unified tool settings for rushctl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Image name prefix, e.g. `asteroid_rush/`
    pub image_prefix: String,
    /// Directory holding the `Dockerfile.*` family
    pub dockerfiles_dir: PathBuf,
    /// Directory holding the per-environment deployment dirs (`<env>/.env`)
    pub deploy_dir: PathBuf,
    /// INI file with the `[repository]` login/password
    pub credentials_file: PathBuf,
    /// Wallet daemon URL handed to the chain client
    pub wallet_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_prefix: "asteroid_rush/".to_string(),
            dockerfiles_dir: PathBuf::from("./dockerfiles"),
            deploy_dir: PathBuf::from("."),
            credentials_file: PathBuf::from("./credentials.ini"),
            wallet_url: "http://127.0.0.1:6666".to_string(),
        }
    }
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rushctl").map(|dirs| dirs.config_dir().join("rushctl.toml"))
}

impl Settings {
    /// Load settings with layered precedence (later wins):
    /// defaults, global config, `./rushctl.toml`, `RUSHCTL_*` env vars.
    pub fn load() -> ApplicationResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(global) = global_config_path() {
            builder = builder.add_source(File::from(global).required(false));
        }

        let settings: Settings = builder
            .add_source(File::new("rushctl", FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("RUSHCTL"))
            .build()?
            .try_deserialize()?;

        Ok(settings.expanded())
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expanded(mut self) -> Self {
        self.dockerfiles_dir = expand_path(&self.dockerfiles_dir);
        self.deploy_dir = expand_path(&self.deploy_dir);
        self.credentials_file = expand_path(&self.credentials_file);
        self
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl From<config::ConfigError> for ApplicationError {
    fn from(e: config::ConfigError) -> Self {
        ApplicationError::Config {
            message: e.to_string(),
        }
    }
}

/// Image repository credentials from `credentials.ini`, section `[repository]`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let cfg = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Ini))
            .build()
            .map_err(|e| ApplicationError::Config {
                message: format!("read {}: {}", path.display(), e),
            })?;
        cfg.get::<Credentials>("repository")
            .map_err(|e| ApplicationError::Config {
                message: format!("parse {}: {}", path.display(), e),
            })
    }
}

/// A token created at boot (system or support).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenSpec {
    /// Currency symbol, e.g. `RUSH`
    pub symbol: String,
    /// Maximum supply in base units
    pub max_supply: u64,
    /// Fraction of the maximum supply issued at boot (0 = none)
    #[serde(default)]
    pub supply: f64,
    /// Decimal places of the currency
    pub precision: u32,
}

impl TokenSpec {
    pub fn max_supply_asset(&self) -> Asset {
        Asset::new(self.max_supply, self.symbol.clone(), self.precision)
    }

    /// Amount issued at boot, `None` when the issue fraction is zero.
    pub fn issue_asset(&self) -> Option<Asset> {
        if self.supply <= 0.0 {
            return None;
        }
        let amount = (self.max_supply as f64 * self.supply).round() as u64;
        Some(Asset::new(amount, self.symbol.clone(), self.precision))
    }
}

/// Symbol/precision of a token referenced by account grants.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: String,
    pub precision: u32,
}

/// A staked account created during bootstrap.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AccountSpec {
    pub name: String,
    /// Owner/active public key
    #[serde(rename = "pub")]
    pub pub_key: String,
    /// Token grants, base units keyed by token registry name
    #[serde(default)]
    pub tokens: BTreeMap<String, u64>,
    #[serde(default)]
    pub ram: RamQuota,
    #[serde(default)]
    pub net: BandwidthWeight,
    #[serde(default)]
    pub cpu: BandwidthWeight,
    /// Whether this account joins the governing multisig
    #[serde(default)]
    pub management: bool,
}

/// A contract installed on an existing account after the system contract.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContractSpec {
    pub account: String,
    pub name: String,
}

/// The bootstrap runbook (`boot_config.json`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BootConfig {
    /// Chain build tree; binary and contract defaults derive from it
    pub build_dir: PathBuf,
    pub system_token: TokenSpec,
    pub support_token: TokenSpec,
    /// Token registry for account grants
    #[serde(default)]
    pub tokens: BTreeMap<String, TokenInfo>,
    #[serde(default)]
    pub accounts: Vec<AccountSpec>,
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
}

impl BootConfig {
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
            message: format!("read {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&content).map_err(|e| ApplicationError::Config {
            message: format!("parse {}: {}", path.display(), e),
        })
    }

    /// Accounts flagged as management, i.e. the governing multisig members.
    pub fn management_account_names(&self) -> Vec<String> {
        self.accounts
            .iter()
            .filter(|a| a.management)
            .map(|a| a.name.clone())
            .collect()
    }

    pub fn default_nodeos(&self) -> PathBuf {
        self.build_dir.join("programs/nodeos/nodeos")
    }

    pub fn default_keosd(&self) -> PathBuf {
        self.build_dir.join("programs/keosd/keosd")
    }

    pub fn default_cleos(&self) -> PathBuf {
        self.build_dir.join("programs/cleos/cleos")
    }

    pub fn default_contracts_dir(&self) -> PathBuf {
        self.build_dir.join("contracts")
    }
}
