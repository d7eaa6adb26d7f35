//! Contract installation
//!
//! Base contracts (token, msig) land on same-named accounts created with
//! fresh keys; the system contract lands on `eosio` itself, after which
//! msig is flagged privileged.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::application::services::{AccountService, ChainClient};
use crate::application::ApplicationResult;
use crate::config::ContractSpec;

/// Contracts installed on their own accounts before token creation.
pub const SYSTEM_CONTRACTS: [&str; 2] = ["eosio.token", "eosio.msig"];

/// Installs contracts from the build tree through the chain client.
pub struct ContractService {
    chain: Arc<ChainClient>,
    contracts_dir: PathBuf,
}

impl ContractService {
    pub fn new(chain: Arc<ChainClient>, contracts_dir: PathBuf) -> Self {
        Self {
            chain,
            contracts_dir,
        }
    }

    /// Upload a contract directory to an account.
    pub fn install(&self, account: &str, contract: &str) -> ApplicationResult<()> {
        let dir = format!("{}/", self.contracts_dir.join(contract).display());
        self.chain.run(&["set", "contract", account, &dir])?;
        info!("contract installed: {} on {}", contract, account);
        Ok(())
    }

    /// Create the base contract accounts and install their contracts.
    pub fn install_base_contracts(&self, accounts: &AccountService) -> ApplicationResult<()> {
        for contract in SYSTEM_CONTRACTS {
            accounts.create_system_account(contract)?;
            self.install(contract, contract)?;
        }
        Ok(())
    }

    /// Install the system contract on `eosio` and make msig privileged.
    pub fn install_system_contract(&self) -> ApplicationResult<()> {
        self.install("eosio", "eosio.system")?;
        let payload = json!(["eosio.msig", 1]).to_string();
        self.chain.run(&[
            "push",
            "action",
            "eosio",
            "setpriv",
            &payload,
            "-p",
            "eosio@active",
            "-x",
            "1000",
        ])
    }

    /// Allow an account to host contract code.
    pub fn unlock_contract_uploading(&self, account: &str) -> ApplicationResult<()> {
        self.chain
            .run(&["set", "account", "contracthost", account, "1"])
    }

    /// Install the config-listed contracts on their (unprivileged) accounts.
    pub fn install_extra(&self, contracts: &[ContractSpec]) -> ApplicationResult<()> {
        for spec in contracts {
            self.unlock_contract_uploading(&spec.account)?;
            self.install(&spec.account, &spec.name)?;
        }
        Ok(())
    }
}
