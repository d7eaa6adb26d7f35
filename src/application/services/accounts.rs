//! Account creation
//!
//! System accounts get freshly minted keys; management accounts come from
//! the boot config with their own public keys, token grants and resource
//! quotas.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::application::services::{ChainClient, WalletService};
use crate::application::ApplicationResult;
use crate::config::{AccountSpec, TokenInfo};
use crate::domain::{Asset, DomainError};

/// Account holding the chain government multisig.
pub const GOVERNMENT_ACCOUNT: &str = "eosio.gov";

/// Accounts the chain expects to exist before the system contract runs.
pub const SYSTEM_ACCOUNTS: [&str; 5] = [
    "eosio.bpay",
    "eosio.names",
    "eosio.saving",
    "eosio.upay",
    GOVERNMENT_ACCOUNT,
];

/// Creates system and staked accounts through the chain client.
pub struct AccountService {
    chain: Arc<ChainClient>,
    wallet: Arc<WalletService>,
    tokens: BTreeMap<String, TokenInfo>,
}

impl AccountService {
    pub fn new(
        chain: Arc<ChainClient>,
        wallet: Arc<WalletService>,
        tokens: BTreeMap<String, TokenInfo>,
    ) -> Self {
        Self {
            chain,
            wallet,
            tokens,
        }
    }

    /// Create a plain account owned by `eosio`.
    pub fn create(&self, name: &str, public_key: &str) -> ApplicationResult<()> {
        self.chain
            .run(&["create", "account", "eosio", name, public_key])
    }

    /// Create a system account with a freshly minted key pair.
    pub fn create_system_account(&self, name: &str) -> ApplicationResult<()> {
        let keys = self.wallet.create_keys()?;
        self.wallet.import_key(&keys.private)?;
        self.create(name, &keys.public)?;
        info!("system account created: {}", name);
        Ok(())
    }

    /// Create all chain system accounts.
    pub fn create_system_accounts(&self) -> ApplicationResult<()> {
        for name in SYSTEM_ACCOUNTS {
            self.create_system_account(name)?;
        }
        Ok(())
    }

    /// Create a staked account: newaccount, token grants, resource quotas.
    pub fn create_staked(&self, spec: &AccountSpec) -> ApplicationResult<()> {
        self.chain.run(&[
            "system",
            "newaccount",
            "eosio",
            &spec.name,
            &spec.pub_key,
            "-p",
            "eosio@createaccnt",
        ])?;

        for (token_name, amount) in &spec.tokens {
            let info = self
                .tokens
                .get(token_name)
                .ok_or_else(|| DomainError::UnknownToken(token_name.clone()))?;
            let grant = Asset::new(*amount, info.symbol.clone(), info.precision).to_string();
            self.chain.run(&["transfer", "eosio", &spec.name, &grant])?;
        }

        if let Some(bytes) = spec.ram.bytes() {
            let bytes = bytes.to_string();
            self.chain.run(&[
                "set",
                "account",
                "ram",
                &spec.name,
                &bytes,
                "-p",
                "eosio@active",
            ])?;
        }

        // Weight 1 is the chain default; only deviations need a transaction.
        if spec.net.0 > 1 || spec.cpu.0 > 1 {
            let net = spec.net.0.to_string();
            let cpu = spec.cpu.0.to_string();
            self.chain.run(&[
                "set",
                "account",
                "bandwidth",
                &spec.name,
                &net,
                &cpu,
                "-p",
                "eosio@active",
            ])?;
        }

        self.chain.run(&["get", "account", &spec.name])?;
        info!("staked account created: {}", spec.name);
        Ok(())
    }

    /// Create every management account from the boot config.
    pub fn create_management_accounts(&self, accounts: &[AccountSpec]) -> ApplicationResult<()> {
        for spec in accounts {
            self.create_staked(spec)?;
        }
        Ok(())
    }
}
