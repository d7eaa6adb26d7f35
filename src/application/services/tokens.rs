//! Token creation and issuance

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::application::services::ChainClient;
use crate::application::ApplicationResult;
use crate::config::TokenSpec;

/// Creates and issues the boot tokens through the token contract.
pub struct TokenService {
    chain: Arc<ChainClient>,
}

impl TokenService {
    pub fn new(chain: Arc<ChainClient>) -> Self {
        Self { chain }
    }

    /// Register the token with its maximum supply.
    pub fn create(&self, spec: &TokenSpec) -> ApplicationResult<()> {
        let payload = json!(["eosio", spec.max_supply_asset().to_string()]).to_string();
        self.chain.run(&[
            "push",
            "action",
            "eosio.token",
            "create",
            &payload,
            "-p",
            "eosio.token@active",
        ])?;
        info!("token created: {}", spec.symbol);
        Ok(())
    }

    /// Issue the configured fraction of the supply to `eosio`.
    ///
    /// Returns `false` when the config issues nothing at boot.
    pub fn issue(&self, spec: &TokenSpec) -> ApplicationResult<bool> {
        let Some(asset) = spec.issue_asset() else {
            return Ok(false);
        };
        let payload = json!(["eosio", asset.to_string(), "memo"]).to_string();
        self.chain.run(&[
            "push",
            "action",
            "eosio.token",
            "issue",
            &payload,
            "-p",
            "eosio@active",
        ])?;
        info!("token issued: {}", asset);
        Ok(true)
    }
}
