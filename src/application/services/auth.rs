//! Permission and authority updates
//!
//! Assembles `updateauth` payloads and the permission-table variants of
//! `set account`/`set action`. The resign flow rewires an account's owner
//! and active permissions to a majority multisig of its controllers.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::info;

use crate::application::services::ChainClient;
use crate::application::ApplicationResult;
use crate::domain::{Authority, KeyWeight, PermissionLevelWeight};
use crate::infrastructure::traits::Clock;

/// Settle time before reading back a freshly resigned account.
const RESIGN_SETTLE: Duration = Duration::from_secs(1);

/// Updates account authorities through the chain client.
pub struct AuthService {
    chain: Arc<ChainClient>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(chain: Arc<ChainClient>, clock: Arc<dyn Clock>) -> Self {
        Self { chain, clock }
    }

    /// Push an `updateauth` action signed by the permission being replaced.
    pub fn update_auth(
        &self,
        account: &str,
        permission: &str,
        parent: &str,
        auth: &Authority,
    ) -> ApplicationResult<()> {
        let payload = json!({
            "account": account,
            "permission": permission,
            "parent": parent,
            "auth": auth,
        })
        .to_string();
        let signer = format!("{account}@{permission}");
        self.chain.run(&[
            "push",
            "action",
            "eosio",
            "updateauth",
            &payload,
            "-p",
            &signer,
        ])
    }

    /// Point owner/active at two single keys.
    pub fn update_key_auth(
        &self,
        account: &str,
        active_key: &str,
        owner_key: &str,
    ) -> ApplicationResult<()> {
        self.update_auth(account, "owner", "", &Authority::single_key(owner_key))?;
        self.update_auth(account, "active", "owner", &Authority::single_key(active_key))
    }

    /// Point a permission at a majority multisig of controllers.
    pub fn update_multisig_auth(
        &self,
        account: &str,
        permission: &str,
        parent: &str,
        controllers: &[String],
    ) -> ApplicationResult<()> {
        self.update_auth(account, permission, parent, &Authority::multisig(controllers))
    }

    /// Replace a permission's key/account weight tables (threshold 1).
    pub fn set_account_permission(
        &self,
        account: &str,
        permission: &str,
        keys: &[KeyWeight],
        accounts: &[PermissionLevelWeight],
    ) -> ApplicationResult<()> {
        let payload = json!({
            "threshold": 1,
            "keys": keys,
            "accounts": accounts,
        })
        .to_string();
        self.chain
            .run(&["set", "account", "permission", account, permission, &payload])
    }

    /// Require a named permission for one contract action.
    pub fn set_action_permission(
        &self,
        account: &str,
        contract: &str,
        action: &str,
        permission: &str,
    ) -> ApplicationResult<()> {
        self.chain.run(&[
            "set",
            "action",
            "permission",
            account,
            contract,
            action,
            permission,
        ])
    }

    /// Hand an account over to its controllers' multisig and read it back.
    pub fn resign(&self, account: &str, controllers: &[String]) -> ApplicationResult<()> {
        self.update_multisig_auth(account, "owner", "", controllers)?;
        self.update_multisig_auth(account, "active", "owner", controllers)?;
        self.clock.sleep(RESIGN_SETTLE);
        self.chain.run(&["get", "account", account])?;
        info!("account resigned: {} -> {:?}", account, controllers);
        Ok(())
    }
}
