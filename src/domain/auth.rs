//! Authority payloads for `updateauth` and permission updates.
//!
//! These serialize to the exact JSON shape the chain client expects on the
//! command line.

use serde::Serialize;

/// A public key with a signing weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyWeight {
    pub key: String,
    pub weight: u16,
}

/// Reference to an account's permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionLevel {
    pub actor: String,
    pub permission: String,
}

impl PermissionLevel {
    pub fn active(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            permission: "active".to_string(),
        }
    }
}

/// An account permission with a signing weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionLevelWeight {
    pub permission: PermissionLevel,
    pub weight: u16,
}

/// A time delay with a signing weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitWeight {
    pub wait_sec: u32,
    pub weight: u16,
}

/// Authority structure accepted by `updateauth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authority {
    pub threshold: u32,
    pub keys: Vec<KeyWeight>,
    pub accounts: Vec<PermissionLevelWeight>,
    pub waits: Vec<WaitWeight>,
}

impl Authority {
    /// Authority satisfied by a single key.
    pub fn single_key(key: impl Into<String>) -> Self {
        Self {
            threshold: 1,
            keys: vec![KeyWeight {
                key: key.into(),
                weight: 1,
            }],
            accounts: Vec::new(),
            waits: Vec::new(),
        }
    }

    /// Majority multisig over the controllers' `active` permissions.
    ///
    /// Threshold is `⌊n/2⌋ + 1`, each controller weighing 1.
    pub fn multisig(controllers: &[String]) -> Self {
        Self {
            threshold: multisig_threshold(controllers.len()),
            keys: Vec::new(),
            accounts: controllers
                .iter()
                .map(|controller| PermissionLevelWeight {
                    permission: PermissionLevel::active(controller.clone()),
                    weight: 1,
                })
                .collect(),
            waits: Vec::new(),
        }
    }
}

/// Simple-majority threshold for `n` equally weighted controllers.
pub fn multisig_threshold(n: usize) -> u32 {
    (n as u32) / 2 + 1
}
