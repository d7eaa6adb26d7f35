//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner, Clock)
//! but are themselves concrete structs, not traits.

mod accounts;
mod auth;
mod bootstrap;
mod chain;
mod contracts;
mod docker;
mod node;
mod tokens;
mod wallet;

pub use accounts::{AccountService, GOVERNMENT_ACCOUNT, SYSTEM_ACCOUNTS};
pub use auth::AuthService;
pub use bootstrap::{BootOptions, BootstrapService};
pub use chain::ChainClient;
pub use contracts::{ContractService, SYSTEM_CONTRACTS};
pub use docker::{BuildOutcome, DockerService, ImageBuild};
pub use node::NodeService;
pub use tokens::TokenService;
pub use wallet::WalletService;
