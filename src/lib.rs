//! rushctl: deployment toolkit for Asteroid Rush nodes.
//!
//! Two toolkits behind one binary:
//! - `node`: build the Docker image family for a deployment tag and
//!   start/stop/inspect the per-environment containers,
//! - `boot`: bootstrap a freshly started chain (system accounts, system
//!   contracts, tokens, staked management accounts, authority hand-over),
//!   shelling out to `nodeos`, `keosd` and `cleos`.
//!
//! Layering follows the usual onion: `domain` (pure data, no I/O),
//! `application` (services speaking through I/O boundary traits),
//! `infrastructure` (real process/filesystem implementations and DI),
//! `cli` (argument parsing and dispatch).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
