//! Producer node launcher
//!
//! Starts `nodeos` in the background as the single boot producer, signing
//! with the boot key pair and producing from a wiped chain state.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::KeyPair;
use crate::infrastructure::traits::{CommandRunner, FileSystem};
use crate::infrastructure::Journal;

/// Launches the node daemon for bootstrapping.
pub struct NodeService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    journal: Journal,
    program: PathBuf,
    genesis: PathBuf,
    data_dir: Option<PathBuf>,
}

impl NodeService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        journal: Journal,
        program: PathBuf,
        genesis: PathBuf,
        data_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            fs,
            cmd,
            journal,
            program,
            genesis,
            data_dir,
        }
    }

    /// Start the boot producer in the background. Returns the daemon's pid.
    pub fn start(&self, keys: &KeyPair) -> ApplicationResult<u32> {
        let genesis = self
            .fs
            .canonicalize(&self.genesis)
            .with_path_context("resolve genesis file", &self.genesis)?;

        let data_dir_arg = self
            .data_dir
            .as_ref()
            .map(|dir| format!("--data-dir={}", dir.display()));
        let signature_provider = format!("{}=KEY:{}", keys.public, keys.private);
        let genesis_arg = genesis.to_string_lossy();

        let mut args: Vec<&str> = Vec::new();
        if let Some(arg) = &data_dir_arg {
            args.push(arg);
        }
        args.extend([
            "-e",
            "--producer-name",
            "eosio",
            "--signature-provider",
            &signature_provider,
            "--verbose-http-errors",
            "--contracts-console",
            "--genesis-json",
            genesis_arg.as_ref(),
            "--delete-all-blocks",
            "--max-transaction-time",
            "1000",
            "--plugin",
            "eosio::producer_plugin",
            "--plugin",
            "eosio::chain_api_plugin",
            "--plugin",
            "eosio::http_plugin",
        ]);

        let line = format!("{} {}", self.program.display(), args.join(" "));
        self.journal.record(&line);
        debug!("nodeos: {}", line);

        let program = self.program.to_string_lossy();
        let pid = self
            .cmd
            .spawn(program.as_ref(), &args)
            .with_path_context("start node daemon", &self.program)?;
        info!("node daemon started (pid {})", pid);
        Ok(pid)
    }
}
