//! Wallet daemon service
//!
//! Resets and starts `keosd`, creates the boot wallet, and mints/imports
//! keys through the chain client. Readiness is a fixed sleep after spawn;
//! the daemon exposes no probe the boot flow could use.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::application::services::ChainClient;
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::KeyPair;
use crate::infrastructure::traits::{Clock, CommandRunner, FileSystem};
use crate::infrastructure::Journal;

/// Time keosd gets to open its socket before the wallet is created.
const STARTUP_GRACE: Duration = Duration::from_millis(400);

/// Wallet daemon lifecycle and key management.
pub struct WalletService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    clock: Arc<dyn Clock>,
    journal: Journal,
    chain: Arc<ChainClient>,
    program: PathBuf,
    wallet_dir: PathBuf,
}

impl WalletService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        clock: Arc<dyn Clock>,
        journal: Journal,
        chain: Arc<ChainClient>,
        program: PathBuf,
        wallet_dir: PathBuf,
    ) -> Self {
        Self {
            fs,
            cmd,
            clock,
            journal,
            chain,
            program,
            wallet_dir,
        }
    }

    /// Wipe and recreate the wallet directory.
    pub fn reset(&self) -> ApplicationResult<()> {
        match self.fs.remove_dir_all(&self.wallet_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_path_context("remove wallet dir", &self.wallet_dir),
        }
        self.fs
            .create_dir_all(&self.wallet_dir)
            .with_path_context("create wallet dir", &self.wallet_dir)
    }

    /// Reset state, launch keosd in the background and create the wallet.
    pub fn start(&self) -> ApplicationResult<u32> {
        self.reset()?;

        let wallet_dir = self
            .fs
            .canonicalize(&self.wallet_dir)
            .with_path_context("resolve wallet dir", &self.wallet_dir)?;
        let wallet_dir_arg = wallet_dir.to_string_lossy();
        let args = [
            "--unlock-timeout",
            "999999999",
            "--wallet-dir",
            wallet_dir_arg.as_ref(),
        ];

        let line = format!("{} {}", self.program.display(), args.join(" "));
        self.journal.record(&line);
        debug!("keosd: {}", line);

        let program = self.program.to_string_lossy();
        let pid = self
            .cmd
            .spawn(program.as_ref(), &args)
            .with_path_context("start wallet daemon", &self.program)?;
        info!("wallet daemon started (pid {})", pid);

        self.clock.sleep(STARTUP_GRACE);
        self.chain.run(&["wallet", "create", "--to-console"])?;
        Ok(pid)
    }

    /// Mint a fresh key pair via the chain client.
    pub fn create_keys(&self) -> ApplicationResult<KeyPair> {
        let output = self.chain.output(&["create", "key", "--to-console"])?;
        Ok(KeyPair::parse_create_key(&output)?)
    }

    /// Import a private key into the wallet.
    pub fn import_key(&self, private_key: &str) -> ApplicationResult<()> {
        self.chain
            .run(&["wallet", "import", "--private-key", private_key])
    }
}
