//! Chain bootstrap runbook
//!
//! Wires the boot services together and sequences the runbook: kill stale
//! daemons, start node and wallet, create system accounts, install
//! contracts, create tokens, create management accounts, then hand the
//! privileged accounts over to the governing multisig. The runbook stops at
//! the first failure; there is no rollback.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::services::{
    AccountService, AuthService, ChainClient, ContractService, NodeService, TokenService,
    WalletService, GOVERNMENT_ACCOUNT, SYSTEM_ACCOUNTS,
};
use crate::application::ApplicationResult;
use crate::config::{BootConfig, Settings};
use crate::domain::KeyPair;
use crate::infrastructure::traits::{Clock, CommandRunner, FileSystem};
use crate::infrastructure::Journal;

/// Settle time after killing stale daemons.
const PREPARE_GRACE: Duration = Duration::from_millis(1500);

/// Runtime options for one bootstrap run, mirroring the CLI flags.
///
/// Binary and contract paths default into the config's build tree when unset.
#[derive(Debug, Clone)]
pub struct BootOptions {
    pub public_key: String,
    pub private_key: String,
    pub wallet_dir: PathBuf,
    pub genesis: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub nodeos: Option<PathBuf>,
    pub keosd: Option<PathBuf>,
    pub cleos: Option<PathBuf>,
    pub contracts_dir: Option<PathBuf>,
    pub log_path: PathBuf,
}

/// Sequences the bootstrap runbook over the boot services.
pub struct BootstrapService {
    cmd: Arc<dyn CommandRunner>,
    clock: Arc<dyn Clock>,
    journal: Journal,
    node: NodeService,
    wallet: Arc<WalletService>,
    accounts: AccountService,
    contracts: ContractService,
    tokens: TokenService,
    auth: AuthService,
    config: BootConfig,
    boot_keys: KeyPair,
}

impl BootstrapService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        clock: Arc<dyn Clock>,
        settings: &Settings,
        config: BootConfig,
        options: BootOptions,
    ) -> Self {
        let journal = Journal::new(fs.clone(), options.log_path.clone());
        let cleos = options.cleos.unwrap_or_else(|| config.default_cleos());
        let nodeos = options.nodeos.unwrap_or_else(|| config.default_nodeos());
        let keosd = options.keosd.unwrap_or_else(|| config.default_keosd());
        let contracts_dir = options
            .contracts_dir
            .unwrap_or_else(|| config.default_contracts_dir());

        let chain = Arc::new(ChainClient::new(
            cmd.clone(),
            journal.clone(),
            cleos,
            settings.wallet_url.clone(),
        ));
        let node = NodeService::new(
            fs.clone(),
            cmd.clone(),
            journal.clone(),
            nodeos,
            options.genesis,
            options.data_dir,
        );
        let wallet = Arc::new(WalletService::new(
            fs,
            cmd.clone(),
            clock.clone(),
            journal.clone(),
            chain.clone(),
            keosd,
            options.wallet_dir,
        ));
        let accounts = AccountService::new(chain.clone(), wallet.clone(), config.tokens.clone());
        let contracts = ContractService::new(chain.clone(), contracts_dir);
        let tokens = TokenService::new(chain.clone());
        let auth = AuthService::new(chain, clock.clone());

        Self {
            cmd,
            clock,
            journal,
            node,
            wallet,
            accounts,
            contracts,
            tokens,
            auth,
            config,
            boot_keys: KeyPair {
                public: options.public_key,
                private: options.private_key,
            },
        }
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Kill stale daemons from a previous run and let them die.
    pub fn prepare(&self) {
        self.journal.record("killall keosd nodeos");
        if let Err(e) = self.cmd.run("killall", &["keosd", "nodeos"]) {
            debug!("killall unavailable: {}", e);
        }
        self.clock.sleep(PREPARE_GRACE);
    }

    /// Start the boot producer node.
    pub fn start_node(&self) -> ApplicationResult<u32> {
        self.node.start(&self.boot_keys)
    }

    /// Start the wallet daemon and import the boot key.
    pub fn start_wallet(&self) -> ApplicationResult<()> {
        self.wallet.start()?;
        self.wallet.import_key(&self.boot_keys.private)
    }

    /// Create the chain system accounts with fresh keys.
    pub fn create_system_accounts(&self) -> ApplicationResult<()> {
        self.accounts.create_system_accounts()
    }

    /// Create the base contract accounts and install token/msig.
    pub fn install_base_contracts(&self) -> ApplicationResult<()> {
        self.contracts.install_base_contracts(&self.accounts)
    }

    /// Create the system and support tokens, issuing the boot fractions.
    pub fn create_tokens(&self) -> ApplicationResult<()> {
        for spec in [&self.config.system_token, &self.config.support_token] {
            self.tokens.create(spec)?;
            self.tokens.issue(spec)?;
        }
        Ok(())
    }

    /// Install the system contract and the config-listed extras.
    pub fn install_system_contract(&self) -> ApplicationResult<()> {
        self.contracts.install_system_contract()?;
        self.contracts.install_extra(&self.config.contracts)
    }

    /// Create the staked management accounts from the config.
    pub fn create_management_accounts(&self) -> ApplicationResult<()> {
        self.accounts
            .create_management_accounts(&self.config.accounts)
    }

    /// Hand the privileged accounts over to the governing multisig.
    ///
    /// `eosio.gov` goes to the management accounts, `eosio` to `eosio.gov`,
    /// and every system account back to `eosio`.
    pub fn resign_all(&self) -> ApplicationResult<()> {
        let management = self.config.management_account_names();
        self.auth.resign(GOVERNMENT_ACCOUNT, &management)?;
        self.auth
            .resign("eosio", &[GOVERNMENT_ACCOUNT.to_string()])?;
        for account in SYSTEM_ACCOUNTS {
            self.auth.resign(account, &["eosio".to_string()])?;
        }
        Ok(())
    }

    /// The full runbook, in order.
    pub fn run(&self) -> ApplicationResult<()> {
        self.prepare();
        self.start_node()?;
        self.start_wallet()?;
        self.create_system_accounts()?;
        self.install_base_contracts()?;
        self.create_tokens()?;
        self.install_system_contract()?;
        self.create_management_accounts()?;
        self.resign_all()
    }
}
