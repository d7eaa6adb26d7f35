//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{Component, Environment};

/// Deployment toolkit for Asteroid Rush nodes: image lifecycle and chain bootstrap
#[derive(Parser, Debug)]
#[command(name = "rushctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage node images and containers
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Bootstrap a freshly started chain
    Boot {
        #[command(subcommand)]
        command: BootCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// Build the image family for a tag
    Build {
        /// Environment for the resulting images
        #[arg(short, long, value_enum)]
        environment: Environment,
        /// Tag in the git repository
        #[arg(short, long)]
        tag: String,
        /// Force building even when an image already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Start a component's container
    Start {
        /// Environment of the node
        #[arg(short, long, value_enum)]
        environment: Environment,
        /// Tag in the git repository
        #[arg(short, long)]
        tag: String,
        /// Component to start
        #[arg(short, long, value_enum, default_value_t = Component::Node)]
        component: Component,
    },

    /// Stop a component's container
    Stop {
        /// Environment of the node
        #[arg(short, long, value_enum)]
        environment: Environment,
        /// Component to stop
        #[arg(short, long, value_enum, default_value_t = Component::Node)]
        component: Component,
    },

    /// Show information about services
    Status {
        /// Environment of the container (all when omitted)
        #[arg(short, long, value_enum)]
        environment: Option<Environment>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BootCommands {
    /// Run the full bootstrap runbook
    Run {
        /// Bootstrap runbook file
        #[arg(long, default_value = "./boot_config.json", value_hint = ValueHint::FilePath)]
        config: PathBuf,

        /// Boot public key
        #[arg(
            long,
            default_value = "EOS6DovkiCze69bSzptXRnth7crDP1J6XvaXu1hJMJfgWdDPC45Fy"
        )]
        public_key: String,

        /// Boot private key
        #[arg(
            long,
            default_value = "5KfjdDqaKCiDpMern6mGmtL4HNzWiRxRSF5mZUg9uFDrfk3xYT1"
        )]
        private_key: String,

        /// Path to wallet directory
        #[arg(long, default_value = "./wallet/", value_hint = ValueHint::DirPath)]
        wallet_dir: PathBuf,

        /// Path to genesis.json
        #[arg(long, default_value = "./genesis.json", value_hint = ValueHint::FilePath)]
        genesis: PathBuf,

        /// Node data directory (chain default when omitted)
        #[arg(long, value_hint = ValueHint::DirPath)]
        data_dir: Option<PathBuf>,

        /// Path to nodeos binary (default: under the config build dir)
        #[arg(long, value_hint = ValueHint::FilePath)]
        nodeos: Option<PathBuf>,

        /// Path to keosd binary (default: under the config build dir)
        #[arg(long, value_hint = ValueHint::FilePath)]
        keosd: Option<PathBuf>,

        /// Path to cleos binary (default: under the config build dir)
        #[arg(long, value_hint = ValueHint::FilePath)]
        cleos: Option<PathBuf>,

        /// Path to contracts directory (default: under the config build dir)
        #[arg(long, value_hint = ValueHint::DirPath)]
        contracts_dir: Option<PathBuf>,

        /// Path to the command log file
        #[arg(long, default_value = "./output.log", value_hint = ValueHint::FilePath)]
        log_path: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
