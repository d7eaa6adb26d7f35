//! Command dispatch: maps parsed arguments onto services.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{BootOptions, BootstrapService, BuildOutcome};
use crate::application::ApplicationError;
use crate::cli::args::{BootCommands, Cli, Commands, ConfigCommands, NodeCommands};
use crate::cli::output;
use crate::cli::CliResult;
use crate::config::{global_config_path, BootConfig, Credentials, Settings};
use crate::domain::Environment;
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Node { command }) => node_command(command),
        Some(Commands::Boot { command }) => boot_command(command),
        Some(Commands::Config { command }) => config_command(command),
        Some(Commands::Completion { shell }) => {
            generate(*shell, &mut Cli::command(), "rushctl", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn node_command(command: &NodeCommands) -> CliResult<()> {
    let container = ServiceContainer::new(Settings::load()?);
    match command {
        NodeCommands::Build {
            environment,
            tag,
            force,
        } => build(&container, *environment, tag, *force),
        NodeCommands::Start {
            environment,
            tag,
            component,
        } => {
            let name = container.docker.start(*environment, *component, tag)?;
            output::success(&format!("started {}", name));
            Ok(())
        }
        NodeCommands::Stop {
            environment,
            component,
        } => {
            if container.docker.stop(*environment, *component)? {
                output::success(&format!("stopped {}", component.container_name(*environment)));
            } else {
                output::warning(&format!(
                    "no container {}",
                    component.container_name(*environment)
                ));
            }
            Ok(())
        }
        NodeCommands::Status { environment } => {
            match environment {
                Some(env) => display_status(&container, *env),
                None => {
                    for env in Environment::ALL {
                        display_status(&container, env);
                    }
                }
            }
            Ok(())
        }
    }
}

#[instrument(skip(container))]
fn build(
    container: &ServiceContainer,
    environment: Environment,
    tag: &str,
    force: bool,
) -> CliResult<()> {
    debug!("environment: {}, tag: {}, force: {}", environment, tag, force);
    let credentials = Credentials::load(&container.settings.credentials_file)?;
    let plan = container
        .docker
        .build_plan(environment, tag, &credentials, force);

    for image_build in plan {
        if !image_build.force && container.docker.image_exists(&image_build.image)? {
            output::info(&format!(
                "Image \"{}\" already exists, omit image building...",
                image_build.image
            ));
            continue;
        }
        output::action("Building", &image_build.image);
        if let BuildOutcome::Built(elapsed) = container.docker.build(&image_build)? {
            output::success(&format!(
                "Complete \"{}\". Elapsed {:.1?}",
                image_build.image, elapsed
            ));
        }
    }
    Ok(())
}

fn display_status(container: &ServiceContainer, environment: Environment) {
    let delimiter = "-".repeat(30);
    let mut title = format!("{:?} environment:", environment);
    if let Some(version) = container.docker.version(environment) {
        title.push_str(&format!(" (version {})", version));
    }

    output::info(&delimiter);
    output::header(&title);
    output::info(&delimiter);
    output::info(&format!("{:<15}| {}", "Name", "Status"));
    output::info(&delimiter);
    for (component, status) in container.docker.status(environment) {
        output::info(&format!("{:<15}| {}", component.to_string(), status));
    }
    output::info(&delimiter);
    output::info("");
}

fn boot_command(command: &BootCommands) -> CliResult<()> {
    let BootCommands::Run {
        config,
        public_key,
        private_key,
        wallet_dir,
        genesis,
        data_dir,
        nodeos,
        keosd,
        cleos,
        contracts_dir,
        log_path,
    } = command;

    boot_run(
        config,
        BootOptions {
            public_key: public_key.clone(),
            private_key: private_key.clone(),
            wallet_dir: wallet_dir.clone(),
            genesis: genesis.clone(),
            data_dir: data_dir.clone(),
            nodeos: nodeos.clone(),
            keosd: keosd.clone(),
            cleos: cleos.clone(),
            contracts_dir: contracts_dir.clone(),
            log_path: log_path.clone(),
        },
    )
}

#[instrument(skip(options))]
fn boot_run(config_path: &Path, options: BootOptions) -> CliResult<()> {
    let container = ServiceContainer::new(Settings::load()?);
    let config = BootConfig::load(config_path)?;
    debug!(
        "accounts: {}, contracts: {}",
        config.accounts.len(),
        config.contracts.len()
    );

    let bootstrap = BootstrapService::new(
        container.fs.clone(),
        container.cmd.clone(),
        container.clock.clone(),
        &container.settings,
        config,
        options,
    );

    output::header("Stopping stale daemons");
    bootstrap.prepare();
    output::header("Starting node and wallet");
    bootstrap.start_node()?;
    bootstrap.start_wallet()?;
    output::header("Creating system accounts");
    bootstrap.create_system_accounts()?;
    output::header("Installing base contracts");
    bootstrap.install_base_contracts()?;
    output::header("Creating tokens");
    bootstrap.create_tokens()?;
    output::header("Installing system contract");
    bootstrap.install_system_contract()?;
    output::header("Creating management accounts");
    bootstrap.create_management_accounts()?;
    output::header("Resigning privileged accounts");
    bootstrap.resign_all()?;
    output::success("chain bootstrap complete");
    Ok(())
}

fn config_command(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            let rendered =
                serde_json::to_string_pretty(&settings).map_err(|e| ApplicationError::Config {
                    message: e.to_string(),
                })?;
            output::info(&rendered);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: <unavailable>"),
            }
            output::detail("local: ./rushctl.toml");
            Ok(())
        }
    }
}
