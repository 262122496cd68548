//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::Ledger;
use crate::cli::args::{Cli, Commands, ConfigCommands, TimberCommands, TreeCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{TimberPayload, TreePayload};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { command }) => {
            let container = build_container(cli)?;
            tree_command(&container.ledger(), command)
        }
        Some(Commands::Timber { command }) => {
            let container = build_container(cli)?;
            timber_command(&container.ledger(), command)
        }
        Some(Commands::Config { command }) => config_command(cli, command),
        Some(Commands::Info) => info(cli),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.data_dir.as_deref())?;
    debug!("load_settings: {:?}", settings);
    Ok(settings)
}

fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?)?)
}

#[instrument(skip(ledger))]
fn tree_command(ledger: &Ledger, command: &TreeCommands) -> CliResult<()> {
    match command {
        TreeCommands::List => output::json(&ledger.list_trees()?),
        TreeCommands::Get { id } => output::json(&ledger.get_tree(id)?),
        TreeCommands::Add(args) => {
            let tree = ledger.add_tree(TreePayload::from(args.clone()))?;
            output::success(&format!("tree added: {}", tree.id));
            output::json(&tree)
        }
        TreeCommands::Update { id, payload } => {
            let tree = ledger.update_tree(id, TreePayload::from(payload.clone()))?;
            output::success(&format!("tree updated: {}", tree.id));
            output::json(&tree)
        }
        TreeCommands::Delete { id } => {
            let tree = ledger.delete_tree(id)?;
            output::success(&format!("tree deleted: {}", tree.id));
            output::json(&tree)
        }
    }
}

#[instrument(skip(ledger))]
fn timber_command(ledger: &Ledger, command: &TimberCommands) -> CliResult<()> {
    match command {
        TimberCommands::List => output::json(&ledger.list_timbers()?),
        TimberCommands::Get { id } => output::json(&ledger.get_timber(id)?),
        TimberCommands::Add(args) => {
            let timber = ledger.add_timber(TimberPayload::from(args.clone()))?;
            output::success(&format!("timber added: {}", timber.id));
            output::json(&timber)
        }
        TimberCommands::Update { id, payload } => {
            let timber = ledger.update_timber(id, TimberPayload::from(payload.clone()))?;
            output::success(&format!("timber updated: {}", timber.id));
            output::json(&timber)
        }
        TimberCommands::Delete { id } => {
            let timber = ledger.delete_timber(id)?;
            output::success(&format!("timber deleted: {}", timber.id));
            output::json(&timber)
        }
    }
}

#[instrument(skip(cli))]
fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let settings = load_settings(cli)?;
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no home directory, global config disabled"),
            }
            output::action("local", &local_config_path(&settings.data_dir).display());
            output::action("data", &settings.data_dir.display());
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(&load_settings(cli)?.data_dir)
            };

            let fs = RealFileSystem;
            if fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "{} already exists, use --force to overwrite",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .and_then(|_| fs.write_atomic(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("config written: {}", path.display()));
            Ok(())
        }
    }
}

#[instrument(skip(cli))]
fn info(cli: &Cli) -> CliResult<()> {
    let container = build_container(cli)?;
    let settings = &container.settings;
    let summary = container.ledger().summary()?;

    output::header("timberyard");
    output::detail(&format!("data dir:   {}", settings.data_dir.display()));
    output::detail(&format!("storage:    {:?}", settings.storage).to_lowercase());
    output::detail(&format!("allow zero: {}", settings.validation.allow_zero));
    output::detail(&format!("trees:      {}", summary.trees));
    output::detail(&format!("timbers:    {}", summary.timbers));
    Ok(())
}
