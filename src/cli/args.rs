//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::{TimberPayload, TreePayload};

/// Forestry and timber-trade ledger: register trees and trade timber lots
#[derive(Parser, Debug)]
#[command(name = "timberyard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Data directory (overrides config and TIMBERYARD_DATA_DIR)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage tree records
    Tree {
        #[command(subcommand)]
        command: TreeCommands,
    },

    /// Manage timber lots
    Timber {
        #[command(subcommand)]
        command: TimberCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show storage location and record counts
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum TreeCommands {
    /// List all trees
    List,

    /// Show one tree
    Get {
        /// Tree id
        id: String,
    },

    /// Register a tree
    Add(TreeArgs),

    /// Replace the fields of a tree
    Update {
        /// Tree id
        id: String,
        #[command(flatten)]
        payload: TreeArgs,
    },

    /// Remove a tree
    Delete {
        /// Tree id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TimberCommands {
    /// List all timber lots
    List,

    /// Show one timber lot
    Get {
        /// Timber id
        id: String,
    },

    /// Register a timber lot
    Add(TimberArgs),

    /// Replace the fields of a timber lot
    Update {
        /// Timber id
        id: String,
        #[command(flatten)]
        payload: TimberArgs,
    },

    /// Remove a timber lot
    Delete {
        /// Timber id
        id: String,
    },
}

/// Tree fields; omitted flags are sent empty and rejected by validation.
#[derive(Args, Debug, Clone, Default)]
pub struct TreeArgs {
    /// Species name, e.g. Oak
    #[arg(long)]
    pub species: Option<String>,
    /// Trunk diameter
    #[arg(long, allow_negative_numbers = true)]
    pub diameter: Option<f64>,
    /// Trunk length
    #[arg(long, allow_negative_numbers = true)]
    pub length: Option<f64>,
}

impl From<TreeArgs> for TreePayload {
    fn from(args: TreeArgs) -> Self {
        TreePayload {
            species: args.species.unwrap_or_default(),
            diameter: args.diameter.unwrap_or_default(),
            length: args.length.unwrap_or_default(),
        }
    }
}

/// Timber fields; omitted flags are sent empty and rejected by validation.
#[derive(Args, Debug, Clone, Default)]
pub struct TimberArgs {
    /// Source tree id (not checked)
    #[arg(long)]
    pub tree_id: Option<String>,
    /// Merchant id (not checked)
    #[arg(long)]
    pub merchant_id: Option<String>,
    /// Asking price
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,
    /// Trade status, e.g. listed, sold
    #[arg(long)]
    pub status: Option<String>,
}

impl From<TimberArgs> for TimberPayload {
    fn from(args: TimberArgs) -> Self {
        TimberPayload {
            tree_id: args.tree_id.unwrap_or_default(),
            merchant_id: args.merchant_id.unwrap_or_default(),
            price: args.price.unwrap_or_default(),
            status: args.status.unwrap_or_default(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config instead of the data-directory one
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_tree_add_flags_when_parsing_then_builds_payload() {
        let cli = Cli::try_parse_from([
            "timberyard", "tree", "add", "--species", "Oak", "--diameter", "40", "--length", "12",
        ])
        .unwrap();

        let Some(Commands::Tree {
            command: TreeCommands::Add(args),
        }) = cli.command
        else {
            panic!("expected tree add");
        };
        let payload = TreePayload::from(args);
        assert_eq!(payload.species, "Oak");
        assert_eq!(payload.diameter, 40.0);
        assert_eq!(payload.length, 12.0);
    }

    #[test]
    fn given_missing_flags_when_parsing_timber_update_then_fields_are_empty() {
        let cli = Cli::try_parse_from(["timberyard", "-dd", "timber", "update", "abc", "--price", "5"])
            .unwrap();

        assert_eq!(cli.debug, 2);
        let Some(Commands::Timber {
            command: TimberCommands::Update { id, payload },
        }) = cli.command
        else {
            panic!("expected timber update");
        };
        assert_eq!(id, "abc");
        let payload = TimberPayload::from(payload);
        assert_eq!(payload.price, 5.0);
        assert!(payload.tree_id.is_empty());
        assert!(payload.status.is_empty());
    }
}
