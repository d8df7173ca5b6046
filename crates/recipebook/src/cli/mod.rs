//! Command-line interface for recipebook.
//!
//! This module provides the CLI structure and output helpers for the
//! `recipebook` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand, ShowCommand,
    StatusCommand,
};

/// recipebook - Keep your recipes on your own machine
///
/// Create, edit, browse and delete recipes with ingredients, steps and an
/// optional picture, stored in a local database.
#[derive(Debug, Parser)]
#[command(name = "recipebook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List recipes, newest first
    List(ListCommand),

    /// Show one recipe
    Show(ShowCommand),

    /// Add a recipe
    Add(AddCommand),

    /// Change fields of a recipe
    Edit(EditCommand),

    /// Delete a recipe
    Delete(DeleteCommand),

    /// Load the default recipes into an empty collection
    Seed,

    /// List the configured categories
    Types,

    /// Show storage and collection status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "recipebook");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["recipebook", "-q", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["recipebook", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["recipebook", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["recipebook", "-vv", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_list_with_type() {
        let cli = parse(&["recipebook", "list", "--type", "Dinner", "--json"]);
        let Command::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.recipe_type.as_deref(), Some("Dinner"));
        assert!(cmd.json);
    }

    #[test]
    fn test_parse_add_repeated_lists() {
        let cli = parse(&[
            "recipebook", "add", "--name", "Tacos", "-i", "Beef", "-i", "Tortillas", "-s", "Cook",
        ]);
        let Command::Add(cmd) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(cmd.name.as_deref(), Some("Tacos"));
        assert_eq!(cmd.ingredients, vec!["Beef", "Tortillas"]);
        assert_eq!(cmd.steps, vec!["Cook"]);
    }

    #[test]
    fn test_edit_image_conflicts_with_clear() {
        let result = Cli::try_parse_from([
            "recipebook",
            "edit",
            "abc",
            "--image",
            "file:///a.jpg",
            "--clear-image",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["recipebook", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["recipebook", "config", "validate", "--file", "x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
