//! Command-line argument definitions for the Solscope CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the diagram; global options control
//! configuration file selection and logging verbosity.

use std::str::FromStr;

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::LevelFilter;

/// Command-line arguments for the Solscope diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = parse_log_level)]
    pub log_level: LevelFilter,
}

/// Accepts any casing of a [`LevelFilter`] name.
fn parse_log_level(raw: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(raw.trim()).map_err(|_| {
        format!("unknown log level `{raw}`, expected one of off, error, warn, info, debug, trace")
    })
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a class diagram of the contracts in the input bundles
    Class(ClassArgs),

    /// Write the storage slot layout of a contract
    Storage(StorageArgs),
}

impl Command {
    /// Returns the subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Class(_) => "class",
            Command::Storage(_) => "storage",
        }
    }
}

/// Options of the `class` subcommand
#[derive(ClapArgs, Debug, Default)]
pub struct ClassArgs {
    /// JSON source bundles of parsed Solidity files
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Path to the output dot file
    #[arg(short, long, default_value = "out.dot")]
    pub output: String,

    /// Only keep classes connected to these base contracts
    #[arg(short = 'b', long = "base-contracts", value_delimiter = ',')]
    pub roots: Vec<String>,

    /// Maximum reachability depth from the base contracts
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Resolve imports textually instead of on the filesystem
    #[arg(long)]
    pub flattened: bool,

    #[arg(long)]
    pub hide_variables: bool,

    #[arg(long)]
    pub hide_functions: bool,

    #[arg(long)]
    pub hide_structs: bool,

    #[arg(long)]
    pub hide_enums: bool,

    #[arg(long)]
    pub hide_libraries: bool,

    #[arg(long)]
    pub hide_interfaces: bool,

    #[arg(long)]
    pub hide_abstracts: bool,

    /// Hide private and internal members
    #[arg(long)]
    pub hide_privates: bool,

    #[arg(long)]
    pub hide_filename: bool,

    /// Draw one cluster per source folder
    #[arg(long)]
    pub cluster_folders: bool,
}

/// Options of the `storage` subcommand
#[derive(ClapArgs, Debug, Default)]
pub struct StorageArgs {
    /// JSON source bundles of parsed Solidity files
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Contract whose storage is laid out
    #[arg(short, long)]
    pub contract: String,

    /// Path to the output file
    #[arg(short, long, default_value = "out.dot")]
    pub output: String,

    /// Deployed address shown on the contract node
    #[arg(long)]
    pub address: Option<String>,

    /// Write the layout as JSON instead of dot
    #[arg(long)]
    pub json: bool,

    /// Resolve imports textually instead of on the filesystem
    #[arg(long)]
    pub flattened: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_command() {
        let args = Args::parse_from([
            "solscope",
            "class",
            "a.json",
            "b.json",
            "-b",
            "Vault,Token",
            "-d",
            "2",
            "--hide-privates",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.log_level, LevelFilter::Debug);
        assert_eq!(args.command.name(), "class");
        let Command::Class(class) = args.command else {
            panic!("Expected class command");
        };
        assert_eq!(class.inputs, ["a.json", "b.json"]);
        assert_eq!(class.roots, ["Vault", "Token"]);
        assert_eq!(class.depth, Some(2));
        assert_eq!(class.output, "out.dot");
        assert!(class.hide_privates);
        assert!(!class.flattened);
    }

    #[test]
    fn test_parse_storage_command() {
        let args = Args::parse_from([
            "solscope",
            "--config",
            "solscope.toml",
            "storage",
            "bundle.json",
            "-c",
            "Vault",
            "--json",
            "-o",
            "layout.json",
        ]);

        assert_eq!(args.config.as_deref(), Some("solscope.toml"));
        assert_eq!(args.log_level, LevelFilter::Info);
        assert_eq!(args.command.name(), "storage");
        let Command::Storage(storage) = args.command else {
            panic!("Expected storage command");
        };
        assert_eq!(storage.contract, "Vault");
        assert_eq!(storage.output, "layout.json");
        assert!(storage.json);
        assert_eq!(storage.address, None);
    }

    #[test]
    fn test_storage_requires_contract() {
        assert!(Args::try_parse_from(["solscope", "storage", "bundle.json"]).is_err());
    }

    #[test]
    fn test_log_level_values() {
        let parse = |level: &str| {
            Args::try_parse_from(["solscope", "--log-level", level, "storage", "b.json", "-c", "V"])
                .map(|args| args.log_level)
        };

        assert_eq!(parse("TRACE").unwrap(), LevelFilter::Trace);
        assert_eq!(parse("off").unwrap(), LevelFilter::Off);
        assert_eq!(parse_log_level(" Warn "), Ok(LevelFilter::Warn));

        let err = parse_log_level("loud").unwrap_err();
        assert!(err.contains("`loud`"), "{err}");
        assert!(parse("loud").is_err());
    }
}
