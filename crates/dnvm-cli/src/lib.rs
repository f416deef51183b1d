//! dnvm - a version manager for the .NET SDK
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! This crate holds the command-line surface: argument definitions, the
//! cross-option rules each command enforces, and the filter deciding how a
//! failed command is reported.

pub mod cmd;
pub mod constraints;
pub mod error_filter;

use anyhow::Result;
use clap::{ArgMatches, Parser, Subcommand};
use constraints::Constraint;
use dnvm_core::{DnvmEnv, Reporter, ToolError, paths};
use dnvm_schema::Os;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dnvm")]
#[command(author, version = env!("DNVM_VERSION"), about = "dnvm - a version manager for the .NET SDK")]
pub struct Cli {
    /// Show full error details instead of a one-line message
    #[arg(long, global = true, env = "DNVM_DEBUG")]
    pub debug: bool,

    /// Directory holding dnvm's manifest and SDKs [default: ~/.dnvm]
    #[arg(long, global = true, env = "DNVM_HOME", value_name = "DIR")]
    pub dnvm_home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the runtime identifier used to pick SDK downloads
    Rid,
    /// Inspect or upgrade the manifest
    Manifest {
        /// Print the manifest as JSON
        #[arg(long)]
        show: bool,
        /// Rewrite the manifest in the current format
        #[arg(long)]
        migrate: bool,
        /// Indent JSON output (with --show)
        #[arg(long)]
        pretty: bool,
    },
    /// Add a directory to the user PATH (Windows)
    AddToPath {
        /// Directory to add [default: the dnvm home]
        dir: Option<String>,
    },
}

const MANIFEST_CONSTRAINTS: &[Constraint] = &[
    Constraint::ExactlyOneOf(&["show", "migrate"]),
    Constraint::Requires {
        option: "pretty",
        requires: "show",
    },
];

impl Commands {
    /// Cross-option rules for this command.
    pub fn constraints(&self) -> &'static [Constraint] {
        match self {
            Self::Manifest { .. } => MANIFEST_CONSTRAINTS,
            Self::Rid | Self::AddToPath { .. } => &[],
        }
    }
}

/// Validate option combinations, then run the command against the real
/// machine.
pub fn run(cli: &Cli, matches: &ArgMatches, reporter: &dyn Reporter) -> Result<()> {
    if let Some((_, sub_matches)) = matches.subcommand() {
        constraints::validate(sub_matches, cli.command.constraints()).map_err(ToolError::from)?;
    }

    let home = cli
        .dnvm_home
        .clone()
        .or_else(paths::default_dnvm_home)
        .ok_or_else(|| {
            ToolError::Unsupported(
                "Could not determine home directory. Set DNVM_HOME to override.".to_string(),
            )
        })?;
    tracing::debug!(home = %home.display(), "Using dnvm home");

    let env = DnvmEnv::physical(home);
    dispatch(&cli.command, &env, reporter)
}

/// Run an already validated command in `env`.
pub fn dispatch(command: &Commands, env: &DnvmEnv, reporter: &dyn Reporter) -> Result<()> {
    match command {
        Commands::Rid => cmd::rid::rid(reporter),
        Commands::Manifest {
            show,
            migrate: _,
            pretty,
        } => {
            if *show {
                cmd::manifest::show(env, *pretty, reporter)
            } else {
                cmd::manifest::migrate(env, reporter)
            }
        }
        Commands::AddToPath { dir } => {
            let os = Os::current().map_err(ToolError::from)?;
            cmd::path::add_to_path(env, os, dir.as_deref(), reporter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    fn violation(args: &[&str]) -> Option<String> {
        let matches = Cli::command().try_get_matches_from(args).unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        constraints::validate(sub, cli.command.constraints())
            .err()
            .map(|v| v.0)
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn manifest_needs_exactly_one_action() {
        let msg = violation(&["dnvm", "manifest"]).unwrap();
        assert_eq!(
            msg,
            "Exactly one of the options '--show' or '--migrate' is required."
        );
        let msg = violation(&["dnvm", "manifest", "--show", "--migrate"]).unwrap();
        assert!(msg.contains("'--show' or '--migrate'"));

        assert_eq!(violation(&["dnvm", "manifest", "--show"]), None);
        assert_eq!(violation(&["dnvm", "manifest", "--migrate"]), None);
    }

    #[test]
    fn pretty_requires_show() {
        let msg = violation(&["dnvm", "manifest", "--migrate", "--pretty"]).unwrap();
        assert_eq!(
            msg,
            "Option '--pretty' is only valid when also using '--show'."
        );
        assert_eq!(violation(&["dnvm", "manifest", "--show", "--pretty"]), None);
    }

    #[test]
    fn commands_without_rules() {
        assert_eq!(violation(&["dnvm", "rid"]), None);
        assert_eq!(violation(&["dnvm", "add-to-path", r"C:\dnvm"]), None);
        assert_eq!(violation(&["dnvm", "add-to-path"]), None);
    }
}
