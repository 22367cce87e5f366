//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Rewrite message functions and emit the message catalogs
//! - `init`: Initialize lingo configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::transform::ArgMode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root: where the config is searched and paths are resolved from
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output (debug logs go to stderr, filter with LINGO_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write transformed sources and source maps under this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// JSON dictionary path (overrides config file)
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Also write a gettext POT template to this path
    #[arg(long)]
    pub pot: Option<PathBuf>,

    /// How parameters are passed to the runtime
    #[arg(long, value_enum)]
    pub arg_mode: Option<ArgMode>,

    /// Embed each source text as `defaultValue`
    #[arg(long)]
    pub default_value: bool,

    /// Wrap every rewritten call in visible markers
    #[arg(long)]
    pub debug: bool,

    /// Number of hex digits in new message ids (4-40)
    #[arg(long)]
    pub hash_length: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract messages, rewrite them to runtime lookups and write the catalogs
    Extract(ExtractCommand),
    /// Initialize a new .lingorc.json configuration file
    Init,
}
