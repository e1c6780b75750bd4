//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// cfgtree - Resolve sectioned cfg files into parameter values
#[derive(Parser, Debug)]
#[command(name = "cfgtree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the cfg files
    #[arg(long, global = true, env = "CFGTREE_ROOT")]
    pub root: Option<String>,

    /// Extension of cfg files
    #[arg(long, global = true)]
    pub ext: Option<String>,

    /// Do not read or write section index caches
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Report unknown arguments instead of failing
    #[arg(long, global = true)]
    pub allow_unknown: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the expanded section tree of a cfg file
    ///
    /// Examples:
    ///   cfgtree sections cfg/train.cfg
    Sections {
        /// Path of the cfg file
        file: PathBuf,
    },

    /// Print the merged argument stream without binding
    ///
    /// Examples:
    ///   cfgtree args train:fast
    ///   cfgtree args train:fast,model:large -- lr=0.1
    Args {
        /// Cfg specifications, `file[:section...]`
        #[arg(required = true)]
        specs: Vec<String>,

        /// Defaults document used for the kinds of `+=` targets
        #[arg(long)]
        defaults: Option<PathBuf>,

        /// Command-line arguments applied after the cfg files
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Resolve cfg files and arguments against a defaults document
    ///
    /// The defaults are read from TOML, JSON or YAML by extension.
    ///
    /// Examples:
    ///   cfgtree resolve --defaults params.toml train:fast -- lr=0.1
    ///   cfgtree resolve --defaults params.json train --json
    Resolve {
        /// Defaults document
        #[arg(long)]
        defaults: PathBuf,

        /// Cfg specifications, `file[:section...]`
        specs: Vec<String>,

        /// Output the resolved parameters as JSON
        #[arg(long)]
        json: bool,

        /// Command-line arguments applied after the cfg files
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   cfgtree completions bash > ~/.local/share/bash-completion/completions/cfgtree
    ///   cfgtree completions zsh > ~/.zfunc/_cfgtree
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
