//! Clap argument definitions for the `phonebook` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "phonebook")]
#[command(about = "Company phonebook backed by an LDAP directory")]
#[command(version)]
pub struct Cli {
    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted before or after any subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Read configuration from this file instead of the usual locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory source: ldap, ldif:<path> or json:<path>
    #[arg(long, global = true, value_name = "SPEC")]
    pub source: Option<String>,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Shared output mode flag.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `phonebook tree`.
#[derive(Args, Debug, Clone)]
pub struct TreeCommand {
    /// Only print nodes down to this depth (1 = organizations)
    #[arg(short = 'd', long)]
    pub depth: Option<usize>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `phonebook search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Text to look for in names, e-mail addresses and phone numbers
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Do not retry with keyboard-layout transliteration when nothing is found
    #[arg(long)]
    pub no_fallback: bool,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `phonebook unit`.
#[derive(Args, Debug, Clone)]
pub struct UnitCommand {
    /// Tree path such as "Organization:Department:Unit"
    pub path: String,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for commands that pick one person from a text search.
#[derive(Args, Debug, Clone)]
pub struct PickCommand {
    /// Text to look for
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Which result to use, counting from 1
    #[arg(short = 'i', long, default_value = "1")]
    pub index: usize,
}

/// Arguments for `phonebook init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// What to explain with `phonebook filter`.
#[derive(Clone, Subcommand, Debug)]
pub enum FilterWhat {
    /// Filter for a free-text search
    Text {
        /// Search text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Filter for a tree node
    Unit {
        /// Tree path such as "Organization:Department"
        path: String,
    },
}

/// Supported `phonebook` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the organization tree
    Tree(TreeCommand),

    /// Search people by name, e-mail or phone
    #[command(after_help = "\
If nothing matches and the text was typed with a Latin keyboard layout active,
the search is repeated once with the text mapped to the Russian layout
(\"ghbdtn\" becomes \"привет\").

EXAMPLES:
  phonebook search ivanov
  phonebook search 101 --json
  phonebook search Bdfyjd")]
    Search(SearchCommand),

    /// List the people in a department or unit
    Unit(UnitCommand),

    /// Find a person and show where they sit in the tree
    Locate(PickCommand),

    /// Show the directory filter a query would use, without searching
    Filter {
        /// Query to explain
        #[command(subcommand)]
        what: FilterWhat,
    },

    /// Map text typed in the Latin layout to the Russian layout
    Translit {
        /// Text to convert
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show the full card of a person
    Show(PickCommand),

    /// Interactive session
    Shell,

    /// Write a default configuration file
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

impl Commands {
    /// Returns false for commands that must work without a usable configuration.
    pub fn needs_config(&self) -> bool {
        !matches!(
            self,
            Self::Init(_)
                | Self::Translit { .. }
                | Self::Filter {
                    what: FilterWhat::Text { .. }
                }
        )
    }
}

/// Joins multi-word positional text into one search string.
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
