//! Command implementations and dispatch.

pub mod config;
pub mod filter;
pub mod init;
pub mod locate;
pub mod search;
mod shared;
pub mod shell;
pub mod show;
pub mod translit;
pub mod tree;
pub mod unit;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Tree(cmd) => tree::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Unit(cmd) => unit::run(ctx, &cmd),
        Commands::Locate(cmd) => locate::run(ctx, &cmd),
        Commands::Filter { what } => filter::run(ctx, &what),
        Commands::Translit { text } => translit::run(&text),
        Commands::Show(cmd) => show::run(ctx, &cmd),
        Commands::Shell => shell::run(ctx),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
