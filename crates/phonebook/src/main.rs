//! Command-line interface for the LDAP phonebook.

#![warn(missing_docs)]

mod cli;

use std::{io, process::ExitCode};

use clap::Parser;
use tracing::{Level, subscriber::set_global_default};
use tracing_subscriber::EnvFilter;

use crate::cli::{args::Cli, commands, context::CommandContext};

/// Installs the stderr log subscriber; `-v` raises the level from `warn`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .finish();

    if set_global_default(subscriber).is_err() {
        eprintln!("warning: a log subscriber was already installed");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let ctx = if cli.command.needs_config() {
        CommandContext::load(&cli.global)
    } else {
        Ok(CommandContext::unconfigured(&cli.global))
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
