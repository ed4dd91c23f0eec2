//! Implementation of `phonebook config`.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use crate::cli::{
    context::CommandContext,
    output::{dim, highlight::Highlighter},
};

/// Shows effective configuration settings with the password masked.
///
/// Output is highlighted on a terminal and plain JSON otherwise.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let mut effective = ctx.config.clone();
    effective.source = ctx.source().clone();
    let json = effective.to_json(true);

    if !io::stdout().is_terminal() {
        println!("{json}");
        return ExitCode::SUCCESS;
    }

    match &ctx.config.config_path {
        Some(path) => eprintln!("{}", dim(&format!("loaded from {}", path.display()))),
        None => eprintln!("{}", dim("no configuration file found; showing defaults")),
    }
    println!("{}", Highlighter::new().highlight_json(&json));
    ExitCode::SUCCESS
}
