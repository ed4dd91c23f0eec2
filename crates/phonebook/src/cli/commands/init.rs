//! Implementation of `phonebook init`.

use std::process::ExitCode;

use phonebook_config::{Config, default_template};

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{highlight::Highlighter, subheader},
};

/// Writes the default configuration to the user config path, or to `--config`.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let config_path = match ctx.init_target() {
        Ok(path) => path,
        Err(code) => return code,
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    if let Err(e) = Config::write_default(&config_path) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    print!("{}", Highlighter::new().highlight_json(default_template()));
    println!();
    ExitCode::SUCCESS
}
