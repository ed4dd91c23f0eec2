//! Implementation of `phonebook tree`.

use std::process::ExitCode;

use crate::cli::{
    args::TreeCommand,
    context::CommandContext,
    output::{print_json, tree_lines},
};

/// Prints the organization tree with node coordinates.
pub fn run(ctx: &CommandContext, cmd: &TreeCommand) -> ExitCode {
    let (_, tree) = match ctx.phonebook_with_tree() {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    if cmd.output.json {
        return print_json(&tree);
    }
    for line in tree_lines(&tree, cmd.depth) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}
