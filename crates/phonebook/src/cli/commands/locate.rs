//! Implementation of `phonebook locate`.

use std::process::ExitCode;

use super::shared::{pick_or_failure, resolve_or_failure};
use crate::cli::{
    args::{PickCommand, join_words},
    context::CommandContext,
    output::{dim, subheader},
};

/// Finds a person and prints the tree route to their unit.
pub fn run(ctx: &CommandContext, cmd: &PickCommand) -> ExitCode {
    let (book, tree) = match ctx.phonebook_with_tree() {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let record = match pick_or_failure(&book, &join_words(&cmd.text), cmd.index) {
        Ok(record) => record,
        Err(code) => return code,
    };

    let path = record.tree_path();
    let found = match resolve_or_failure(&path, &tree) {
        Ok(found) => found,
        Err(code) => return code,
    };

    println!("{}", subheader(&record.cn));
    println!("{} {path}", dim("path:"));
    println!("{} {}", dim("coord:"), found.coord);
    let route = tree.route(&found.coord).unwrap_or_default();
    println!("{} {}", dim("route:"), route.join(" > "));
    if !found.is_exact() {
        println!("{} {}", dim("missed:"), found.missed.join(", "));
    }
    ExitCode::SUCCESS
}
