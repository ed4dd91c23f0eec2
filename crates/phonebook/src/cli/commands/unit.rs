//! Implementation of `phonebook unit`.

use std::process::ExitCode;

use phonebook_tree::DepartmentSelection;

use super::shared::resolve_or_failure;
use crate::cli::{args::UnitCommand, context::CommandContext, output::print_people};

/// Lists the people below the tree node a logical path names.
pub fn run(ctx: &CommandContext, cmd: &UnitCommand) -> ExitCode {
    let (book, tree) = match ctx.phonebook_with_tree() {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let found = match resolve_or_failure(&cmd.path, &tree) {
        Ok(found) => found,
        Err(code) => return code,
    };

    let Some(selection) = DepartmentSelection::from_rendered(&tree, &found.coord) else {
        eprintln!(
            "error: \"{}\" selects {}, which has no department filter",
            cmd.path, found.coord
        );
        eprintln!("select a department or unit, e.g. \"Organization:Department\"");
        return ExitCode::FAILURE;
    };

    match book.search_department(&selection) {
        Ok(people) => print_people(&people, cmd.output.json),
        Err(e) => {
            eprintln!("error: search failed: {e}");
            ExitCode::FAILURE
        }
    }
}
