//! Implementation of `phonebook filter`.

use std::process::ExitCode;

use phonebook_tree::{DepartmentSelection, Query, person_filter};

use super::shared::resolve_or_failure;
use crate::cli::{
    args::{FilterWhat, join_words},
    context::CommandContext,
    output::dim,
};

/// Prints the filter a query would send to the directory.
pub fn run(ctx: &CommandContext, what: &FilterWhat) -> ExitCode {
    let query = match what {
        FilterWhat::Text { text } => Query::Text(join_words(text)),
        FilterWhat::Unit { path } => match selection_for(ctx, path) {
            Ok(selection) => Query::Department(selection),
            Err(code) => return code,
        },
    };

    let inner = query.to_filter(ctx.filter_options());
    println!("{}", dim("filter:"));
    println!("{inner}");
    println!("{}", dim("sent to the directory:"));
    println!("{}", person_filter(&inner));
    ExitCode::SUCCESS
}

/// Loads the tree and maps a logical path onto a department selection.
fn selection_for(ctx: &CommandContext, path: &str) -> Result<DepartmentSelection, ExitCode> {
    let (_, tree) = ctx.phonebook_with_tree()?;
    let found = resolve_or_failure(path, &tree)?;
    DepartmentSelection::from_rendered(&tree, &found.coord).ok_or_else(|| {
        eprintln!("error: \"{path}\" selects {}, which has no department filter", found.coord);
        ExitCode::FAILURE
    })
}
