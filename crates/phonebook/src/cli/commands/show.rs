//! Implementation of `phonebook show`.

use std::process::ExitCode;

use super::shared::pick_or_failure;
use crate::cli::{
    args::{PickCommand, join_words},
    context::CommandContext,
    output::person_card,
};

/// Prints the card of one person.
pub fn run(ctx: &CommandContext, cmd: &PickCommand) -> ExitCode {
    let book = match ctx.phonebook() {
        Ok(book) => book,
        Err(code) => return code,
    };
    match pick_or_failure(&book, &join_words(&cmd.text), cmd.index) {
        Ok(record) => {
            println!("{}", person_card(&record));
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
