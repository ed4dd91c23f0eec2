//! Implementation of `phonebook search`.

use std::process::ExitCode;

use super::shared::{note_transliteration, search_or_failure};
use crate::cli::{
    args::{SearchCommand, join_words},
    context::CommandContext,
    output::{print_json, print_people},
};

/// Searches people by free text.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let book = match ctx.phonebook() {
        Ok(book) => book,
        Err(code) => return code,
    };
    let text = join_words(&cmd.text);
    let outcome = match search_or_failure(&book, &text, !cmd.no_fallback) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };

    if cmd.output.json {
        return print_json(&outcome);
    }
    note_transliteration(&outcome);
    print_people(&outcome.records, false)
}
