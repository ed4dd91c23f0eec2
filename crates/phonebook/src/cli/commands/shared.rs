//! Shared helpers for command implementations.

use std::process::ExitCode;

use phonebook_directory::SearchOutcome;
use phonebook_tree::{DirectoryRecord, RenderedTree, Resolution, resolve_path};
use tracing::warn;

use crate::cli::{context::DynPhonebook, output::dim};

/// Runs a text search, exiting with a consistent error on failure.
pub fn search_or_failure(
    book: &DynPhonebook,
    text: &str,
    fallback: bool,
) -> Result<SearchOutcome, ExitCode> {
    book.search_text_with(text, fallback).map_err(|e| {
        eprintln!("error: search failed: {e}");
        ExitCode::FAILURE
    })
}

/// Prints a note when the results came from the transliterated text.
pub fn note_transliteration(outcome: &SearchOutcome) {
    if outcome.transliterated {
        eprintln!(
            "{}",
            dim(&format!("No matches; showing results for \"{}\"", outcome.query_used))
        );
    }
}

/// Searches and returns the `index`-th result (1-based).
pub fn pick_or_failure(
    book: &DynPhonebook,
    text: &str,
    index: usize,
) -> Result<DirectoryRecord, ExitCode> {
    let outcome = search_or_failure(book, text, true)?;
    note_transliteration(&outcome);
    let count = outcome.records.len();
    if count == 0 {
        eprintln!("error: nobody matches \"{text}\"");
        return Err(ExitCode::FAILURE);
    }
    index
        .checked_sub(1)
        .and_then(|i| outcome.records.into_iter().nth(i))
        .ok_or_else(|| {
            eprintln!("error: result {index} out of range (1-{count})");
            ExitCode::FAILURE
        })
}

/// Resolves a logical tree path, logging segments that matched nothing.
pub fn resolve_or_failure(path: &str, tree: &RenderedTree) -> Result<Resolution, ExitCode> {
    let found = resolve_path(path, tree).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })?;
    if !found.is_exact() {
        warn!(
            path,
            missed = ?found.missed,
            coord = %found.coord,
            "tree path matched partially"
        );
    }
    Ok(found)
}
