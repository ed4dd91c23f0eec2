//! Implementation of `phonebook translit`.

use std::process::ExitCode;

use phonebook_tree::transliterate;

use crate::cli::args::join_words;

/// Prints the keyboard-layout transliteration of the text.
pub fn run(text: &[String]) -> ExitCode {
    println!("{}", transliterate(&join_words(text)));
    ExitCode::SUCCESS
}
