//! CLI support for the `phonebook` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;
