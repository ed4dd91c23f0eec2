//! Rendering and JSON serialization for CLI output.

pub mod highlight;
pub mod style;

use std::process::ExitCode;

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use phonebook_tree::{DirectoryRecord, RenderedTree};
use serde::Serialize;

pub use self::style::{dim, header, subheader, warning};

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the people listing table.
pub fn people_table(records: &[DirectoryRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Name", "Phone", "E-mail", "Title", "Unit", "Organization"]);
    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            record.cn.clone(),
            record.telephone_number.clone(),
            record.mail.clone(),
            record.title.clone(),
            record.unit.clone(),
            record.organization.clone(),
        ]);
    }
    table
}

/// Prints a list of people as a table or JSON.
pub fn print_people(records: &[DirectoryRecord], json: bool) -> ExitCode {
    if json {
        return print_json(records);
    }
    if records.is_empty() {
        println!("{}", dim("No people found."));
        return ExitCode::SUCCESS;
    }
    println!("{}", people_table(records));
    println!("{}", dim(&format!("{} found", records.len())));
    ExitCode::SUCCESS
}

/// Renders the tree as indented lines, each followed by its coordinate.
///
/// `max_depth` limits the levels shown below the root (1 = organizations only).
pub fn tree_lines(tree: &RenderedTree, max_depth: Option<usize>) -> Vec<String> {
    tree.walk()
        .into_iter()
        .filter(|(coord, _)| max_depth.is_none_or(|max| coord.depth() - 1 <= max))
        .map(|(coord, node)| {
            let level = coord.depth() - 1;
            let name = if level == 0 {
                header(&node.name)
            } else {
                node.name.clone()
            };
            format!("{}{name}  {}", "  ".repeat(level), dim(&coord.to_string()))
        })
        .collect()
}

/// Renders a person card with styled labels.
pub fn person_card(record: &DirectoryRecord) -> String {
    record
        .details()
        .lines()
        .map(|line| match line.split_once(": ") {
            Some((label, value)) => format!("{} {value}", subheader(&format!("{label}:"))),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
