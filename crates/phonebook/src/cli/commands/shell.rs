//! Implementation of `phonebook shell`.
//!
//! A line-oriented front end over a background `Session`. The tree is loaded when the
//! shell starts; every search or unit selection replaces the current list of people,
//! which `show` and `locate` then index into.

use std::{
    io::{self, BufRead, IsTerminal, Write},
    process::ExitCode,
};

use phonebook_directory::{Directory, Request, Session, Update};
use phonebook_tree::{DepartmentSelection, resolve_path};

use crate::cli::{
    context::CommandContext,
    output::{dim, people_table, person_card, tree_lines, warning},
};

/// Help text printed by `help`.
const HELP: &str = "\
Commands:
  <text>              search people (same as: search <text>)
  search <text>       search by name, e-mail or phone
  unit <path>         list people in Organization[:Department[:Unit]]
  show <n>            show the card of the n-th listed person
  locate <n>          show where the n-th listed person sits in the tree
  tree [depth]        print the organization tree
  reload              reload the tree from the directory
  help                show this help
  quit                leave the shell";

/// One parsed shell input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    /// Free-text search.
    Search(String),
    /// People below a tree path.
    Unit(String),
    /// Card of a listed person (1-based).
    Show(usize),
    /// Tree location of a listed person (1-based).
    Locate(usize),
    /// Print the tree down to an optional depth.
    Tree(Option<usize>),
    /// Reload the tree.
    Reload,
    /// Print help.
    Help,
    /// Leave the shell.
    Quit,
    /// Blank line.
    Nothing,
}

impl ShellCommand {
    /// Parses an input line.
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let index = |what: &str| -> Result<usize, String> {
            rest.parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| format!("usage: {what} <n>, where n is a listed result number"))
        };

        Ok(match word {
            "" => Self::Nothing,
            "quit" | "exit" | "q" => Self::Quit,
            "help" | "?" => Self::Help,
            "reload" => Self::Reload,
            "tree" if rest.is_empty() => Self::Tree(None),
            "tree" => Self::Tree(Some(
                rest.parse()
                    .map_err(|_| String::from("usage: tree [depth]"))?,
            )),
            "show" => Self::Show(index("show")?),
            "locate" => Self::Locate(index("locate")?),
            "unit" if rest.is_empty() => return Err(String::from("usage: unit <path>")),
            "unit" => Self::Unit(rest.to_string()),
            "search" => Self::Search(rest.to_string()),
            _ => Self::Search(line.to_string()),
        })
    }
}

/// Runs the interactive shell on stdin and stdout.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let book = match ctx.phonebook() {
        Ok(book) => book,
        Err(code) => return code,
    };
    let mut session = Session::new(book);
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();

    match run_loop(&mut session, stdin.lock(), io::stdout().lock(), prompt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Reads commands until end of input or `quit`.
fn run_loop<D, R, W>(
    session: &mut Session<D>,
    input: R,
    mut out: W,
    prompt: bool,
) -> io::Result<()>
where
    D: Directory + 'static,
    R: BufRead,
    W: Write,
{
    let update = session.run(Request::LoadTree);
    report(&mut out, session, update)?;

    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "phonebook> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(usage) => {
                writeln!(out, "{}", warning(&usage))?;
                continue;
            }
        };
        if command == ShellCommand::Quit {
            return Ok(());
        }
        execute(&mut out, session, command)?;
    }
}

/// Executes one command against the session.
fn execute<D, W>(out: &mut W, session: &mut Session<D>, command: ShellCommand) -> io::Result<()>
where
    D: Directory + 'static,
    W: Write,
{
    match command {
        ShellCommand::Nothing | ShellCommand::Quit => Ok(()),
        ShellCommand::Help => writeln!(out, "{HELP}"),
        ShellCommand::Reload => {
            let update = session.run(Request::LoadTree);
            report(out, session, update)
        }
        ShellCommand::Tree(depth) => match session.tree() {
            Some(tree) => {
                for line in tree_lines(tree, depth) {
                    writeln!(out, "{line}")?;
                }
                Ok(())
            }
            None => writeln!(out, "{}", warning("the tree is not loaded; try reload")),
        },
        ShellCommand::Search(text) => {
            let update = session.run(Request::Search {
                text,
                fallback: true,
            });
            report(out, session, update)
        }
        ShellCommand::Unit(path) => match select_unit(session, &path) {
            Ok(selection) => {
                let update = session.run(Request::Department(selection));
                report(out, session, update)
            }
            Err(message) => writeln!(out, "{}", warning(&message)),
        },
        ShellCommand::Show(n) => match session.people().get(n - 1) {
            Some(record) => writeln!(out, "{}", person_card(record)),
            None => writeln!(out, "{}", warning(&format!("no result number {n}"))),
        },
        ShellCommand::Locate(n) => locate(out, session, n),
    }
}

/// Maps a logical path onto a department selection in the session's tree.
fn select_unit<D: Directory + 'static>(
    session: &Session<D>,
    path: &str,
) -> Result<DepartmentSelection, String> {
    let tree = session
        .tree()
        .ok_or_else(|| String::from("the tree is not loaded; try reload"))?;
    let found = resolve_path(path, tree).map_err(|e| e.to_string())?;
    if !found.is_exact() {
        return Err(format!("no such node: {}", found.missed.join(", ")));
    }
    DepartmentSelection::from_rendered(tree, &found.coord)
        .ok_or_else(|| format!("\"{path}\" is not a department or unit"))
}

/// Prints where the n-th listed person sits in the tree.
fn locate<D, W>(out: &mut W, session: &Session<D>, n: usize) -> io::Result<()>
where
    D: Directory + 'static,
    W: Write,
{
    let (Some(record), Some(tree)) = (session.people().get(n - 1), session.tree()) else {
        return writeln!(out, "{}", warning(&format!("no result number {n}")));
    };
    match resolve_path(&record.tree_path(), tree) {
        Ok(found) => {
            let route = tree.route(&found.coord).unwrap_or_default();
            writeln!(out, "{}  {}", route.join(" > "), dim(&found.coord.to_string()))
        }
        Err(e) => writeln!(out, "{}", warning(&e.to_string())),
    }
}

/// Prints the effect of a finished request.
fn report<D, W>(out: &mut W, session: &Session<D>, update: Update) -> io::Result<()>
where
    D: Directory + 'static,
    W: Write,
{
    match update {
        Update::TreeLoaded { .. } => {
            let organizations = session.tree().map_or(0, |tree| tree.root().children.len());
            writeln!(out, "{}", dim(&format!("{organizations} organizations loaded")))
        }
        Update::PeopleChanged { outcome, .. } => {
            if let Some(outcome) = outcome.filter(|o| o.transliterated) {
                writeln!(
                    out,
                    "{}",
                    dim(&format!("No matches; showing results for \"{}\"", outcome.query_used))
                )?;
            }
            let people = session.people();
            if people.is_empty() {
                return writeln!(out, "{}", dim("No people found."));
            }
            writeln!(out, "{}", people_table(people))
        }
        Update::Failed { error, .. } => writeln!(out, "{}", warning(&format!("error: {error}"))),
        Update::Stale { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use phonebook_directory::{MemoryDirectory, Phonebook};
    use phonebook_tree::DirectoryRecord;

    use super::*;

    fn session() -> Session<MemoryDirectory> {
        let person = |cn: &str, org: &str, unit: &str| DirectoryRecord {
            cn: cn.into(),
            organization: org.into(),
            unit: unit.into(),
            ..DirectoryRecord::default()
        };
        Session::new(Phonebook::new(
            MemoryDirectory::new(vec![
                person("Ann Archer", "Acme, Sales", "EMEA"),
                person("Иванов Иван", "Acme", "Ops"),
            ]),
            "Root",
        ))
    }

    fn run_script(script: &str) -> String {
        let mut session = session();
        let mut out = Vec::new();
        run_loop(&mut session, script.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("  "), Ok(ShellCommand::Nothing));
        assert_eq!(ShellCommand::parse("exit"), Ok(ShellCommand::Quit));
        assert_eq!(ShellCommand::parse("tree 2"), Ok(ShellCommand::Tree(Some(2))));
        assert_eq!(ShellCommand::parse("show 3"), Ok(ShellCommand::Show(3)));
        assert_eq!(
            ShellCommand::parse("unit Acme : Sales"),
            Ok(ShellCommand::Unit("Acme : Sales".into()))
        );
        assert_eq!(
            ShellCommand::parse("ann archer"),
            Ok(ShellCommand::Search("ann archer".into()))
        );
        assert!(ShellCommand::parse("show 0").is_err());
        assert!(ShellCommand::parse("show x").is_err());
        assert!(ShellCommand::parse("unit").is_err());
    }

    #[test]
    fn test_script_search_show_locate() {
        let out = run_script("search archer\nshow 1\nlocate 1\nquit\nsearch never reached\n");
        assert!(out.contains("1 organizations loaded"));
        assert!(out.contains("Ann Archer"));
        assert!(out.contains("Name:"));
        assert!(out.contains("Acme > Sales > EMEA"));
        assert!(!out.contains("never reached"));
    }

    #[test]
    fn test_script_transliterated_search() {
        let out = run_script("Bdfyjd\n");
        assert!(out.contains("\"Иванов\""));
        assert!(out.contains("Иванов Иван"));
    }

    #[test]
    fn test_script_unit_and_errors() {
        let out = run_script("unit Acme:Ops\nunit Nowhere\nshow 5\n");
        assert!(out.contains("Иванов Иван"));
        assert!(out.contains("no such node: Nowhere"));
        assert!(out.contains("no result number 5"));
    }
}
