//! Integration tests for phonebook-directory.
//!
//! Loads export files from disk, builds the tree and maps records back onto it.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::PathBuf};

use phonebook_config::{Config, Source};
use phonebook_directory::{
    Directory, DirectoryError, Phonebook, Request, Session, Update, open_directory,
};
use phonebook_tree::{DepartmentSelection, resolve_path};

const PEOPLE_LDIF: &str = "\
version: 1

dn: dc=mail,dc=local
objectClass: domain
dc: mail

dn: uid=ivanov,dc=mail,dc=local
objectClass: inetOrgPerson
cn: Иванов Иван
o: Рога и копыта, Бухгалтерия
ou: Расчетный отдел
mail: ivanov@roga.example
telephoneNumber: 101

dn: uid=petrova,dc=mail,dc=local
objectClass: inetOrgPerson
cn: Петрова Анна
o: Рога и копыта, Бухгалтерия
ou: Касса
telephoneNumber: 102

dn: uid=smith,dc=mail,dc=local
objectClass: inetOrgPerson
cn: John Smith
o: O&#039;Neil Ltd
ou: Support
mail: smith@oneil.example
";

/// Writes the fixture and returns a config pointing at it.
fn ldif_config(dir: &tempfile::TempDir) -> Config {
    let path: PathBuf = dir.path().join("people.ldif");
    fs::write(&path, PEOPLE_LDIF).unwrap();
    Config {
        source: Source::Ldif(path),
        root_name: "Organizations".into(),
        ..Config::default()
    }
}

#[test]
fn test_ldif_tree_and_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let config = ldif_config(&dir);
    let directory = open_directory(&config, None).unwrap();
    let book = Phonebook::new(directory, config.root_name.clone());

    let tree = book.load_rendered_tree().unwrap();
    let orgs: Vec<&str> = tree.root().children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(orgs, ["O'Neil Ltd", "Рога и копыта"]);

    let outcome = book.search_text("petrova").unwrap();
    assert!(outcome.records.is_empty());
    assert!(outcome.transliterated);

    let outcome = book.search_text("102").unwrap();
    let record = &outcome.records[0];
    assert_eq!(record.tree_path(), "Рога и копыта:Бухгалтерия:Касса");

    let found = resolve_path(&record.tree_path(), &tree).unwrap();
    assert!(found.is_exact());
    assert_eq!(found.coord.to_string(), "0:1:0:0");

    let selection = DepartmentSelection::from_rendered(&tree, &found.coord).unwrap();
    let people = book.search_department(&selection).unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].cn, "Петрова Анна");
}

#[test]
fn test_department_lists_all_units() {
    let dir = tempfile::tempdir().unwrap();
    let config = ldif_config(&dir);
    let book = Phonebook::new(open_directory(&config, None).unwrap(), "Root");
    let tree = book.load_rendered_tree().unwrap();

    let coord = resolve_path("Рога и копыта:Бухгалтерия", &tree).unwrap().coord;
    let selection = DepartmentSelection::from_rendered(&tree, &coord).unwrap();
    assert!(matches!(selection, DepartmentSelection::Department { .. }));

    let names: Vec<String> = book
        .search_department(&selection)
        .unwrap()
        .into_iter()
        .map(|r| r.cn)
        .collect();
    assert_eq!(names, ["Иванов Иван", "Петрова Анна"]);
}

#[test]
fn test_json_source_through_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.json");
    fs::write(
        &path,
        r#"[{"dn": "uid=a", "cn": "Ann Archer", "o": "Acme", "ou": "Ops", "mail": "ann@acme.example"}]"#,
    )
    .unwrap();

    let directory = open_directory(&Config::default(), Some(&Source::Json(path))).unwrap();
    assert!(directory.describe().starts_with("json:"));

    let mut session = Session::new(Phonebook::new(directory, "Root"));
    assert!(matches!(session.run(Request::LoadTree), Update::TreeLoaded { .. }));
    let update = session.run(Request::Search {
        text: "acme.example".into(),
        fallback: true,
    });
    assert!(matches!(update, Update::PeopleChanged { .. }));
    assert_eq!(session.people()[0].cn, "Ann Archer");
}

#[test]
fn test_broken_ldif_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ldif");
    fs::write(&path, "dn: a\ncn:: not base64!\n").unwrap();

    let err = open_directory(&Config::default(), Some(&Source::Ldif(path))).err().unwrap();
    assert!(matches!(err, DirectoryError::ParseLdif { line: 2, .. }));
    assert!(err.to_string().contains("broken.ldif:2"));
}
