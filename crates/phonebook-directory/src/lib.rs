//! Directory access for the LDAP phonebook.
//!
//! People come from a [`Directory`]: a live LDAP server ([`LdapDirectory`]) or an export
//! file held in memory ([`MemoryDirectory`], LDIF or JSON). [`Phonebook`] layers the
//! phonebook operations on top (tree loading, text search with keyboard-layout
//! fallback, department listing) and [`Session`] runs them in the background for
//! interactive front ends.

#![warn(missing_docs)]

mod directory;
mod error;
mod json;
mod ldap;
mod ldif;
mod memory;
mod service;
mod session;

pub use directory::{Directory, open_directory};
pub use error::DirectoryError;
pub use json::parse_json;
pub use ldap::LdapDirectory;
pub use ldif::{LdifEntry, LdifError, parse_ldif};
pub use memory::MemoryDirectory;
pub use service::{Phonebook, SearchOutcome};
pub use session::{Request, Session, Slot, Ticket, Update};
