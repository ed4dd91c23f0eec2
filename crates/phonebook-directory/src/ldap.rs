//! Live LDAP directory access.

use std::{collections::HashMap, time::Duration};

use ldap3::{LdapConn, LdapConnSettings, Scope, SearchEntry};
use phonebook_config::Config;
use phonebook_tree::{DirectoryRecord, FilterOptions, PERSON_ATTRIBUTES, Query};
use tracing::{debug, info, warn};

use crate::{directory::Directory, error::DirectoryError};

/// A directory backed by an LDAP server.
///
/// Every search opens a fresh connection, binds, runs one subtree search below the base
/// DN and unbinds.
#[derive(Debug, Clone)]
pub struct LdapDirectory {
    /// Server URL (`ldap://host:port`).
    url: String,
    /// Bind DN; an empty DN together with an empty password skips the bind.
    bind_dn: String,
    /// Bind password.
    bind_password: String,
    /// Search base.
    base_dn: String,
    /// Connection timeout.
    timeout: Option<Duration>,
    /// Filter rendering options.
    filter_options: FilterOptions,
}

impl LdapDirectory {
    /// Creates a directory from the connection settings in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: server_url(&config.ldap_server),
            bind_dn: config.bind_dn.clone(),
            bind_password: config.bind_password.clone(),
            base_dn: config.base_dn.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
            filter_options: FilterOptions {
                escape: config.escape_filters,
            },
        }
    }

    /// Opens a connection and binds when credentials are configured.
    fn connect(&self) -> Result<LdapConn, DirectoryError> {
        let mut settings = LdapConnSettings::new();
        if let Some(timeout) = self.timeout {
            settings = settings.set_conn_timeout(timeout);
        }

        let mut conn =
            LdapConn::with_settings(settings, &self.url).map_err(|source| {
                DirectoryError::Connect {
                    server: self.url.clone(),
                    source,
                }
            })?;

        if self.bind_dn.is_empty() && self.bind_password.is_empty() {
            debug!(url = %self.url, "anonymous session");
            return Ok(conn);
        }

        conn.simple_bind(&self.bind_dn, &self.bind_password)
            .and_then(|result| result.success())
            .map_err(|source| DirectoryError::Bind {
                dn: self.bind_dn.clone(),
                source,
            })?;
        Ok(conn)
    }
}

impl Directory for LdapDirectory {
    fn search(&self, query: &Query) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        let filter = query.directory_filter(self.filter_options);
        debug!(url = %self.url, base = %self.base_dn, %filter, "LDAP search");

        let mut conn = self.connect()?;
        let (entries, _) = conn
            .search(&self.base_dn, Scope::Subtree, &filter, PERSON_ATTRIBUTES)
            .and_then(|result| result.success())
            .map_err(|source| DirectoryError::Search { source })?;

        let records: Vec<DirectoryRecord> = entries
            .into_iter()
            .map(|entry| {
                let entry = SearchEntry::construct(entry);
                let attrs: HashMap<String, Vec<String>> = entry.attrs;
                DirectoryRecord::from_attributes(&entry.dn, &attrs)
            })
            .collect();
        info!(found = records.len(), "LDAP search finished");

        if let Err(e) = conn.unbind() {
            warn!(error = %e, "LDAP unbind failed");
        }
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.url, self.base_dn)
    }
}

/// Turns a configured server address into a URL, adding `ldap://` when no scheme is given.
fn server_url(server: &str) -> String {
    let server = server.trim();
    if server.contains("://") {
        server.to_string()
    } else {
        format!("ldap://{server}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url() {
        assert_eq!(server_url("abook:389"), "ldap://abook:389");
        assert_eq!(server_url(" ldaps://dir:636 "), "ldaps://dir:636");
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            timeout_secs: Some(5),
            escape_filters: false,
            ..Config::default()
        };
        let dir = LdapDirectory::from_config(&config);
        assert_eq!(dir.timeout, Some(Duration::from_secs(5)));
        assert_eq!(dir.filter_options, FilterOptions::legacy());
        assert_eq!(dir.describe(), "ldap://abook:389 (dc=mail,dc=local)");
    }
}
