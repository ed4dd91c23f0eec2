//! Configuration file discovery.
//!
//! The configuration file `ldap-phonebook.json` is looked up in three places, in
//! precedence order: next to the executable, in `/etc/ldap-phonebook/`, and in
//! `~/.config/ldap-phonebook/`.

use std::{
    env,
    path::{Path, PathBuf},
};

use directories::BaseDirs;

/// Application name used for configuration directories.
pub const APP_NAME: &str = "ldap-phonebook";

/// The configuration filename.
pub const CONFIG_FILENAME: &str = "ldap-phonebook.json";

/// System-wide configuration directory.
pub const SYSTEM_CONFIG_DIR: &str = "/etc/ldap-phonebook";

/// Returns every location a configuration file may live at, highest precedence first.
///
/// Locations whose base directory is unknown are omitted. Existence is not checked.
pub fn candidate_paths(
    exe_dir: Option<&Path>,
    system_dir: &Path,
    home: Option<&Path>,
) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);
    if let Some(dir) = exe_dir {
        paths.push(dir.join(CONFIG_FILENAME));
    }
    paths.push(system_dir.join(CONFIG_FILENAME));
    if let Some(home) = home {
        paths.push(user_config_path_in(home));
    }
    paths
}

/// Discovers the configuration files that exist, highest precedence first.
pub fn discover_config_files() -> Vec<PathBuf> {
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let home = home_dir();

    candidate_paths(
        exe_dir.as_deref(),
        Path::new(SYSTEM_CONFIG_DIR),
        home.as_deref(),
    )
    .into_iter()
    .filter(|path| path.is_file())
    .collect()
}

/// Returns the per-user configuration file path (`~/.config/ldap-phonebook/ldap-phonebook.json`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn user_config_path() -> Option<PathBuf> {
    home_dir().map(|home| user_config_path_in(&home))
}

/// Builds the per-user configuration file path below a home directory.
fn user_config_path_in(home: &Path) -> PathBuf {
    home.join(".config").join(APP_NAME).join(CONFIG_FILENAME)
}

/// Returns the current user's home directory.
pub(crate) fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn test_candidate_order() {
        let paths = candidate_paths(
            Some(Path::new("/opt/pb/bin")),
            Path::new("/etc/ldap-phonebook"),
            Some(Path::new("/home/ann")),
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/opt/pb/bin/ldap-phonebook.json"),
                PathBuf::from("/etc/ldap-phonebook/ldap-phonebook.json"),
                PathBuf::from("/home/ann/.config/ldap-phonebook/ldap-phonebook.json"),
            ]
        );
    }

    #[test]
    fn test_candidates_without_exe_or_home() {
        let paths = candidate_paths(None, Path::new("/etc/x"), None);
        assert_eq!(paths, vec![PathBuf::from("/etc/x/ldap-phonebook.json")]);
    }

    #[test]
    fn test_user_config_path_layout() {
        let test_dir = TestDir::new();
        let path = user_config_path_in(test_dir.path());
        assert!(path.ends_with(".config/ldap-phonebook/ldap-phonebook.json"));

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{}").unwrap();
        let found: Vec<PathBuf> =
            candidate_paths(None, &test_dir.path().join("etc"), Some(test_dir.path()))
                .into_iter()
                .filter(|p| p.is_file())
                .collect();
        assert_eq!(found, vec![path]);
    }
}
