//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use phonebook_config::{Config, ConfigWarning, Source, user_config_path};
use phonebook_directory::{Directory, Phonebook, open_directory};
use phonebook_tree::{FilterOptions, RenderedTree};
use tracing::{info, warn};

use super::args::GlobalArgs;

/// A phonebook over whichever directory the configuration selected.
pub type DynPhonebook = Phonebook<Box<dyn Directory>>;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
    /// Explicit `--config` path, if given.
    config_override: Option<PathBuf>,
    /// Source given with `--source`, overriding the configured one.
    source_override: Option<Source>,
}

impl CommandContext {
    /// Loads the current directory, configuration and source override.
    ///
    /// An explicit `--config` file must load cleanly; discovered files are skipped with a
    /// warning when broken.
    pub fn load(global: &GlobalArgs) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = match &global.config {
            Some(path) => load_config_file_or_failure(path)?,
            None => Config::load(),
        };
        report_warnings(&config);

        let source_override = match &global.source {
            Some(spec) => Some(parse_source_or_failure(spec, &cwd)?),
            None => None,
        };

        Ok(Self {
            cwd,
            config,
            config_override: global.config.clone(),
            source_override,
        })
    }

    /// Builds a context with default configuration, skipping configuration parsing.
    ///
    /// Used for commands like `init` that should work even when an existing config file
    /// is invalid.
    pub fn unconfigured(global: &GlobalArgs) -> Self {
        Self {
            cwd: env::current_dir().unwrap_or_default(),
            config: Config::default(),
            config_override: global.config.clone(),
            source_override: None,
        }
    }

    /// Returns the source in effect: `--source` if given, else the configured one.
    pub fn source(&self) -> &Source {
        self.source_override.as_ref().unwrap_or(&self.config.source)
    }

    /// Returns the filter rendering options from the configuration.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            escape: self.config.escape_filters,
        }
    }

    /// Returns the configuration file `init` should write.
    pub fn init_target(&self) -> Result<PathBuf, ExitCode> {
        if let Some(path) = &self.config_override {
            return Ok(self.cwd.join(path));
        }
        user_config_path().ok_or_else(|| {
            eprintln!("error: could not determine home directory");
            ExitCode::FAILURE
        })
    }

    /// Opens the selected directory, exiting with a consistent error on failure.
    pub fn phonebook(&self) -> Result<DynPhonebook, ExitCode> {
        let directory = open_directory(&self.config, Some(self.source())).map_err(|e| {
            eprintln!("error: failed to open directory: {e}");
            ExitCode::FAILURE
        })?;
        info!(directory = %directory.describe(), "directory opened");
        Ok(Phonebook::new(directory, self.config.root_name.clone()))
    }

    /// Opens the directory and loads the display tree.
    pub fn phonebook_with_tree(&self) -> Result<(DynPhonebook, RenderedTree), ExitCode> {
        let book = self.phonebook()?;
        let tree = book.load_rendered_tree().map_err(|e| {
            eprintln!("error: failed to load organization tree: {e}");
            ExitCode::FAILURE
        })?;
        Ok((book, tree))
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads an explicitly named configuration file or exits with an error.
fn load_config_file_or_failure(path: &Path) -> Result<Config, ExitCode> {
    Config::load_file(path).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}

/// Parses a `--source` value, resolving relative paths against `cwd`.
fn parse_source_or_failure(spec: &str, cwd: &Path) -> Result<Source, ExitCode> {
    Source::parse(spec, Some(cwd)).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })
}

/// Logs loading and validation problems.
fn report_warnings(config: &Config) {
    for warning in config.warnings.iter().chain(&config.validate()) {
        match warning {
            ConfigWarning::UsingDefaults => info!("{warning}"),
            _ => warn!("{warning}"),
        }
    }
}
