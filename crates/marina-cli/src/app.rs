//! Application context for the Marina CLI.
//!
//! Combines CLI arguments with the lazily-loaded config file.

use once_cell::unsync::OnceCell;

use marina_core::{BoatLedger, LoadError, ParseMode};

use crate::cli::Cli;
use crate::config::{read_config, resolve_config_path, MarinaConfig};
use crate::shell::DataFileState;
use crate::ui::render::notice;
use crate::ui::{Badge, UiContext};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<MarinaConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Get the configuration, loading it on first use.
    ///
    /// An unreadable config file is reported on stderr and the defaults are used.
    pub fn config(&self) -> &MarinaConfig {
        self.config.get_or_init(|| {
            match resolve_config_path().and_then(|path| read_config(&path)) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("Warning: {}; using defaults", err);
                    MarinaConfig::default()
                }
            }
        })
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.config().parsing.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    pub fn ui_context(&self) -> UiContext {
        let ui = &self.config().ui;
        UiContext::from_env(ui.format, ui.no_color, ui.ascii)
    }

    /// Load the data file named on the command line.
    ///
    /// Any load failure is reported and the shell starts with an empty
    /// ledger. Only a file that could not be opened may be written at exit;
    /// one that exists but failed to load is kept as it is.
    pub fn open_ledger(&self, ui: &UiContext) -> (BoatLedger, DataFileState) {
        let mut ledger = BoatLedger::with_mode(self.parse_mode());
        let state = match ledger.load(&self.cli.data_file) {
            Ok(()) => return (ledger, DataFileState::Loaded),
            Err(err) => {
                tracing::warn!(error = %err, "starting with an empty ledger");
                let state = data_file_state(&err);
                let mut message = load_failure_message(&err);
                if !state.may_overwrite() {
                    message.push_str(" It will not be overwritten on exit.");
                }
                if let Some(line) = notice(ui, Badge::Warn, &message) {
                    println!("{}", line);
                }
                state
            }
        };
        (ledger, state)
    }
}

fn data_file_state(err: &LoadError) -> DataFileState {
    match err {
        LoadError::CannotOpen { .. } => DataFileState::Missing,
        LoadError::Read { .. } | LoadError::Malformed { .. } => DataFileState::Unreadable,
    }
}

fn load_failure_message(err: &LoadError) -> String {
    match err {
        LoadError::CannotOpen { path, .. } => {
            format!("Error: Could not open file {}.", path.display())
        }
        other => format!("Error: {}.", other),
    }
}
