use serde::Deserialize;

/// How the shell lays out what it prints. Spelled `plain` / `pretty` in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Fixed-width inventory rows; only problems are reported
    #[default]
    Plain,
    /// Inventory table, badges on every message, colors when allowed
    Pretty,
}

impl OutputMode {
    /// A configured mode always wins. Otherwise pretty needs a TTY that is
    /// not `TERM=dumb`.
    pub fn resolve(configured: Option<OutputMode>, is_tty: bool, term_is_dumb: bool) -> Self {
        match configured {
            Some(mode) => mode,
            None if is_tty && !term_is_dumb => Self::Pretty,
            None => Self::Plain,
        }
    }

    pub fn is_pretty(&self) -> bool {
        *self == Self::Pretty
    }
}
