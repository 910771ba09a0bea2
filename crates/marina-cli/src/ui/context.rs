//! Terminal detection and the per-session UI settings derived from it.

use std::io::IsTerminal;

use super::mode::OutputMode;

const DEFAULT_WIDTH: usize = 80;

/// What the process can observe about the terminal it writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalInfo {
    pub stdout_is_tty: bool,
    pub term_is_dumb: bool,
    pub no_color_env: bool,
    pub columns: Option<usize>,
}

impl TerminalInfo {
    /// Inspect stdout and the `TERM`, `NO_COLOR` and `COLUMNS` variables.
    pub fn detect() -> Self {
        Self {
            stdout_is_tty: std::io::stdout().is_terminal(),
            term_is_dumb: std::env::var("TERM").is_ok_and(|term| term == "dumb"),
            no_color_env: std::env::var_os("NO_COLOR").is_some(),
            columns: columns_from_env().or_else(stdout_columns),
        }
    }
}

/// Settings every renderer consults.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// ANSI colors allowed
    pub color: bool,
    /// Unicode badges and box drawing allowed
    pub unicode: bool,
    pub width: usize,
    pub mode: OutputMode,
}

impl UiContext {
    /// Detect the terminal and combine it with the `[ui]` config settings.
    pub fn from_env(format: Option<OutputMode>, no_color: bool, ascii: bool) -> Self {
        Self::resolve(TerminalInfo::detect(), format, no_color, ascii)
    }

    /// Color needs a real, non-dumb terminal and no opt-out from either
    /// `NO_COLOR` or the config. A dumb terminal also gets ASCII only.
    pub fn resolve(
        term: TerminalInfo,
        format: Option<OutputMode>,
        no_color: bool,
        ascii: bool,
    ) -> Self {
        let capable = term.stdout_is_tty && !term.term_is_dumb;
        Self {
            color: capable && !no_color && !term.no_color_env,
            unicode: !ascii && !term.term_is_dumb,
            width: term.columns.unwrap_or(DEFAULT_WIDTH),
            mode: OutputMode::resolve(format, term.stdout_is_tty, term.term_is_dumb),
        }
    }

    /// Plain, colorless context for piped output.
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            color: false,
            unicode: false,
            width: DEFAULT_WIDTH,
            mode: OutputMode::Plain,
        }
    }
}

fn columns_from_env() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.trim().parse::<usize>().ok())
        .filter(|&width| width > 0)
}

#[cfg(unix)]
fn stdout_columns() -> Option<usize> {
    use std::mem::MaybeUninit;

    let mut winsize = MaybeUninit::<libc::winsize>::uninit();
    // SAFETY: TIOCGWINSZ only writes into the winsize buffer we own.
    let result =
        unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, winsize.as_mut_ptr()) };
    if result != 0 {
        return None;
    }
    // SAFETY: ioctl returned success, so the buffer is initialized.
    let winsize = unsafe { winsize.assume_init() };
    (winsize.ws_col > 0).then_some(usize::from(winsize.ws_col))
}

#[cfg(not(unix))]
fn stdout_columns() -> Option<usize> {
    None
}
