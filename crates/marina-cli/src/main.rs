//! Marina CLI - interactive billing ledger for the boats kept at a marina.
//!
//! `marina <DATA_FILE>` loads the data file, runs the menu shell on stdin, and
//! writes the ledger back to the same file on exit.

use std::io;

use clap::Parser;

mod app;
mod cli;
mod config;
mod constants;
mod logging;
mod shell;
mod ui;

use app::AppContext;
use cli::Cli;
use constants::exit_codes;
use shell::{Outcome, Shell};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app = AppContext::new(&cli);
    logging::init_logging(app.config().log.filter.as_deref());

    let ui = app.ui_context();
    let (mut ledger, data_state) = app.open_ledger(&ui);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = Shell::new(
        &ui,
        &mut ledger,
        &app.cli().data_file,
        stdin.lock(),
        stdout.lock(),
    )
    .with_data_state(data_state)
    .run()?;

    if matches!(outcome, Outcome::SaveFailed | Outcome::SaveRefused) {
        std::process::exit(exit_codes::SAVE_FAILED);
    }
    Ok(())
}
