use std::path::PathBuf;

use clap::Parser;

use marina_core::VERSION;

/// Marina - billing ledger for the boats kept at a marina
#[derive(Parser, Debug)]
#[command(name = "marina")]
#[command(author, version = VERSION, about, long_about = None)]
pub struct Cli {
    /// Data file loaded at startup and written back on exit
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,
}
