//! Interactive menu loop over a [`BoatLedger`].
//!
//! Reads one command per line from any `BufRead` and writes prompts and
//! messages to any `Write`, so the loop runs the same against a terminal,
//! a pipe, or an in-memory buffer.

use std::io::{self, BufRead, Write};
use std::path::Path;

use marina_core::{
    format_amount, parse_payment, AddError, BoatLedger, PayError, RemoveError, SaveError,
};
use tracing::debug;

use crate::ui::format::format_money;
use crate::ui::render::{self, kv, notice};
use crate::ui::{Badge, UiContext};

const MENU_PROMPT: &str = "(I)nventory, (A)dd, (R)emove, (P)ayment, (M)onth, E(x)it : ";
const ADD_PROMPT: &str = "Please enter the boat data in CSV format: ";
const NAME_PROMPT: &str = "Please enter the boat name: ";
const AMOUNT_PROMPT: &str = "Please enter the amount to be paid: ";

const NO_SUCH_BOAT: &str = "No boat with that name.";
const AT_CAPACITY: &str = "Error: At maximum capacity for boats.";
const EXITING: &str = "Exiting the Boat Management System.";

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Saved,
    SaveFailed,
    /// The data file was not loaded at startup, so it was left as it was.
    SaveRefused,
}

/// What reading the data file at startup found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFileState {
    Loaded,
    /// The file could not be opened; saving at exit creates it.
    Missing,
    /// The file exists but could not be loaded; it is never overwritten.
    Unreadable,
}

impl DataFileState {
    pub fn may_overwrite(self) -> bool {
        self != Self::Unreadable
    }
}

/// A menu selection, taken from the first non-blank character of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Inventory,
    Add,
    Remove,
    Payment,
    Month,
    Exit,
    Invalid(char),
}

impl MenuChoice {
    /// `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let c = line.trim_start().chars().next()?.to_ascii_lowercase();
        Some(match c {
            'i' => Self::Inventory,
            'a' => Self::Add,
            'r' => Self::Remove,
            'p' => Self::Payment,
            'm' => Self::Month,
            'x' => Self::Exit,
            other => Self::Invalid(other),
        })
    }
}

pub struct Shell<'a, R, W> {
    ui: &'a UiContext,
    ledger: &'a mut BoatLedger,
    data_file: &'a Path,
    data_state: DataFileState,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        ui: &'a UiContext,
        ledger: &'a mut BoatLedger,
        data_file: &'a Path,
        input: R,
        output: W,
    ) -> Self {
        Self {
            ui,
            ledger,
            data_file,
            data_state: DataFileState::Loaded,
            input,
            output,
        }
    }

    pub fn with_data_state(mut self, state: DataFileState) -> Self {
        self.data_state = state;
        self
    }

    /// Run until the user exits or input ends, then save the ledger.
    ///
    /// # Errors
    ///
    /// Only I/O errors on the shell's own input or output. Ledger failures
    /// are reported to the user and the loop continues.
    pub fn run(&mut self) -> anyhow::Result<Outcome> {
        writeln!(self.output, "{}", render::banner(self.ui))?;

        loop {
            self.prompt(MENU_PROMPT)?;
            let Some(line) = self.read_line()? else {
                // End of input exits like `x`.
                writeln!(self.output)?;
                return self.exit();
            };
            let Some(choice) = MenuChoice::parse(&line) else {
                continue;
            };
            debug!(?choice, "menu selection");

            match choice {
                MenuChoice::Inventory => self.inventory()?,
                MenuChoice::Add => self.add()?,
                MenuChoice::Remove => self.remove()?,
                MenuChoice::Payment => self.payment()?,
                MenuChoice::Month => self.month()?,
                MenuChoice::Exit => return self.exit(),
                MenuChoice::Invalid(c) => self.say(Badge::Err, &format!("Invalid option {}.", c))?,
            }
        }
    }

    fn inventory(&mut self) -> io::Result<()> {
        let listing = render::inventory(self.ui, self.ledger.list());
        if !listing.is_empty() {
            writeln!(self.output, "{}", listing)?;
        }
        Ok(())
    }

    fn add(&mut self) -> io::Result<()> {
        self.prompt(ADD_PROMPT)?;
        let Some(line) = self.read_line()? else {
            return Ok(());
        };

        match self.ledger.add_line(&line) {
            Ok(()) => self.say(Badge::Ok, "Boat added."),
            Err(AddError::AtCapacity(_)) => self.say(Badge::Err, AT_CAPACITY),
            Err(AddError::Malformed(err)) => {
                self.say(Badge::Err, &format!("Invalid boat data: {}.", err))
            }
        }
    }

    fn remove(&mut self) -> io::Result<()> {
        self.prompt(NAME_PROMPT)?;
        let Some(name) = self.read_line()? else {
            return Ok(());
        };

        match self.ledger.remove(name.trim()) {
            Ok(removed) => self.say(Badge::Ok, &format!("Removed {}.", removed.name())),
            Err(RemoveError::NotFound(_)) => self.say(Badge::Err, NO_SUCH_BOAT),
        }
    }

    fn payment(&mut self) -> io::Result<()> {
        self.prompt(NAME_PROMPT)?;
        let Some(name) = self.read_line()? else {
            return Ok(());
        };
        let name = name.trim();
        if !self.ledger.exists(name) {
            return self.say(Badge::Err, NO_SUCH_BOAT);
        }

        self.prompt(AMOUNT_PROMPT)?;
        let Some(raw) = self.read_line()? else {
            return Ok(());
        };
        let amount = match parse_payment(&raw, self.ledger.mode()) {
            Ok(amount) => amount,
            Err(err) => return self.say(Badge::Err, &format!("Invalid amount: {}.", err)),
        };

        match self.ledger.pay(name, amount) {
            Ok(balance) => {
                let message = format!("Payment recorded; {} still owed.", format_money(balance));
                self.say(Badge::Ok, &message)
            }
            Err(PayError::ExceedsBalance(owed)) => self.say(
                Badge::Err,
                &format!("That is more than the amount owed, ${}", format_amount(&owed)),
            ),
            Err(PayError::InvalidAmount(_)) => {
                self.say(Badge::Err, "Payment amount cannot be negative.")
            }
            Err(PayError::NotFound(_)) => self.say(Badge::Err, NO_SUCH_BOAT),
        }
    }

    fn month(&mut self) -> io::Result<()> {
        let total = self.ledger.apply_monthly_charge();
        let line = kv(self.ui, "Billed", &format_money(total));
        self.say(Badge::Info, &line)
    }

    fn exit(&mut self) -> anyhow::Result<Outcome> {
        writeln!(self.output, "{}", EXITING)?;

        if !self.data_state.may_overwrite() {
            tracing::warn!(path = %self.data_file.display(), "data file not loaded, save skipped");
            let message = format!(
                "Error: {} was not loaded; leaving it unchanged.",
                self.data_file.display()
            );
            self.say(Badge::Err, &message)?;
            self.output.flush()?;
            return Ok(Outcome::SaveRefused);
        }

        let outcome = match self.ledger.save(self.data_file) {
            Ok(()) => {
                self.say(Badge::Ok, &format!("Saved {} boats.", self.ledger.len()))?;
                Outcome::Saved
            }
            Err(err) => {
                tracing::error!(error = %err, "save failed");
                self.say(Badge::Err, &save_failure_message(&err))?;
                Outcome::SaveFailed
            }
        };
        self.output.flush()?;
        Ok(outcome)
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()
    }

    /// Next input line without its line ending, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let len = buf.trim_end_matches(&['\r', '\n'][..]).len();
        buf.truncate(len);
        Ok(Some(buf))
    }

    fn say(&mut self, kind: Badge, message: &str) -> io::Result<()> {
        match notice(self.ui, kind, message) {
            Some(line) => writeln!(self.output, "{}", line),
            None => Ok(()),
        }
    }
}

fn save_failure_message(err: &SaveError) -> String {
    match err {
        SaveError::CannotOpen { path, .. } => {
            format!("Error: Could not open file {} to save.", path.display())
        }
        SaveError::Write { .. } => format!("Error: {}.", err),
    }
}
