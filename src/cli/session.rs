use std::io::Write;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::application::{AppError, EntryKind, Tracker};
use crate::domain::{format_amount, Currency};
use crate::io::{ExportFormat, Exporter};

const HELP: &str = "\
Commands:
  income <amount> [currency] [--date YYYY-MM-DD]   Record income
  expense <amount> [currency] [--date YYYY-MM-DD]  Record an expense
  list                                             Show all entries
  delete <position>...                             Remove entries by list position
  balance                                          Show or hide the balance
  summary                                          Income, expenses and balance
  export [json|csv]                                Print the session entries
  help                                             Show this help
  quit                                             Leave (all entries are discarded)";

/// One line typed into the session.
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Record income
    Income(EntryArgs),

    /// Record an expense
    Expense(EntryArgs),

    /// Show all entries
    #[command(alias = "ls")]
    List,

    /// Remove entries by list position
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true)]
        positions: Vec<usize>,
    },

    /// Show or hide the balance overlay
    Balance,

    /// Income, expenses and balance
    Summary,

    /// Print the session entries
    Export {
        #[arg(default_value = "json")]
        format: String,
    },

    Help,

    #[command(alias = "exit")]
    Quit,
}

#[derive(clap::Args, Debug)]
struct EntryArgs {
    /// Amount as typed, e.g. "25.50"
    #[arg(allow_hyphen_values = true)]
    amount: String,

    /// USD, EUR or TRY (defaults to the session currency)
    currency: Option<String>,

    /// Date of the entry (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Line-oriented front end over a `Tracker`.
pub struct Session {
    tracker: Tracker,
    today: Option<NaiveDate>,
}

impl Session {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            today: None,
        }
    }

    /// Pin the date used when a command omits `--date`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Read commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, mut input: R, mut out: W, interactive: bool) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut buf = Vec::new();
        loop {
            if interactive {
                write!(out, "> ")?;
                out.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            // Undecodable bytes become U+FFFD and fail as an unknown command
            let line = String::from_utf8_lossy(&buf);
            if self.execute(&line, &mut out)? == LoopControl::Exit {
                break;
            }
            out.flush()?;
        }

        out.flush()?;
        Ok(())
    }

    /// Run a single command line. Command errors are reported on `out`;
    /// only write failures are returned.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<LoopControl> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                let message = err.to_string();
                let first_line = message.lines().next().unwrap_or("error: invalid command");
                writeln!(out, "{}", first_line)?;
                return Ok(LoopControl::Continue);
            }
        };

        match self.dispatch(command, out) {
            Ok(control) => Ok(control),
            Err(err) if err.downcast_ref::<AppError>().is_some() => {
                writeln!(out, "error: {}", err)?;
                Ok(LoopControl::Continue)
            }
            Err(err) => Err(err),
        }
    }

    fn dispatch<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<LoopControl> {
        match command {
            SessionCommand::Income(args) => self.add(EntryKind::Income, args, out)?,
            SessionCommand::Expense(args) => self.add(EntryKind::Expense, args, out)?,

            SessionCommand::List => {
                let rows = self.tracker.rows();
                if rows.is_empty() {
                    writeln!(out, "No entries.")?;
                } else {
                    writeln!(out, "{:>4}  {:<16} {}", "#", "AMOUNT", "DATE")?;
                    writeln!(out, "{}", "-".repeat(32))?;
                    for row in rows {
                        writeln!(out, "{:>4}  {:<16} {}", row.position, row.label, row.date)?;
                    }
                }
                self.print_overlay(out)?;
            }

            SessionCommand::Delete { positions } => {
                let removed = self.tracker.remove(&positions)?;
                let noun = if removed.len() == 1 { "entry" } else { "entries" };
                writeln!(out, "Removed {} {}.", removed.len(), noun)?;
                self.print_overlay(out)?;
            }

            SessionCommand::Balance => {
                if self.tracker.toggle_balance() {
                    self.print_overlay(out)?;
                } else {
                    writeln!(out, "Balance hidden.")?;
                }
            }

            SessionCommand::Summary => {
                let summary = self.tracker.summary();
                writeln!(out, "Entries:  {}", summary.count)?;
                writeln!(out, "Income:   {}", format_amount(summary.income))?;
                writeln!(out, "Expenses: {}", format_amount(summary.expense))?;
                writeln!(out, "Balance:  {}", format_amount(summary.balance))?;
            }

            SessionCommand::Export { format } => {
                let format: ExportFormat = format.parse()?;
                let count = Exporter::new(&self.tracker)
                    .export(format, &mut *out)
                    .map_err(export_error)?;
                debug!(count, ?format, "session exported");
            }

            SessionCommand::Help => writeln!(out, "{}", HELP)?,

            SessionCommand::Quit => return Ok(LoopControl::Exit),
        }

        Ok(LoopControl::Continue)
    }

    fn add<W: Write>(&mut self, kind: EntryKind, args: EntryArgs, out: &mut W) -> Result<()> {
        let currency = match args.currency {
            Some(code) => code.parse::<Currency>().map_err(AppError::from)?,
            None => self.tracker.settings().default_currency,
        };
        let date = match args.date {
            Some(text) => parse_date(&text)?,
            None => self.today(),
        };

        let form = match kind {
            EntryKind::Income => self.tracker.income_form(date),
            EntryKind::Expense => self.tracker.expense_form(date),
        }
        .with_currency(currency)
        .with_amount(args.amount);

        // An unparseable amount records nothing and prints nothing.
        if self.tracker.submit(&form).is_some() {
            if let Some(row) = self.tracker.rows().last() {
                writeln!(out, "Added {}: {} ({})", kind, row.label, row.date)?;
            }
            self.print_overlay(out)?;
        }
        Ok(())
    }

    fn print_overlay<W: Write>(&self, out: &mut W) -> Result<()> {
        if let Some(text) = self.tracker.balance_overlay() {
            writeln!(out, "Balance: {}", text)?;
        }
        Ok(())
    }
}

/// Write failures end the session; anything else is reported as a command error.
fn export_error(err: anyhow::Error) -> anyhow::Error {
    let is_write_failure = err.is::<std::io::Error>()
        || err
            .downcast_ref::<csv::Error>()
            .is_some_and(|e| e.is_io_error())
        || err
            .downcast_ref::<serde_json::Error>()
            .is_some_and(|e| e.is_io());
    if is_write_failure {
        err
    } else {
        AppError::Export(err).into()
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(text.to_string()))
}
