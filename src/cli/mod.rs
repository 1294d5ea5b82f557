use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::application::{Settings, Tracker, DEFAULT_DATE_FORMAT};
use crate::domain::Currency;

mod session;

pub use session::*;

/// Kasa - income and expense tracker
#[derive(Parser, Debug)]
#[command(name = "kasa")]
#[command(about = "Record income and expenses and keep a running balance for this session")]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Currency used when a command omits it: USD, EUR, TRY
    #[arg(short, long, env = "KASA_CURRENCY", default_value = "USD")]
    pub currency: Currency,

    /// strftime pattern for dates in the entry list
    #[arg(long, env = "KASA_DATE_FORMAT", default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Start with the balance overlay visible
    #[arg(long)]
    pub show_balance: bool,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings::default()
            .with_default_currency(self.currency)
            .with_date_format(self.date_format.clone())
            .with_show_balance(self.show_balance)
    }

    pub async fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let tracker = Tracker::new(self.settings()).context("Invalid settings")?;
        let mut session = Session::new(tracker);

        let interactive = std::io::stdin().is_terminal();
        let input = BufReader::new(tokio::io::stdin());
        session
            .run(input, std::io::stdout(), interactive)
            .await
            .context("Session terminated")
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays the screen.
/// `RUST_LOG` takes precedence over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "kasa=debug" } else { "kasa=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
