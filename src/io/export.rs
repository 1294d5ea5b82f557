use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{AppError, Tracker};
use crate::domain::{Amount, Entry, LedgerSummary};

/// Snapshot of the current session. Output only; sessions are never reloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub balance: Amount,
    pub summary: LedgerSummary,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(AppError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Exporter for writing the session's entries in various formats
pub struct Exporter<'a> {
    tracker: &'a Tracker,
}

impl<'a> Exporter<'a> {
    pub fn new(tracker: &'a Tracker) -> Self {
        Self { tracker }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            balance: self.tracker.total_balance(),
            summary: self.tracker.summary(),
            entries: self.tracker.entries().to_vec(),
        }
    }

    /// Write the entries in the given format. Returns the number of entries written.
    pub fn export<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        match format {
            ExportFormat::Json => self.export_json(writer),
            ExportFormat::Csv => self.export_csv(writer),
        }
    }

    /// Export a pretty-printed JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let snapshot = self.snapshot();
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot.entries.len())
    }

    /// Export entries to CSV format. Amounts are written unrounded, as in JSON.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "currency", "amount"])?;

        let mut count = 0;
        for entry in self.tracker.entries() {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.date.format("%Y-%m-%d").to_string(),
                entry.currency.to_string(),
                entry.amount.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}
