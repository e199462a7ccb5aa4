//! Loading labeled training tickets from CSV.
//!
//! The file needs a header row with at least `subject`, `body`, `language`,
//! `queue` and `priority`; other columns are ignored. Empty cells count as
//! missing, and any row missing one of the five fields is dropped here,
//! before the classifier applies its own subject/body filter.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::{info, warn};

use crate::classifier::LabeledTicket;

pub const REQUIRED_COLUMNS: [&str; 5] = ["subject", "body", "language", "queue", "priority"];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}

/// Reads the CSV file at `path` and keeps the complete rows.
pub fn load_training_csv<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledTicket>, DatasetError> {
    let path = path.as_ref();
    info!("Loading training data from {:?}", path);
    read_training_csv(File::open(path)?)
}

/// Reads CSV training data from any reader and keeps the complete rows.
pub fn read_training_csv<R: Read>(input: R) -> Result<Vec<LabeledTicket>, DatasetError> {
    let mut reader = ReaderBuilder::new().from_reader(input);

    let headers = reader.headers()?.clone();
    let mut positions = [0usize; 5];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| DatasetError::MissingColumn(column.to_string()))?;
    }
    let [subject, body, language, queue, priority] = positions;

    let mut tickets = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        let field = |index: usize| {
            record
                .get(index)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let ticket = LabeledTicket {
            subject: field(subject),
            body: field(body),
            queue: field(queue),
            language: field(language),
            priority: field(priority),
        };
        if ticket.is_complete() {
            tickets.push(ticket);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        warn!("Dropped {} rows with missing subject, body or labels", dropped);
    }
    info!("Loaded {} complete training rows", tickets.len());
    Ok(tickets)
}
