//! Best-effort parsers for the semi-structured text the backend embeds in
//! `prediction_info`.
mod listing;
mod table;

pub use listing::{parse_job_listings, ListingBlob, RECORD_DELIMITER};
pub use table::{parse_table, TableBlock};

/// Result of parsing a blob of records where individual records may be unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// Every record yielded a value.
    Parsed(Vec<T>),
    /// Some records were dropped; the count says how many.
    PartiallyParsed(Vec<T>, usize),
}

impl<T> ParseOutcome<T> {
    pub(crate) fn from_parts(records: Vec<T>, skipped: usize) -> Self {
        if skipped == 0 {
            Self::Parsed(records)
        } else {
            Self::PartiallyParsed(records, skipped)
        }
    }

    pub fn records(&self) -> &[T] {
        match self {
            Self::Parsed(records) | Self::PartiallyParsed(records, _) => records,
        }
    }

    pub fn skipped(&self) -> usize {
        match self {
            Self::Parsed(_) => 0,
            Self::PartiallyParsed(_, skipped) => *skipped,
        }
    }

    pub fn into_records(self) -> Vec<T> {
        match self {
            Self::Parsed(records) | Self::PartiallyParsed(records, _) => records,
        }
    }
}
