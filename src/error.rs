//! Typed failures at the edges of the crate.
//!
//! The filter engines, option derivation and the itinerary never fail; only
//! acquiring data and parsing user input can.

use thiserror::Error;

/// Failures of the data-source collaborator.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("expected a JSON array of rows, an array of records, or an object with a \"values\" array")]
    UnexpectedJsonShape,

    #[error("JSON row {0} is neither an array nor an object")]
    InvalidJsonRow(usize),
}

/// Failures parsing command-line style values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown meal '{0}' (expected breakfast, lunch or dinner)")]
    Meal(String),

    #[error("invalid range '{0}' (expected LOW..HIGH)")]
    Bounds(String),

    #[error("unknown export format '{0}' (expected text, json or csv)")]
    Format(String),

    #[error("a day needs a destination")]
    MissingDestination,

    #[error("a day has at most 4 fields (destination|breakfast|lunch|dinner), got {0}")]
    TooManyFields(usize),

    #[error("invalid condition '{0}' (expected COLUMN=VALUE)")]
    Condition(String),
}
