//! Catalogue error types

use std::num::ParseFloatError;

use thiserror::Error;

/// Result type for catalogue operations
pub type CatalogueResult<T> = Result<T, CatalogueError>;

/// Errors raised while fetching or parsing a catalogue table.
/// Line and column numbers are 1-indexed, as the caller passed them.
#[derive(Error, Debug)]
pub enum CatalogueError {
    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, timeout or other transport failure
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body could not be read as text
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Column numbers start at 1
    #[error("invalid column {column}: columns are numbered from 1")]
    InvalidColumn { column: usize },

    /// Line numbers start at 1
    #[error("invalid start line 0: lines are numbered from 1")]
    InvalidStart,

    /// Row stride must be at least one line
    #[error("invalid step 0: a row spans at least one line")]
    InvalidStep,

    /// Selected line has fewer whitespace-delimited tokens than requested
    #[error("line {line}: no column {column}")]
    MissingColumn { line: usize, column: usize },

    /// Token is not a floating-point number
    #[error("line {line}, column {column}: cannot parse {token:?} as a number: {source}")]
    ParseFloat {
        line: usize,
        column: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },
}
