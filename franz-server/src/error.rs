//! Error types for the franz server

use anyhow::Error as AnyhowError;
use std::io;
use thiserror::Error;

/// Main error type for the connection and dispatch loops
#[derive(Error, Debug)]
pub enum ServerError {
    /// I/O error on the socket or a log file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Decode or metadata failure, carried through from the codec layers
    #[error(transparent)]
    Anyhow(#[from] AnyhowError),

    /// A request frame announced an impossible or oversized length
    #[error("invalid frame length: {0}")]
    InvalidFrameLength(i64),
}
