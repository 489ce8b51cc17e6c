//! Error types that can be emitted from this library

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::record::RecordKind;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// A read required more bytes than remain in the input
    #[error("unexpected end of data at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    #[diagnostic(help("the file is truncated from this offset"))]
    UnexpectedEndOfData {
        /// Offset of the read that failed
        offset: u64,
        /// Bytes the read required
        needed: u64,
        /// Bytes left in the input
        remaining: u64,
    },

    /// The input could not be opened
    #[error("cannot open input {}", .path.display())]
    CannotOpenInput {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An encoded record payload does not fit in the 16-bit header length
    #[error("{kind} record payload of {size} bytes exceeds 65535")]
    RecordTooLarge {
        /// Kind of the record being written
        kind: RecordKind,
        /// Payload size in bytes
        size: usize,
    },

    /// A field value cannot be represented on the wire
    #[error("field {field} cannot be encoded: {reason}")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl Error {
    /// Whether this error means the input ended in the middle of a read.
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Error::UnexpectedEndOfData { .. })
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
