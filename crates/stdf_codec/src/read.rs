//! Types for reading STDF files
//!

use binrw::Endian;
use bon::Builder;
use std::io::{Cursor, Read, Seek};
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, error, instrument, warn};

use crate::compression::decompress;
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::header::{detect_endianness, RecordHeader};
use crate::record::Record;
use crate::summary::RecordSink;

/// Options for how an STDF file should be read
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct StdfReaderOptions {
    /// Byte order to use instead of detecting it from the first header
    pub endian: Option<Endian>,

    /// Reposition after every decoded record using the header length, instead of trusting the
    /// decoder's own consumption
    #[builder(default)]
    pub resync: bool,
}

/// One record slot of the stream, as found on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Offset of the record header from the start of the input
    pub offset: u64,
    /// The record header
    pub header: RecordHeader,
    /// Payload bytes read for this record. For skipped records this is the header length.
    pub consumed: u64,
    /// The decoded record, `None` when the type pair is not one this library decodes
    pub record: Option<Record>,
}

impl Entry {
    /// Whether the payload consumption matches the header length
    pub fn is_consistent(&self) -> bool {
        self.consumed == u64::from(self.header.length)
    }
}

/// Result of reading a whole file
///
/// Reading stops at the first fatal error. The records decoded before it are kept.
#[derive(Debug)]
pub struct Parsed {
    /// Records decoded, in file order
    pub records: Vec<Record>,
    /// The error that stopped decoding, if any
    pub error: Option<Error>,
}

impl Parsed {
    /// Discard the decoded prefix if an error occurred.
    pub fn into_result(self) -> Result<Vec<Record>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

/// STDF record stream reader
///
/// The byte order is detected from the first header when the reader is created, unless one is
/// forced through [`StdfReaderOptions`].
///
/// ```no_run
/// fn list_records(path: &str) -> stdf_codec::error::Result<()> {
///     let mut stdf = stdf_codec::StdfReader::open(path)?;
///
///     while let Some(record) = stdf.next_record()? {
///         println!("{record}");
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct StdfReader<R> {
    cursor: ByteCursor<R>,
    options: StdfReaderOptions,
    detected: Option<Endian>,
    failed: bool,
}

impl StdfReader<Cursor<Vec<u8>>> {
    /// Read the file at `path`, decompressing it if it is gzipped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, StdfReaderOptions::default())
    }

    /// Read the file at `path` with the given options.
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn open_with_options(path: impl AsRef<Path>, options: StdfReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::CannotOpenInput {
            path: path.to_path_buf(),
            source,
        })?;

        StdfReader::with_options(Cursor::new(decompress(bytes)?), options)
    }
}

impl<R: Read + Seek> StdfReader<R> {
    /// Start reading a record stream with default options.
    pub fn new(reader: R) -> Result<StdfReader<R>> {
        Self::with_options(reader, StdfReaderOptions::default())
    }

    /// Start reading a record stream.
    #[instrument(skip(reader), err)]
    pub fn with_options(reader: R, options: StdfReaderOptions) -> Result<StdfReader<R>> {
        let mut cursor = ByteCursor::new(reader)?;

        let detected = match cursor.peek_header_bytes()? {
            Some(raw) => detect_endianness(raw),
            None => None,
        };

        let endian = match (options.endian, detected) {
            (Some(forced), _) => forced,
            (None, Some(endian)) => endian,
            (None, None) => {
                warn!(
                    len = cursor.len(),
                    "first record is not a file attribute record, assuming little-endian"
                );
                Endian::Little
            }
        };
        cursor.set_endian(endian);
        debug!(?endian, ?detected, "byte order selected");

        Ok(StdfReader {
            cursor,
            options,
            detected,
            failed: false,
        })
    }

    /// Byte order used for multi-byte fields
    pub fn endian(&self) -> Endian {
        self.cursor.endian()
    }

    /// Byte order found by detection, `None` if the first header was inconclusive
    pub fn detected_endian(&self) -> Option<Endian> {
        self.detected
    }

    /// Options the reader was created with
    pub fn options(&self) -> &StdfReaderOptions {
        &self.options
    }

    /// Offset of the next record header
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Total size of the (decompressed) input
    pub fn len(&self) -> u64 {
        self.cursor.len()
    }

    /// Whether the input holds no bytes
    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Whether every byte of the input has been consumed
    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }

    /// Read the next header and its payload.
    ///
    /// Unknown record types are skipped by their header length and returned without a record.
    /// Returns `Ok(None)` at the end of the input, and for every call after an error.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        if self.failed || self.cursor.is_eof() {
            return Ok(None);
        }

        let entry = self.read_entry();
        if entry.is_err() {
            self.failed = true;
        }
        entry.map(Some)
    }

    fn read_entry(&mut self) -> Result<Entry> {
        let offset = self.cursor.position();
        let header = self.cursor.read_header()?;
        let payload_start = self.cursor.position();

        let record = match header.kind() {
            Some(kind) => {
                debug!(offset, %kind, length = header.length, "decoding record");
                Some(Record::decode(kind, &mut self.cursor)?)
            }
            None => {
                debug!(
                    offset,
                    major = header.major,
                    minor = header.minor,
                    length = header.length,
                    "skipping unknown record type"
                );
                self.cursor.skip(u64::from(header.length))?;
                None
            }
        };

        let consumed = self.cursor.position() - payload_start;
        if self.options.resync && consumed != u64::from(header.length) {
            warn!(
                offset,
                length = header.length,
                consumed,
                "record consumption differs from header length, resynchronising"
            );
            let next = payload_start + u64::from(header.length);
            if next > self.cursor.len() {
                return Err(Error::UnexpectedEndOfData {
                    offset: payload_start,
                    needed: u64::from(header.length),
                    remaining: self.cursor.len() - payload_start,
                });
            }
            self.cursor.seek_to(next)?;
        }

        Ok(Entry {
            offset,
            header,
            consumed,
            record,
        })
    }

    /// Decode the next record, skipping over unknown record types.
    ///
    /// Returns `Ok(None)` at the end of the input.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        while let Some(entry) = self.next_entry()? {
            if let Some(record) = entry.record {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Iterate over the remaining records. The iterator ends after yielding an error.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }

    /// Decode every remaining record, stopping at the first error.
    pub fn read_all(&mut self) -> Parsed {
        let mut records = Vec::new();

        loop {
            match self.next_record() {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {
                    return Parsed {
                        records,
                        error: None,
                    }
                }
                Err(err) => {
                    error!(
                        offset = self.cursor.position(),
                        decoded = records.len(),
                        "decoding stopped: {err}"
                    );
                    return Parsed {
                        records,
                        error: Some(err),
                    };
                }
            }
        }
    }

    /// Feed every remaining record to `sink`, then finish it.
    pub fn drain_into<S: RecordSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        while let Some(record) = self.next_record()? {
            sink.accept(&record)?;
        }
        sink.finish()
    }
}

/// Iterator over decoded records, see [`StdfReader::records`]
pub struct Records<'a, R> {
    reader: &'a mut StdfReader<R>,
}

impl<R: Read + Seek> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_record().transpose()
    }
}

impl<R: Read + Seek> FusedIterator for Records<'_, R> {}
