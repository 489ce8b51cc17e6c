//! Whole-file compression handling.
//!
//! STDF files are commonly shipped gzipped. Input is recognised by its magic bytes, output
//! compression is chosen by the caller.

use std::io::{self, Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use tracing::instrument;

use crate::error::Result;

/// Leading bytes of every gzip stream
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Storage format of a whole STDF file
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Plain record stream
    #[default]
    None,

    /// Record stream wrapped in gzip
    Gzip,
}

impl CompressionMethod {
    /// Identify the compression of a file from its first bytes.
    pub fn detect(bytes: &[u8]) -> CompressionMethod {
        if bytes.starts_with(&GZIP_MAGIC) {
            CompressionMethod::Gzip
        } else {
            CompressionMethod::None
        }
    }

    /// Pick the compression implied by a file name, `.gz` meaning gzip.
    pub fn from_extension(path: &std::path::Path) -> CompressionMethod {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => CompressionMethod::Gzip,
            _ => CompressionMethod::None,
        }
    }
}

/// Return the plain record stream held in `bytes`, decompressing it when needed.
#[instrument(skip(bytes), fields(len = bytes.len()), err)]
pub fn decompress(bytes: Vec<u8>) -> Result<Vec<u8>> {
    match CompressionMethod::detect(&bytes) {
        CompressionMethod::None => Ok(bytes),
        CompressionMethod::Gzip => {
            let mut plain = Vec::new();
            GzDecoder::new(bytes.as_slice()).read_to_end(&mut plain)?;
            Ok(plain)
        }
    }
}

/// Writer that optionally gzips everything written through it
pub enum StdfBlockWriter<W: Write> {
    /// Passes bytes through unchanged
    Raw(W),
    /// Gzips bytes before they reach the inner writer
    Compressed(Box<GzEncoder<W>>),
}

impl<W: Write> StdfBlockWriter<W> {
    /// Wrap a writer with the given compression.
    pub fn new(writer: W, compression: CompressionMethod) -> Self {
        match compression {
            CompressionMethod::None => StdfBlockWriter::Raw(writer),
            CompressionMethod::Gzip => StdfBlockWriter::Compressed(Box::new(GzEncoder::new(
                writer,
                Compression::default(),
            ))),
        }
    }

    /// Complete the compressed stream and return the inner writer.
    #[instrument(skip(self), err)]
    pub fn finalize(self) -> io::Result<W> {
        match self {
            StdfBlockWriter::Raw(w) => Ok(w),
            StdfBlockWriter::Compressed(w) => w.finish(),
        }
    }
}

impl<W: Write> Write for StdfBlockWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StdfBlockWriter::Raw(w) => w.write(buf),
            StdfBlockWriter::Compressed(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StdfBlockWriter::Raw(w) => w.flush(),
            StdfBlockWriter::Compressed(w) => w.flush(),
        }
    }
}
