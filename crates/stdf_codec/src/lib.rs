//! This library reads and writes **STDF** (Standard Test Data Format) files produced by
//! semiconductor test equipment.
//!
//! # STDF Record Stream Format
//!
//! An STDF file is a flat sequence of self-describing records. There is no file header or index:
//! the first record is a File Attribute Record, and every record starts with the same four byte
//! header.
//!
//! | Offset (bytes) | Field         | Description                                           |
//! |----------------|---------------|-------------------------------------------------------|
//! | 0x0000         | Record length | 2 bytes: number of payload bytes after the header     |
//! | 0x0002         | Record type   | 1 byte: major type (`REC_TYP`)                        |
//! | 0x0003         | Record sub    | 1 byte: minor type (`REC_SUB`)                        |
//! | 0x0004         | Payload       | `length` bytes, layout depends on the type pair       |
//!
//! ## Byte Order
//!
//! Files are written in the byte order of the tester's CPU. The order is detected from the first
//! header: a File Attribute Record always has a two byte payload, so its length reads as `2` in
//! exactly one of the two orders. When neither order matches, little-endian is assumed.
//!
//! Eight byte floats (`R8`) are always read little-endian.
//!
//! ## Records
//!
//! | Type pair | Record | Type                                    |
//! |-----------|--------|-----------------------------------------|
//! | (0, 10)   | FAR    | [`record::FileAttribute`]               |
//! | (1, 10)   | MIR    | [`record::MasterInformation`]           |
//! | (1, 40)   | HBR    | [`record::HardwareBin`]                 |
//! | (1, 50)   | SBR    | [`record::SoftwareBin`]                 |
//! | (2, 10)   | WIR    | [`record::WaferInformation`]            |
//! | (2, 20)   | WRR    | [`record::WaferResults`]                |
//! | (5, 10)   | PIR    | [`record::PartInformation`]             |
//! | (5, 20)   | PRR    | [`record::PartResults`]                 |
//! | (15, 10)  | PTR    | [`record::ParametricTest`]              |
//! | (15, 20)  | FTR    | [`record::FunctionalTest`]              |
//!
//! Records with any other type pair are skipped using their header length.
//!
//! ## Field Types
//!
//! - `U1`, `U2`, `U4`, `I1`, `I2`, `I4`: unsigned and signed integers of 1, 2 and 4 bytes
//! - `R4`, `R8`: IEEE 754 floats of 4 and 8 bytes
//! - `C1`: a single Latin-1 character
//! - `Cn`: a one byte length followed by that many Latin-1 characters
//! - `Bn`: a two byte length followed by that many raw bytes
//!
//! ## Additional Information
//!
//! - **File Extension**: `.stdf`, `.std`, commonly gzipped as `.stdf.gz`
//! - **Compression**: gzip input is recognised by its magic bytes when opening a path
//!

pub mod compression;
pub mod cursor;
pub mod error;
pub mod header;
pub mod read;
pub mod record;
pub mod summary;
pub mod write;

pub use compression::CompressionMethod;
pub use read::{StdfReader, StdfReaderOptions};
pub use record::{Record, RecordKind, StdfRecord};
pub use summary::{RecordSink, Summary};
pub use write::{StdfWriter, StdfWriterOptions};

/// Byte order of a file, re-exported from `binrw`
pub use binrw::Endian;
