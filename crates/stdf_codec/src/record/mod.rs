//! The decoded record model.
//!
//! Each supported record kind has its own struct, and [`Record`] is the closed sum over them.
//! Structs implement [`StdfRecord`], which ties together the wire layout in both directions and
//! the encoded size derived from a value.

use derive_more::derive::{Display, From};
use std::io::{Read, Seek, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::write::FieldWriter;

mod bin;
mod file;
mod functional;
mod parametric;
mod part;
mod wafer;

pub use bin::{HardwareBin, SoftwareBin};
pub use file::{FileAttribute, MasterInformation};
pub use functional::FunctionalTest;
pub use parametric::ParametricTest;
pub use part::{PartInformation, PartResults};
pub use wafer::{WaferInformation, WaferResults};

/// The record kinds this library decodes, identified on the wire by a (major, minor) pair.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RecordKind {
    /// File Attribute Record (0, 10)
    #[display("FAR")]
    FileAttribute,
    /// Master Information Record (1, 10)
    #[display("MIR")]
    MasterInformation,
    /// Hardware Bin Record (1, 40)
    #[display("HBR")]
    HardwareBin,
    /// Software Bin Record (1, 50)
    #[display("SBR")]
    SoftwareBin,
    /// Wafer Information Record (2, 10)
    #[display("WIR")]
    WaferInformation,
    /// Wafer Results Record (2, 20)
    #[display("WRR")]
    WaferResults,
    /// Part Information Record (5, 10)
    #[display("PIR")]
    PartInformation,
    /// Part Results Record (5, 20)
    #[display("PRR")]
    PartResults,
    /// Parametric Test Record (15, 10)
    #[display("PTR")]
    ParametricTest,
    /// Functional Test Record (15, 20)
    #[display("FTR")]
    FunctionalTest,
}

impl RecordKind {
    /// Every supported kind, in dispatch table order
    pub const ALL: [RecordKind; 10] = [
        RecordKind::FileAttribute,
        RecordKind::MasterInformation,
        RecordKind::HardwareBin,
        RecordKind::SoftwareBin,
        RecordKind::WaferInformation,
        RecordKind::WaferResults,
        RecordKind::PartInformation,
        RecordKind::PartResults,
        RecordKind::ParametricTest,
        RecordKind::FunctionalTest,
    ];

    /// Look up the kind for a header's type pair. Pairs outside the table return `None`.
    pub fn from_type(major: u8, minor: u8) -> Option<RecordKind> {
        match (major, minor) {
            (0, 10) => Some(RecordKind::FileAttribute),
            (1, 10) => Some(RecordKind::MasterInformation),
            (1, 40) => Some(RecordKind::HardwareBin),
            (1, 50) => Some(RecordKind::SoftwareBin),
            (2, 10) => Some(RecordKind::WaferInformation),
            (2, 20) => Some(RecordKind::WaferResults),
            (5, 10) => Some(RecordKind::PartInformation),
            (5, 20) => Some(RecordKind::PartResults),
            (15, 10) => Some(RecordKind::ParametricTest),
            (15, 20) => Some(RecordKind::FunctionalTest),
            _ => None,
        }
    }

    /// The (major, minor) pair written in the header for this kind
    pub const fn record_type(self) -> (u8, u8) {
        match self {
            RecordKind::FileAttribute => (0, 10),
            RecordKind::MasterInformation => (1, 10),
            RecordKind::HardwareBin => (1, 40),
            RecordKind::SoftwareBin => (1, 50),
            RecordKind::WaferInformation => (2, 10),
            RecordKind::WaferResults => (2, 20),
            RecordKind::PartInformation => (5, 10),
            RecordKind::PartResults => (5, 20),
            RecordKind::ParametricTest => (15, 10),
            RecordKind::FunctionalTest => (15, 20),
        }
    }

    /// Descriptive name of the kind
    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::FileAttribute => "File Attribute Record",
            RecordKind::MasterInformation => "Master Information Record",
            RecordKind::HardwareBin => "Hardware Bin Record",
            RecordKind::SoftwareBin => "Software Bin Record",
            RecordKind::WaferInformation => "Wafer Information Record",
            RecordKind::WaferResults => "Wafer Results Record",
            RecordKind::PartInformation => "Part Information Record",
            RecordKind::PartResults => "Part Results Record",
            RecordKind::ParametricTest => "Parametric Test Record",
            RecordKind::FunctionalTest => "Functional Test Record",
        }
    }
}

/// A record struct with a fixed wire layout.
pub trait StdfRecord: Sized {
    /// Kind announced in this record's header
    const KIND: RecordKind;

    /// Read the payload from the cursor, in wire order.
    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self>;

    /// Write the payload, in wire order.
    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()>;

    /// Number of payload bytes this value occupies on the wire.
    fn encoded_size(&self) -> usize;
}

/// A decoded STDF record
#[derive(Debug, Display, Clone, PartialEq, From)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum Record {
    #[display("{_0}")]
    FileAttribute(FileAttribute),
    #[display("{_0}")]
    MasterInformation(MasterInformation),
    #[display("{_0}")]
    HardwareBin(HardwareBin),
    #[display("{_0}")]
    SoftwareBin(SoftwareBin),
    #[display("{_0}")]
    WaferInformation(WaferInformation),
    #[display("{_0}")]
    WaferResults(WaferResults),
    #[display("{_0}")]
    PartInformation(PartInformation),
    #[display("{_0}")]
    PartResults(PartResults),
    #[display("{_0}")]
    ParametricTest(ParametricTest),
    #[display("{_0}")]
    FunctionalTest(FunctionalTest),
}

impl Record {
    /// Decode the payload of a record of the given kind.
    pub fn decode<R: Read + Seek>(kind: RecordKind, cursor: &mut ByteCursor<R>) -> Result<Record> {
        Ok(match kind {
            RecordKind::FileAttribute => FileAttribute::decode(cursor)?.into(),
            RecordKind::MasterInformation => MasterInformation::decode(cursor)?.into(),
            RecordKind::HardwareBin => HardwareBin::decode(cursor)?.into(),
            RecordKind::SoftwareBin => SoftwareBin::decode(cursor)?.into(),
            RecordKind::WaferInformation => WaferInformation::decode(cursor)?.into(),
            RecordKind::WaferResults => WaferResults::decode(cursor)?.into(),
            RecordKind::PartInformation => PartInformation::decode(cursor)?.into(),
            RecordKind::PartResults => PartResults::decode(cursor)?.into(),
            RecordKind::ParametricTest => ParametricTest::decode(cursor)?.into(),
            RecordKind::FunctionalTest => FunctionalTest::decode(cursor)?.into(),
        })
    }

    /// Write the payload of this record.
    pub fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        match self {
            Record::FileAttribute(r) => r.encode(out),
            Record::MasterInformation(r) => r.encode(out),
            Record::HardwareBin(r) => r.encode(out),
            Record::SoftwareBin(r) => r.encode(out),
            Record::WaferInformation(r) => r.encode(out),
            Record::WaferResults(r) => r.encode(out),
            Record::PartInformation(r) => r.encode(out),
            Record::PartResults(r) => r.encode(out),
            Record::ParametricTest(r) => r.encode(out),
            Record::FunctionalTest(r) => r.encode(out),
        }
    }

    /// Kind of this record
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::FileAttribute(_) => FileAttribute::KIND,
            Record::MasterInformation(_) => MasterInformation::KIND,
            Record::HardwareBin(_) => HardwareBin::KIND,
            Record::SoftwareBin(_) => SoftwareBin::KIND,
            Record::WaferInformation(_) => WaferInformation::KIND,
            Record::WaferResults(_) => WaferResults::KIND,
            Record::PartInformation(_) => PartInformation::KIND,
            Record::PartResults(_) => PartResults::KIND,
            Record::ParametricTest(_) => ParametricTest::KIND,
            Record::FunctionalTest(_) => FunctionalTest::KIND,
        }
    }

    /// Number of payload bytes this record occupies on the wire
    pub fn encoded_size(&self) -> usize {
        match self {
            Record::FileAttribute(r) => r.encoded_size(),
            Record::MasterInformation(r) => r.encoded_size(),
            Record::HardwareBin(r) => r.encoded_size(),
            Record::SoftwareBin(r) => r.encoded_size(),
            Record::WaferInformation(r) => r.encoded_size(),
            Record::WaferResults(r) => r.encoded_size(),
            Record::PartInformation(r) => r.encoded_size(),
            Record::PartResults(r) => r.encoded_size(),
            Record::ParametricTest(r) => r.encoded_size(),
            Record::FunctionalTest(r) => r.encoded_size(),
        }
    }
}

/// Wire size of a `Cn` field
pub(crate) fn cn_size(value: &str) -> usize {
    1 + value.chars().count()
}

/// Wire size of a `Bn` field
pub(crate) fn bn_size(value: &[u8]) -> usize {
    2 + value.len()
}

/// Hex rendering used for `Bn` fields
pub(crate) fn hex(value: &[u8]) -> String {
    let digits: Vec<String> = value.iter().map(|b| format!("{b:02x}")).collect();
    format!("[{}]", digits.join(" "))
}
