//! Record header and byte order detection.

use binrw::{BinRead, BinWrite, Endian};

use crate::record::RecordKind;

/// STDF record header
///
/// Every record starts with these four bytes. The length counts the payload only and is stored
/// in the file's byte order; the two type bytes are single bytes and never swapped.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Number of payload bytes following the header
    pub length: u16,

    /// Record type (`REC_TYP`)
    pub major: u8,

    /// Record sub-type (`REC_SUB`)
    pub minor: u8,
}

impl RecordHeader {
    /// Encoded size of a header in bytes
    pub const SIZE: u64 = 4;

    /// Create a header for a payload of `length` bytes.
    pub fn new(length: u16, major: u8, minor: u8) -> Self {
        RecordHeader {
            length,
            major,
            minor,
        }
    }

    /// The record kind this header announces, if it is one this library decodes.
    pub fn kind(&self) -> Option<RecordKind> {
        RecordKind::from_type(self.major, self.minor)
    }
}

fn is_file_attribute(length: u16, major: u8, minor: u8) -> bool {
    length == 2 && major == 0 && (minor == 10 || minor == 20)
}

/// Decide the byte order of a file from the raw bytes of its first header.
///
/// The first record of a well formed file is a File Attribute Record, whose payload is always
/// two bytes long. The length is tried as stored (little-endian) and then swapped. `None` means
/// neither reading describes a File Attribute Record.
pub fn detect_endianness(raw: [u8; 4]) -> Option<Endian> {
    let [lo, hi, major, minor] = raw;
    let length = u16::from_le_bytes([lo, hi]);

    if is_file_attribute(length, major, minor) {
        Some(Endian::Little)
    } else if is_file_attribute(length.swap_bytes(), major, minor) {
        Some(Endian::Big)
    } else {
        None
    }
}
