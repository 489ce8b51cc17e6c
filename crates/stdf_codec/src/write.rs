//! Types for writing STDF files
//!

use binrw::{io::NoSeek, BinWrite, Endian};
use bon::Builder;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::Write;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::header::RecordHeader;
use crate::record::Record;

/// Options for how the STDF file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct StdfWriterOptions {
    /// Byte order of every multi-byte field, including the record headers
    #[builder(default = Endian::Little)]
    pub endian: Endian,
}

impl Default for StdfWriterOptions {
    fn default() -> Self {
        StdfWriterOptions::builder().build()
    }
}

/// Writes primitive STDF fields in a fixed byte order.
///
/// The mirror of [`crate::cursor::ByteCursor`]: `f64` values are always written little-endian,
/// strings must be Latin-1 and fit a one byte length, blobs must fit a two byte length.
#[derive(Debug)]
pub struct FieldWriter<W> {
    inner: W,
    endian: Endian,
}

fn latin1(field: &'static str, value: char) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::InvalidField {
        field,
        reason: format!("{value:?} is not a Latin-1 character"),
    })
}

impl<W: Write> FieldWriter<W> {
    /// Wrap a writer
    pub fn new(inner: W, endian: Endian) -> Self {
        FieldWriter { inner, endian }
    }

    /// Byte order applied to multi-byte fields
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Unwrap and return the inner writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Write a `U1`
    pub fn write_u1(&mut self, value: u8) -> Result<()> {
        Ok(self.inner.write_u8(value)?)
    }

    /// Write a `U2`
    pub fn write_u2(&mut self, value: u16) -> Result<()> {
        match self.endian {
            Endian::Little => self.inner.write_u16::<LittleEndian>(value)?,
            Endian::Big => self.inner.write_u16::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write a `U4`
    pub fn write_u4(&mut self, value: u32) -> Result<()> {
        match self.endian {
            Endian::Little => self.inner.write_u32::<LittleEndian>(value)?,
            Endian::Big => self.inner.write_u32::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write an `I1`
    pub fn write_i1(&mut self, value: i8) -> Result<()> {
        Ok(self.inner.write_i8(value)?)
    }

    /// Write an `I2`
    pub fn write_i2(&mut self, value: i16) -> Result<()> {
        match self.endian {
            Endian::Little => self.inner.write_i16::<LittleEndian>(value)?,
            Endian::Big => self.inner.write_i16::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write an `I4`
    pub fn write_i4(&mut self, value: i32) -> Result<()> {
        match self.endian {
            Endian::Little => self.inner.write_i32::<LittleEndian>(value)?,
            Endian::Big => self.inner.write_i32::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write an `R4`
    pub fn write_r4(&mut self, value: f32) -> Result<()> {
        match self.endian {
            Endian::Little => self.inner.write_f32::<LittleEndian>(value)?,
            Endian::Big => self.inner.write_f32::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write an `R8`. Never swapped.
    pub fn write_r8(&mut self, value: f64) -> Result<()> {
        Ok(self.inner.write_f64::<LittleEndian>(value)?)
    }

    /// Write a `C1`
    pub fn write_c1(&mut self, field: &'static str, value: char) -> Result<()> {
        let byte = latin1(field, value)?;
        self.write_u1(byte)
    }

    /// Write a `Cn`
    pub fn write_cn(&mut self, field: &'static str, value: &str) -> Result<()> {
        let bytes = value
            .chars()
            .map(|c| latin1(field, c))
            .collect::<Result<Vec<u8>>>()?;
        let len = u8::try_from(bytes.len()).map_err(|_| Error::InvalidField {
            field,
            reason: format!("{} characters do not fit a one byte length", bytes.len()),
        })?;

        self.write_u1(len)?;
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Write a `Bn`
    pub fn write_bn(&mut self, field: &'static str, value: &[u8]) -> Result<()> {
        let len = u16::try_from(value.len()).map_err(|_| Error::InvalidField {
            field,
            reason: format!("{} bytes do not fit a two byte length", value.len()),
        })?;

        self.write_u2(len)?;
        self.inner.write_all(value)?;
        Ok(())
    }

    /// Write consecutive `U2` values with no count prefix
    pub fn write_u2_array(&mut self, values: &[u16]) -> Result<()> {
        values.iter().try_for_each(|value| self.write_u2(*value))
    }
}

/// STDF file generator
///
/// ```
/// # fn doit() -> stdf_codec::error::Result<()>
/// # {
/// use stdf_codec::record::{FileAttribute, PartInformation};
/// use stdf_codec::write::{StdfWriter, StdfWriterOptions};
///
/// let mut stdf = StdfWriter::new(Vec::new(), StdfWriterOptions::default());
///
/// stdf.write_record(&FileAttribute { cpu_type: 2, stdf_version: 4 }.into())?;
/// stdf.write_record(&PartInformation { head_number: 1, site_number: 1 }.into())?;
///
/// let bytes = stdf.finish()?;
/// assert_eq!(bytes.len(), 12);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct StdfWriter<W: Write> {
    inner: W,
    options: StdfWriterOptions,
    payload: Vec<u8>,
    records: u64,
}

impl<W: Write> StdfWriter<W> {
    /// Start a new file on the given writer
    pub fn new(inner: W, options: StdfWriterOptions) -> StdfWriter<W> {
        StdfWriter {
            inner,
            options,
            payload: Vec::new(),
            records: 0,
        }
    }

    /// Number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Encode a record and write it with its header.
    #[instrument(skip_all, fields(kind = %record.kind()), err)]
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        self.payload.clear();
        record.encode(&mut FieldWriter::new(&mut self.payload, self.options.endian))?;

        let size = self.payload.len();
        debug_assert_eq!(size, record.encoded_size());

        let length = u16::try_from(size).map_err(|_| Error::RecordTooLarge {
            kind: record.kind(),
            size,
        })?;
        let (major, minor) = record.kind().record_type();

        self.write_header(RecordHeader::new(length, major, minor))?;
        self.inner.write_all(&self.payload)?;
        self.records += 1;
        Ok(())
    }

    /// Write a record this library does not model, from its already encoded payload.
    pub fn write_raw(&mut self, major: u8, minor: u8, payload: &[u8]) -> Result<()> {
        let length = u16::try_from(payload.len()).map_err(|_| Error::InvalidField {
            field: "payload",
            reason: format!("{} bytes exceed 65535", payload.len()),
        })?;

        self.write_header(RecordHeader::new(length, major, minor))?;
        self.inner.write_all(payload)?;
        self.records += 1;
        Ok(())
    }

    fn write_header(&mut self, header: RecordHeader) -> Result<()> {
        header.write_options(&mut NoSeek::new(&mut self.inner), self.options.endian, ())?;
        Ok(())
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod test {
    use binrw::Endian;
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::record::{FileAttribute, FunctionalTest, PartInformation, RecordKind};
    use crate::write::{FieldWriter, StdfWriter, StdfWriterOptions};

    #[test]
    fn write_little_endian_file() -> Result<()> {
        let mut stdf = StdfWriter::new(Vec::new(), StdfWriterOptions::default());
        stdf.write_record(
            &FileAttribute {
                cpu_type: 2,
                stdf_version: 4,
            }
            .into(),
        )?;
        stdf.write_raw(99, 99, &[1, 2, 3])?;
        assert_eq!(stdf.records_written(), 2);

        #[rustfmt::skip]
        let expected = vec![
            0x02, 0x00, 0x00, 0x0A, 0x02, 0x04,
            0x03, 0x00, 0x63, 0x63, 0x01, 0x02, 0x03,
        ];
        assert_eq!(stdf.finish()?, expected);

        Ok(())
    }

    #[test]
    fn write_big_endian_file() -> Result<()> {
        let mut stdf = StdfWriter::new(
            Vec::new(),
            StdfWriterOptions::builder().endian(Endian::Big).build(),
        );
        stdf.write_record(
            &PartInformation {
                head_number: 1,
                site_number: 3,
            }
            .into(),
        )?;

        assert_eq!(stdf.finish()?, vec![0x00, 0x02, 0x05, 0x0A, 0x01, 0x03]);

        Ok(())
    }

    #[test]
    fn write_fields() -> Result<()> {
        let mut out = FieldWriter::new(Vec::new(), Endian::Big);
        out.write_u2(0x1234)?;
        out.write_i2(-2)?;
        out.write_r8(1.0)?;
        out.write_cn("TEST", "\u{e9}t\u{e9}")?;
        out.write_bn("BLOB", &[0xAB])?;

        #[rustfmt::skip]
        let expected = vec![
            0x12, 0x34,
            0xFF, 0xFE,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F,
            0x03, 0xE9, b't', 0xE9,
            0x00, 0x01, 0xAB,
        ];
        assert_eq!(out.into_inner(), expected);

        Ok(())
    }

    #[test]
    fn reject_unencodable_strings() {
        let mut out = FieldWriter::new(Vec::new(), Endian::Little);

        let err = out.write_cn("UNITS", "\u{3bc}A").unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "UNITS", .. }));

        let err = out.write_cn("TEST_TXT", &"x".repeat(256)).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "TEST_TXT", .. }));
    }

    #[test]
    fn reject_oversized_record() {
        let mut stdf = StdfWriter::new(Vec::new(), StdfWriterOptions::default());
        let record = FunctionalTest {
            return_indexes: vec![0; 20_000],
            return_states: vec![0; 20_000],
            ..Default::default()
        };

        let err = stdf.write_record(&record.into()).unwrap_err();
        assert!(matches!(
            err,
            Error::RecordTooLarge {
                kind: RecordKind::FunctionalTest,
                ..
            }
        ));
        assert_eq!(stdf.records_written(), 0);

        let err = stdf.write_raw(1, 1, &vec![0u8; 70_000]).unwrap_err();
        assert!(matches!(err, Error::InvalidField { .. }));
    }
}
