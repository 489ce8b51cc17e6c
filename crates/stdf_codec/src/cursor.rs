//! Bounded primitive reads over an STDF byte stream
//!

use binrw::{BinRead, Endian};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::header::RecordHeader;

/// A seekable view over an STDF input with a known total length.
///
/// Every read checks the remaining length first, so a truncated input fails with
/// [`Error::UnexpectedEndOfData`] and the position is left at the start of the failed read.
///
/// Multi-byte integers and `f32` values are read in the cursor's [`Endian`]. `f64` values are
/// always read little-endian, whatever the detected order.
#[derive(Debug)]
pub struct ByteCursor<R> {
    inner: R,
    position: u64,
    len: u64,
    endian: Endian,
}

impl<R: Read + Seek> ByteCursor<R> {
    /// Wrap a reader, measuring its total length.
    ///
    /// The cursor starts at the reader's current position.
    pub fn new(mut inner: R) -> Result<Self> {
        let position = inner.stream_position()?;
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(position))?;

        Ok(ByteCursor {
            inner,
            position,
            len,
            endian: Endian::Little,
        })
    }

    /// Current read offset from the start of the input
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total size of the input in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the input contains no bytes at all
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left between the current position and the end of the input
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }

    /// Whether the read position has reached the end of the input
    pub fn is_eof(&self) -> bool {
        self.position >= self.len
    }

    /// Byte order applied to multi-byte reads
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Change the byte order applied to subsequent reads
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn ensure(&self, needed: u64) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(Error::UnexpectedEndOfData {
                offset: self.position,
                needed,
                remaining,
            });
        }
        Ok(())
    }

    /// Move the read position to an absolute offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }

    /// Advance past `count` bytes without decoding them.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.ensure(count)?;
        self.seek_to(self.position + count)
    }

    /// Read the first four bytes at the current position without consuming them.
    ///
    /// Returns `None` when fewer than four bytes remain. The position is restored in every case.
    pub fn peek_header_bytes(&mut self) -> Result<Option<[u8; 4]>> {
        if self.remaining() < 4 {
            return Ok(None);
        }

        let start = self.position;
        let mut raw = [0u8; 4];
        let read = self.inner.read_exact(&mut raw);
        self.seek_to(start)?;
        read?;

        Ok(Some(raw))
    }

    /// Read a record header in the cursor's byte order.
    pub fn read_header(&mut self) -> Result<RecordHeader> {
        self.ensure(RecordHeader::SIZE)?;
        let header = RecordHeader::read_options(&mut self.inner, self.endian, ())?;
        self.position += RecordHeader::SIZE;
        Ok(header)
    }

    /// Read a `U1`
    pub fn read_u1(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let value = self.inner.read_u8()?;
        self.position += 1;
        Ok(value)
    }

    /// Read a `U2`
    pub fn read_u2(&mut self) -> Result<u16> {
        self.ensure(2)?;
        let value = match self.endian {
            Endian::Little => self.inner.read_u16::<LittleEndian>()?,
            Endian::Big => self.inner.read_u16::<BigEndian>()?,
        };
        self.position += 2;
        Ok(value)
    }

    /// Read a `U4`
    pub fn read_u4(&mut self) -> Result<u32> {
        self.ensure(4)?;
        let value = match self.endian {
            Endian::Little => self.inner.read_u32::<LittleEndian>()?,
            Endian::Big => self.inner.read_u32::<BigEndian>()?,
        };
        self.position += 4;
        Ok(value)
    }

    /// Read an `I1`
    pub fn read_i1(&mut self) -> Result<i8> {
        self.ensure(1)?;
        let value = self.inner.read_i8()?;
        self.position += 1;
        Ok(value)
    }

    /// Read an `I2`
    pub fn read_i2(&mut self) -> Result<i16> {
        self.ensure(2)?;
        let value = match self.endian {
            Endian::Little => self.inner.read_i16::<LittleEndian>()?,
            Endian::Big => self.inner.read_i16::<BigEndian>()?,
        };
        self.position += 2;
        Ok(value)
    }

    /// Read an `I4`
    pub fn read_i4(&mut self) -> Result<i32> {
        self.ensure(4)?;
        let value = match self.endian {
            Endian::Little => self.inner.read_i32::<LittleEndian>()?,
            Endian::Big => self.inner.read_i32::<BigEndian>()?,
        };
        self.position += 4;
        Ok(value)
    }

    /// Read an `R4`
    pub fn read_r4(&mut self) -> Result<f32> {
        self.ensure(4)?;
        let value = match self.endian {
            Endian::Little => self.inner.read_f32::<LittleEndian>()?,
            Endian::Big => self.inner.read_f32::<BigEndian>()?,
        };
        self.position += 4;
        Ok(value)
    }

    /// Read an `R8`. No byte-order correction is applied.
    pub fn read_r8(&mut self) -> Result<f64> {
        self.ensure(8)?;
        let value = self.inner.read_f64::<LittleEndian>()?;
        self.position += 8;
        Ok(value)
    }

    /// Read a `C1` as a Latin-1 character
    pub fn read_c1(&mut self) -> Result<char> {
        self.read_u1().map(char::from)
    }

    /// Read a `Cn`: a one byte length followed by that many Latin-1 characters
    pub fn read_cn(&mut self) -> Result<String> {
        let len = self.read_u1()?;
        if len == 0 {
            return Ok(String::new());
        }

        let bytes = self.read_bytes(len as usize)?;
        Ok(bytes.into_iter().map(char::from).collect())
    }

    /// Read a `Bn`: a two byte length followed by that many raw bytes
    pub fn read_bn(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u2()?;
        if len == 0 {
            return Ok(Vec::new());
        }

        self.read_bytes(len as usize)
    }

    /// Read `count` consecutive `U2` values
    pub fn read_u2_array(&mut self, count: u16) -> Result<Vec<u16>> {
        self.ensure(u64::from(count) * 2)?;
        (0..count).map(|_| self.read_u2()).collect()
    }

    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.ensure(count as u64)?;
        let mut buffer = vec![0u8; count];
        self.inner.read_exact(&mut buffer)?;
        self.position += count as u64;
        Ok(buffer)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::Endian;

    use crate::cursor::ByteCursor;
    use crate::error::{Error, Result};

    fn cursor(bytes: &[u8], endian: Endian) -> ByteCursor<Cursor<Vec<u8>>> {
        let mut cursor = ByteCursor::new(Cursor::new(bytes.to_vec())).unwrap();
        cursor.set_endian(endian);
        cursor
    }

    #[test]
    fn read_integers_little_endian() -> Result<()> {
        #[rustfmt::skip]
        let mut input = cursor(&[
            0x7F,
            0x34, 0x12,
            0x78, 0x56, 0x34, 0x12,
            0xFF,
            0xFE, 0xFF,
            0xFD, 0xFF, 0xFF, 0xFF,
        ], Endian::Little);

        assert_eq!(input.read_u1()?, 0x7F);
        assert_eq!(input.read_u2()?, 0x1234);
        assert_eq!(input.read_u4()?, 0x12345678);
        assert_eq!(input.read_i1()?, -1);
        assert_eq!(input.read_i2()?, -2);
        assert_eq!(input.read_i4()?, -3);
        assert!(input.is_eof());
        assert_eq!(input.position(), 14);

        Ok(())
    }

    #[test]
    fn read_integers_big_endian() -> Result<()> {
        #[rustfmt::skip]
        let mut input = cursor(&[
            0x12, 0x34,
            0x12, 0x34, 0x56, 0x78,
            0xFF, 0xFE,
            0x80, 0x00, 0x00, 0x00,
        ], Endian::Big);

        assert_eq!(input.read_u2()?, 0x1234);
        assert_eq!(input.read_u4()?, 0x12345678);
        assert_eq!(input.read_i2()?, -2);
        assert_eq!(input.read_i4()?, i32::MIN);

        Ok(())
    }

    #[test]
    fn read_floats() -> Result<()> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.5f32.to_be_bytes());
        bytes.extend_from_slice(&2.25f64.to_le_bytes());

        let mut input = cursor(&bytes, Endian::Big);
        assert_eq!(input.read_r4()?, 1.5);
        // eight byte floats ignore the detected byte order
        assert_eq!(input.read_r8()?, 2.25);

        Ok(())
    }

    #[test]
    fn read_strings_and_blobs() -> Result<()> {
        #[rustfmt::skip]
        let mut input = cursor(&[
            b'P',
            0x03, b'L', b'O', b'T',
            0x00,
            0x01, 0xE9,
            0x02, 0x00, 0xAA, 0xBB,
            0x00, 0x00,
        ], Endian::Little);

        assert_eq!(input.read_c1()?, 'P');
        assert_eq!(input.read_cn()?, "LOT");
        assert_eq!(input.read_cn()?, "");
        assert_eq!(input.read_cn()?, "\u{e9}");
        assert_eq!(input.read_bn()?, vec![0xAA, 0xBB]);
        assert_eq!(input.read_bn()?, Vec::<u8>::new());
        assert!(input.is_eof());

        Ok(())
    }

    #[test]
    fn read_past_end_fails_without_advancing() {
        let mut input = cursor(&[0x01, 0x02, 0x03], Endian::Little);

        let err = input.read_u4().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEndOfData {
                offset: 0,
                needed: 4,
                remaining: 3
            }
        ));
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn truncated_string_fails() {
        let mut input = cursor(&[0x05, b'a', b'b'], Endian::Little);
        assert!(input.read_cn().unwrap_err().is_end_of_data());
    }

    #[test]
    fn peek_restores_position() -> Result<()> {
        let mut input = cursor(&[0x02, 0x00, 0x00, 0x0A, 0x02, 0x04], Endian::Little);

        assert_eq!(input.peek_header_bytes()?, Some([0x02, 0x00, 0x00, 0x0A]));
        assert_eq!(input.position(), 0);

        input.skip(4)?;
        assert_eq!(input.peek_header_bytes()?, None);
        assert_eq!(input.position(), 4);

        Ok(())
    }

    #[test]
    fn skip_past_end_fails() {
        let mut input = cursor(&[0x00; 3], Endian::Little);
        assert!(input.skip(5).unwrap_err().is_end_of_data());
    }
}
