//! Parametric Test Record (PTR) and its optional field groups.

use std::fmt;
use std::io::{Read, Seek, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{cn_size, RecordKind, StdfRecord};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::write::FieldWriter;

/// Parametric Test Record (PTR)
///
/// One measured value for one test on one part. Everything after `OPT_FLAG` is
/// optional: each group is on the wire only when its bits are set in
/// [`optional_flags`](Self::optional_flags), otherwise its fields keep their defaults.
///
/// | Bits   | Fields                                     |
/// |--------|--------------------------------------------|
/// | `0x01` | `RES_SCAL`                                 |
/// | `0x06` | `LLM_SCAL`, `LO_LIMIT`                     |
/// | `0x18` | `HLM_SCAL`, `HI_LIMIT`                     |
/// | `0x20` | `UNITS`                                    |
/// | `0x40` | `C_RESFMT`                                 |
/// | `0x80` | `C_LLMFMT`, `C_HLMFMT`                     |
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParametricTest {
    /// Test number (`TEST_NUM`)
    pub test_number: u32,
    /// Test head number (`HEAD_NUM`)
    pub head_number: u8,
    /// Test site number (`SITE_NUM`)
    pub site_number: u8,
    /// Test flags (`TEST_FLG`)
    pub test_flags: u8,
    /// Parametric test flags (`PARM_FLG`)
    pub parametric_flags: u8,
    /// Measured value (`RESULT`)
    pub result: f32,
    /// Test description text (`TEST_TXT`)
    pub test_text: String,
    /// Alarm name (`ALARM_ID`)
    pub alarm_id: String,
    /// Optional group bitmask (`OPT_FLAG`)
    pub optional_flags: u8,
    /// Result exponent (`RES_SCAL`)
    pub result_scale: i8,
    /// Low limit exponent (`LLM_SCAL`)
    pub low_limit_scale: i8,
    /// High limit exponent (`HLM_SCAL`)
    pub high_limit_scale: i8,
    /// Low test limit (`LO_LIMIT`)
    pub low_limit: f32,
    /// High test limit (`HI_LIMIT`)
    pub high_limit: f32,
    /// Units of the result (`UNITS`)
    pub units: String,
    /// Result format string (`C_RESFMT`)
    pub result_format: String,
    /// Low limit format string (`C_LLMFMT`)
    pub low_limit_format: String,
    /// High limit format string (`C_HLMFMT`)
    pub high_limit_format: String,
}

impl ParametricTest {
    const FIXED_SIZE: usize = 4 + 1 + 1 + 1 + 1 + 4 + 1;

    /// `OPT_FLAG` bit gating `RES_SCAL`
    pub const RESULT_SCALE: u8 = 0x01;
    /// `OPT_FLAG` bits gating `LLM_SCAL` and `LO_LIMIT`
    pub const LOW_LIMIT: u8 = 0x06;
    /// `OPT_FLAG` bits gating `HLM_SCAL` and `HI_LIMIT`
    pub const HIGH_LIMIT: u8 = 0x18;
    /// `OPT_FLAG` bit gating `UNITS`
    pub const UNITS: u8 = 0x20;
    /// `OPT_FLAG` bit gating `C_RESFMT`
    pub const RESULT_FORMAT: u8 = 0x40;
    /// `OPT_FLAG` bit gating `C_LLMFMT` and `C_HLMFMT`
    pub const LIMIT_FORMATS: u8 = 0x80;

    fn has(&self, group: u8) -> bool {
        self.optional_flags & group != 0
    }
}

impl StdfRecord for ParametricTest {
    const KIND: RecordKind = RecordKind::ParametricTest;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let mut ptr = ParametricTest {
            test_number: cursor.read_u4()?,
            head_number: cursor.read_u1()?,
            site_number: cursor.read_u1()?,
            test_flags: cursor.read_u1()?,
            parametric_flags: cursor.read_u1()?,
            result: cursor.read_r4()?,
            test_text: cursor.read_cn()?,
            alarm_id: cursor.read_cn()?,
            optional_flags: cursor.read_u1()?,
            ..Default::default()
        };

        if ptr.has(Self::RESULT_SCALE) {
            ptr.result_scale = cursor.read_i1()?;
        }
        if ptr.has(Self::LOW_LIMIT) {
            ptr.low_limit_scale = cursor.read_i1()?;
            ptr.low_limit = cursor.read_r4()?;
        }
        if ptr.has(Self::HIGH_LIMIT) {
            ptr.high_limit_scale = cursor.read_i1()?;
            ptr.high_limit = cursor.read_r4()?;
        }
        if ptr.has(Self::UNITS) {
            ptr.units = cursor.read_cn()?;
        }
        if ptr.has(Self::RESULT_FORMAT) {
            ptr.result_format = cursor.read_cn()?;
        }
        if ptr.has(Self::LIMIT_FORMATS) {
            ptr.low_limit_format = cursor.read_cn()?;
            ptr.high_limit_format = cursor.read_cn()?;
        }

        Ok(ptr)
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u4(self.test_number)?;
        out.write_u1(self.head_number)?;
        out.write_u1(self.site_number)?;
        out.write_u1(self.test_flags)?;
        out.write_u1(self.parametric_flags)?;
        out.write_r4(self.result)?;
        out.write_cn("TEST_TXT", &self.test_text)?;
        out.write_cn("ALARM_ID", &self.alarm_id)?;
        out.write_u1(self.optional_flags)?;

        if self.has(Self::RESULT_SCALE) {
            out.write_i1(self.result_scale)?;
        }
        if self.has(Self::LOW_LIMIT) {
            out.write_i1(self.low_limit_scale)?;
            out.write_r4(self.low_limit)?;
        }
        if self.has(Self::HIGH_LIMIT) {
            out.write_i1(self.high_limit_scale)?;
            out.write_r4(self.high_limit)?;
        }
        if self.has(Self::UNITS) {
            out.write_cn("UNITS", &self.units)?;
        }
        if self.has(Self::RESULT_FORMAT) {
            out.write_cn("C_RESFMT", &self.result_format)?;
        }
        if self.has(Self::LIMIT_FORMATS) {
            out.write_cn("C_LLMFMT", &self.low_limit_format)?;
            out.write_cn("C_HLMFMT", &self.high_limit_format)?;
        }
        Ok(())
    }

    fn encoded_size(&self) -> usize {
        let mut size = Self::FIXED_SIZE + cn_size(&self.test_text) + cn_size(&self.alarm_id);

        if self.has(Self::RESULT_SCALE) {
            size += 1;
        }
        if self.has(Self::LOW_LIMIT) {
            size += 1 + 4;
        }
        if self.has(Self::HIGH_LIMIT) {
            size += 1 + 4;
        }
        if self.has(Self::UNITS) {
            size += cn_size(&self.units);
        }
        if self.has(Self::RESULT_FORMAT) {
            size += cn_size(&self.result_format);
        }
        if self.has(Self::LIMIT_FORMATS) {
            size += cn_size(&self.low_limit_format) + cn_size(&self.high_limit_format);
        }
        size
    }
}

impl fmt::Display for ParametricTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PTR Record:")?;
        writeln!(f, "  TEST_NUM: {}", self.test_number)?;
        writeln!(f, "  HEAD_NUM: {}", self.head_number)?;
        writeln!(f, "  SITE_NUM: {}", self.site_number)?;
        writeln!(f, "  TEST_FLG: 0x{:x}", self.test_flags)?;
        writeln!(f, "  PARM_FLG: 0x{:x}", self.parametric_flags)?;
        writeln!(f, "  RESULT: {:.6}", self.result)?;
        writeln!(f, "  TEST_TXT: \"{}\"", self.test_text)?;
        writeln!(f, "  ALARM_ID: \"{}\"", self.alarm_id)?;
        writeln!(f, "  OPT_FLAG: 0x{:x}", self.optional_flags)?;
        writeln!(f, "  RES_SCAL: {}", self.result_scale)?;
        writeln!(f, "  LLM_SCAL: {}", self.low_limit_scale)?;
        writeln!(f, "  HLM_SCAL: {}", self.high_limit_scale)?;
        writeln!(f, "  LO_LIMIT: {:.6}", self.low_limit)?;
        writeln!(f, "  HI_LIMIT: {:.6}", self.high_limit)?;
        writeln!(f, "  UNITS: \"{}\"", self.units)?;
        writeln!(f, "  C_RESFMT: \"{}\"", self.result_format)?;
        writeln!(f, "  C_LLMFMT: \"{}\"", self.low_limit_format)?;
        writeln!(f, "  C_HLMFMT: \"{}\"", self.high_limit_format)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use crate::cursor::ByteCursor;
    use crate::error::Result;
    use crate::record::{ParametricTest, StdfRecord};

    #[rustfmt::skip]
    const MANDATORY: [u8; 16] = [
        0x2A, 0x00, 0x00, 0x00, // TEST_NUM
        0x01,                   // HEAD_NUM
        0x02,                   // SITE_NUM
        0x00,                   // TEST_FLG
        0xC0,                   // PARM_FLG
        0x00, 0x00, 0x20, 0x40, // RESULT
        0x03, b'V', b'D', b'D', // TEST_TXT
    ];

    /// Payload for the given bitmask, with every present group filled in
    fn payload(mask: u8) -> Vec<u8> {
        let mut bytes = MANDATORY.to_vec();
        bytes.push(0x00); // ALARM_ID
        bytes.push(mask);
        if mask & 0x01 != 0 {
            bytes.push(0xFD);
        }
        if mask & 0x06 != 0 {
            bytes.push(0xFA);
            bytes.extend_from_slice(&1.5f32.to_le_bytes());
        }
        if mask & 0x18 != 0 {
            bytes.push(0x03);
            bytes.extend_from_slice(&3.25f32.to_le_bytes());
        }
        if mask & 0x20 != 0 {
            bytes.extend_from_slice(&[0x01, b'V']);
        }
        if mask & 0x40 != 0 {
            bytes.extend_from_slice(&[0x02, b'%', b'f']);
        }
        if mask & 0x80 != 0 {
            bytes.extend_from_slice(&[0x02, b'%', b'd', 0x02, b'%', b'g']);
        }
        bytes
    }

    #[test]
    fn decode_without_optional_groups() -> Result<()> {
        let mut cursor = ByteCursor::new(Cursor::new(payload(0)))?;

        let ptr = ParametricTest::decode(&mut cursor)?;
        assert_eq!(
            ptr,
            ParametricTest {
                test_number: 42,
                head_number: 1,
                site_number: 2,
                parametric_flags: 0xC0,
                result: 2.5,
                test_text: "VDD".into(),
                ..Default::default()
            }
        );
        assert_eq!(ptr.encoded_size(), 18);
        assert!(cursor.is_eof());

        Ok(())
    }

    #[test]
    fn decode_every_optional_bitmask() -> Result<()> {
        for mask in 0..=u8::MAX {
            let input = payload(mask);
            let expected_len = input.len();

            let mut cursor = ByteCursor::new(Cursor::new(input))?;
            let ptr = ParametricTest::decode(&mut cursor)?;

            assert_eq!(cursor.position() as usize, expected_len, "mask {mask:#04x}");
            assert_eq!(ptr.encoded_size(), expected_len, "mask {mask:#04x}");
            assert_eq!(ptr.optional_flags, mask);

            let low = mask & 0x06 != 0;
            let high = mask & 0x18 != 0;
            assert_eq!(ptr.result_scale, if mask & 0x01 != 0 { -3 } else { 0 });
            assert_eq!(ptr.low_limit_scale, if low { -6 } else { 0 });
            assert_eq!(ptr.low_limit, if low { 1.5 } else { 0.0 });
            assert_eq!(ptr.high_limit_scale, if high { 3 } else { 0 });
            assert_eq!(ptr.high_limit, if high { 3.25 } else { 0.0 });
            assert_eq!(ptr.units, if mask & 0x20 != 0 { "V" } else { "" });
            assert_eq!(ptr.result_format, if mask & 0x40 != 0 { "%f" } else { "" });
            assert_eq!(ptr.low_limit_format, if mask & 0x80 != 0 { "%d" } else { "" });
            assert_eq!(ptr.high_limit_format, if mask & 0x80 != 0 { "%g" } else { "" });
        }

        Ok(())
    }

    #[test]
    fn display_all_fields() -> Result<()> {
        let mut cursor = ByteCursor::new(Cursor::new(payload(0xFF)))?;
        let ptr = ParametricTest::decode(&mut cursor)?;

        let text = ptr.to_string();
        assert!(text.starts_with("PTR Record:\n  TEST_NUM: 42\n"));
        assert!(text.contains("  PARM_FLG: 0xc0\n"));
        assert!(text.contains("  RESULT: 2.500000\n"));
        assert!(text.contains("  HI_LIMIT: 3.250000\n"));
        assert!(text.ends_with("  C_HLMFMT: \"%g\"\n"));

        Ok(())
    }
}
