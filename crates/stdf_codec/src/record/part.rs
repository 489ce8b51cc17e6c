//! Per-part records: PIR and PRR.

use std::fmt;
use std::io::{Read, Seek, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{bn_size, cn_size, hex, RecordKind, StdfRecord};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::write::FieldWriter;

/// Part Information Record (PIR)
///
/// Marks the start of testing for one part.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartInformation {
    /// Test head number (`HEAD_NUM`)
    pub head_number: u8,
    /// Test site number (`SITE_NUM`)
    pub site_number: u8,
}

impl StdfRecord for PartInformation {
    const KIND: RecordKind = RecordKind::PartInformation;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(PartInformation {
            head_number: cursor.read_u1()?,
            site_number: cursor.read_u1()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u1(self.head_number)?;
        out.write_u1(self.site_number)
    }

    fn encoded_size(&self) -> usize {
        2
    }
}

impl fmt::Display for PartInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PIR Record:")?;
        writeln!(f, "  HEAD_NUM: {}", self.head_number)?;
        writeln!(f, "  SITE_NUM: {}", self.site_number)
    }
}

/// Part Results Record (PRR)
///
/// The result of testing one part, closing the matching [`PartInformation`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartResults {
    /// Test head number (`HEAD_NUM`)
    pub head_number: u8,
    /// Test site number (`SITE_NUM`)
    pub site_number: u8,
    /// Part information flag (`PART_FLG`)
    pub part_flag: u8,
    /// Number of tests executed (`NUM_TEST`)
    pub test_count: u16,
    /// Hardware bin number (`HARD_BIN`)
    pub hard_bin: u16,
    /// Software bin number (`SOFT_BIN`)
    pub soft_bin: u16,
    /// Wafer X coordinate (`X_COORD`)
    pub x_coordinate: i16,
    /// Wafer Y coordinate (`Y_COORD`)
    pub y_coordinate: i16,
    /// Elapsed test time in milliseconds (`TEST_T`)
    pub test_time: u32,
    /// Part identification (`PART_ID`)
    pub part_id: String,
    /// Part description text (`PART_TXT`)
    pub part_text: String,
    /// Part repair information (`PART_FIX`)
    pub part_fix: Vec<u8>,
}

impl PartResults {
    const FIXED_SIZE: usize = 1 + 1 + 1 + 2 + 2 + 2 + 2 + 2 + 4;

    /// `PART_FLG` bit set when the part failed
    pub const FLAG_FAILED: u8 = 0x08;

    /// `PART_FLG` bit set when no pass/fail indication is available
    pub const FLAG_NO_INDICATION: u8 = 0x10;

    /// Whether the part flag reports a failure
    pub fn failed(&self) -> bool {
        self.part_flag & Self::FLAG_NO_INDICATION == 0 && self.part_flag & Self::FLAG_FAILED != 0
    }
}

impl StdfRecord for PartResults {
    const KIND: RecordKind = RecordKind::PartResults;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(PartResults {
            head_number: cursor.read_u1()?,
            site_number: cursor.read_u1()?,
            part_flag: cursor.read_u1()?,
            test_count: cursor.read_u2()?,
            hard_bin: cursor.read_u2()?,
            soft_bin: cursor.read_u2()?,
            x_coordinate: cursor.read_i2()?,
            y_coordinate: cursor.read_i2()?,
            test_time: cursor.read_u4()?,
            part_id: cursor.read_cn()?,
            part_text: cursor.read_cn()?,
            part_fix: cursor.read_bn()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u1(self.head_number)?;
        out.write_u1(self.site_number)?;
        out.write_u1(self.part_flag)?;
        out.write_u2(self.test_count)?;
        out.write_u2(self.hard_bin)?;
        out.write_u2(self.soft_bin)?;
        out.write_i2(self.x_coordinate)?;
        out.write_i2(self.y_coordinate)?;
        out.write_u4(self.test_time)?;
        out.write_cn("PART_ID", &self.part_id)?;
        out.write_cn("PART_TXT", &self.part_text)?;
        out.write_bn("PART_FIX", &self.part_fix)
    }

    fn encoded_size(&self) -> usize {
        Self::FIXED_SIZE
            + cn_size(&self.part_id)
            + cn_size(&self.part_text)
            + bn_size(&self.part_fix)
    }
}

impl fmt::Display for PartResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PRR Record:")?;
        writeln!(f, "  HEAD_NUM: {}", self.head_number)?;
        writeln!(f, "  SITE_NUM: {}", self.site_number)?;
        writeln!(f, "  PART_FLG: 0x{:x}", self.part_flag)?;
        writeln!(f, "  NUM_TEST: {}", self.test_count)?;
        writeln!(f, "  HARD_BIN: {}", self.hard_bin)?;
        writeln!(f, "  SOFT_BIN: {}", self.soft_bin)?;
        writeln!(f, "  X_COORD: {}", self.x_coordinate)?;
        writeln!(f, "  Y_COORD: {}", self.y_coordinate)?;
        writeln!(f, "  TEST_T: {}", self.test_time)?;
        writeln!(f, "  PART_ID: \"{}\"", self.part_id)?;
        writeln!(f, "  PART_TXT: \"{}\"", self.part_text)?;
        writeln!(f, "  PART_FIX: {}", hex(&self.part_fix))
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::Endian;
    use pretty_assertions::assert_eq;

    use crate::cursor::ByteCursor;
    use crate::error::Result;
    use crate::record::{PartInformation, PartResults, StdfRecord};

    #[test]
    fn decode_part_information() -> Result<()> {
        let mut cursor = ByteCursor::new(Cursor::new(vec![0x01, 0x02]))?;

        let pir = PartInformation::decode(&mut cursor)?;
        assert_eq!(
            pir,
            PartInformation {
                head_number: 1,
                site_number: 2
            }
        );
        assert_eq!(pir.encoded_size(), 2);

        Ok(())
    }

    #[test]
    fn decode_part_results_big_endian() -> Result<()> {
        #[rustfmt::skip]
        let input = vec![
            0x01,                   // HEAD_NUM
            0x04,                   // SITE_NUM
            0x08,                   // PART_FLG
            0x00, 0x0C,             // NUM_TEST
            0x00, 0x05,             // HARD_BIN
            0x01, 0x2C,             // SOFT_BIN
            0xFF, 0xFD,             // X_COORD
            0x00, 0x07,             // Y_COORD
            0x00, 0x00, 0x01, 0xF4, // TEST_T
            0x02, b'P', b'7',       // PART_ID
            0x00,                   // PART_TXT
            0x00, 0x02, 0xDE, 0xAD, // PART_FIX
        ];
        let payload_len = input.len();

        let mut cursor = ByteCursor::new(Cursor::new(input))?;
        cursor.set_endian(Endian::Big);
        let prr = PartResults::decode(&mut cursor)?;

        assert_eq!(
            prr,
            PartResults {
                head_number: 1,
                site_number: 4,
                part_flag: 0x08,
                test_count: 12,
                hard_bin: 5,
                soft_bin: 300,
                x_coordinate: -3,
                y_coordinate: 7,
                test_time: 500,
                part_id: "P7".into(),
                part_text: String::new(),
                part_fix: vec![0xDE, 0xAD],
            }
        );
        assert!(prr.failed());
        assert_eq!(prr.encoded_size(), payload_len);
        assert_eq!(cursor.position() as usize, payload_len);
        assert!(prr.to_string().contains("  PART_FIX: [de ad]\n"));

        Ok(())
    }

    #[test]
    fn part_flag_without_indication_is_not_a_failure() {
        let prr = PartResults {
            part_flag: PartResults::FLAG_FAILED | PartResults::FLAG_NO_INDICATION,
            ..Default::default()
        };
        assert!(!prr.failed());
    }
}
