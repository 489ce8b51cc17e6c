//! Wafer records: WIR and WRR.

use std::fmt;
use std::io::{Read, Seek, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{cn_size, RecordKind, StdfRecord};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::write::FieldWriter;

/// Wafer Information Record (WIR)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaferInformation {
    /// Test head number (`HEAD_NUM`)
    pub head_number: u8,
    /// Site group number (`SITE_GRP`)
    pub site_group: u8,
    /// Date and time first part tested (`START_T`)
    pub start_time: u32,
    /// Wafer ID (`WAFER_ID`)
    pub wafer_id: String,
}

impl StdfRecord for WaferInformation {
    const KIND: RecordKind = RecordKind::WaferInformation;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(WaferInformation {
            head_number: cursor.read_u1()?,
            site_group: cursor.read_u1()?,
            start_time: cursor.read_u4()?,
            wafer_id: cursor.read_cn()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u1(self.head_number)?;
        out.write_u1(self.site_group)?;
        out.write_u4(self.start_time)?;
        out.write_cn("WAFER_ID", &self.wafer_id)
    }

    fn encoded_size(&self) -> usize {
        1 + 1 + 4 + cn_size(&self.wafer_id)
    }
}

impl fmt::Display for WaferInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WIR Record:")?;
        writeln!(f, "  HEAD_NUM: {}", self.head_number)?;
        writeln!(f, "  SITE_GRP: {}", self.site_group)?;
        writeln!(f, "  START_T: {}", self.start_time)?;
        writeln!(f, "  WAFER_ID: \"{}\"", self.wafer_id)
    }
}

/// Wafer Results Record (WRR)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaferResults {
    /// Test head number (`HEAD_NUM`)
    pub head_number: u8,
    /// Site group number (`SITE_GRP`)
    pub site_group: u8,
    /// Date and time last part tested (`FINISH_T`)
    pub finish_time: u32,
    /// Number of parts tested (`PART_CNT`)
    pub part_count: u32,
    /// Number of parts retested (`RTST_CNT`)
    pub retest_count: u32,
    /// Number of aborts during testing (`ABRT_CNT`)
    pub abort_count: u32,
    /// Number of good parts tested (`GOOD_CNT`)
    pub good_count: u32,
    /// Number of functional parts tested (`FUNC_CNT`)
    pub functional_count: u32,
    /// Wafer ID (`WAFER_ID`)
    pub wafer_id: String,
    /// Fab wafer ID (`FABWF_ID`)
    pub fab_wafer_id: String,
    /// Wafer frame ID (`FRAME_ID`)
    pub frame_id: String,
    /// Wafer mask ID (`MASK_ID`)
    pub mask_id: String,
    /// Wafer description supplied by user (`USR_DESC`)
    pub user_description: String,
    /// Wafer description supplied by exec (`EXC_DESC`)
    pub exec_description: String,
}

impl WaferResults {
    const FIXED_SIZE: usize = 1 + 1 + 4 * 6;
}

impl StdfRecord for WaferResults {
    const KIND: RecordKind = RecordKind::WaferResults;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(WaferResults {
            head_number: cursor.read_u1()?,
            site_group: cursor.read_u1()?,
            finish_time: cursor.read_u4()?,
            part_count: cursor.read_u4()?,
            retest_count: cursor.read_u4()?,
            abort_count: cursor.read_u4()?,
            good_count: cursor.read_u4()?,
            functional_count: cursor.read_u4()?,
            wafer_id: cursor.read_cn()?,
            fab_wafer_id: cursor.read_cn()?,
            frame_id: cursor.read_cn()?,
            mask_id: cursor.read_cn()?,
            user_description: cursor.read_cn()?,
            exec_description: cursor.read_cn()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u1(self.head_number)?;
        out.write_u1(self.site_group)?;
        out.write_u4(self.finish_time)?;
        out.write_u4(self.part_count)?;
        out.write_u4(self.retest_count)?;
        out.write_u4(self.abort_count)?;
        out.write_u4(self.good_count)?;
        out.write_u4(self.functional_count)?;
        out.write_cn("WAFER_ID", &self.wafer_id)?;
        out.write_cn("FABWF_ID", &self.fab_wafer_id)?;
        out.write_cn("FRAME_ID", &self.frame_id)?;
        out.write_cn("MASK_ID", &self.mask_id)?;
        out.write_cn("USR_DESC", &self.user_description)?;
        out.write_cn("EXC_DESC", &self.exec_description)
    }

    fn encoded_size(&self) -> usize {
        Self::FIXED_SIZE
            + cn_size(&self.wafer_id)
            + cn_size(&self.fab_wafer_id)
            + cn_size(&self.frame_id)
            + cn_size(&self.mask_id)
            + cn_size(&self.user_description)
            + cn_size(&self.exec_description)
    }
}

impl fmt::Display for WaferResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WRR Record:")?;
        writeln!(f, "  HEAD_NUM: {}", self.head_number)?;
        writeln!(f, "  SITE_GRP: {}", self.site_group)?;
        writeln!(f, "  FINISH_T: {}", self.finish_time)?;
        writeln!(f, "  PART_CNT: {}", self.part_count)?;
        writeln!(f, "  RTST_CNT: {}", self.retest_count)?;
        writeln!(f, "  ABRT_CNT: {}", self.abort_count)?;
        writeln!(f, "  GOOD_CNT: {}", self.good_count)?;
        writeln!(f, "  FUNC_CNT: {}", self.functional_count)?;
        writeln!(f, "  WAFER_ID: \"{}\"", self.wafer_id)?;
        writeln!(f, "  FABWF_ID: \"{}\"", self.fab_wafer_id)?;
        writeln!(f, "  FRAME_ID: \"{}\"", self.frame_id)?;
        writeln!(f, "  MASK_ID: \"{}\"", self.mask_id)?;
        writeln!(f, "  USR_DESC: \"{}\"", self.user_description)?;
        writeln!(f, "  EXC_DESC: \"{}\"", self.exec_description)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use crate::cursor::ByteCursor;
    use crate::error::Result;
    use crate::record::{StdfRecord, WaferInformation, WaferResults};

    #[test]
    fn decode_wafer_information() -> Result<()> {
        #[rustfmt::skip]
        let input = vec![
            0x01,                   // HEAD_NUM
            0xFF,                   // SITE_GRP
            0x10, 0x00, 0x00, 0x00, // START_T
            0x03, b'W', b'0', b'1', // WAFER_ID
        ];

        let mut cursor = ByteCursor::new(Cursor::new(input))?;
        let wir = WaferInformation::decode(&mut cursor)?;

        assert_eq!(
            wir,
            WaferInformation {
                head_number: 1,
                site_group: 255,
                start_time: 16,
                wafer_id: "W01".into(),
            }
        );
        assert_eq!(wir.encoded_size(), 10);
        assert!(cursor.is_eof());

        Ok(())
    }

    #[test]
    fn decode_wafer_results() -> Result<()> {
        #[rustfmt::skip]
        let input = vec![
            0x01, 0x00,
            0x01, 0x00, 0x00, 0x00, // FINISH_T
            0x0A, 0x00, 0x00, 0x00, // PART_CNT
            0x01, 0x00, 0x00, 0x00, // RTST_CNT
            0x00, 0x00, 0x00, 0x00, // ABRT_CNT
            0x09, 0x00, 0x00, 0x00, // GOOD_CNT
            0x0A, 0x00, 0x00, 0x00, // FUNC_CNT
            0x02, b'W', b'1',       // WAFER_ID
            0x00, 0x00, 0x00, 0x00, // FABWF_ID, FRAME_ID, MASK_ID, USR_DESC
            0x01, b'x',             // EXC_DESC
        ];
        let payload_len = input.len();

        let mut cursor = ByteCursor::new(Cursor::new(input))?;
        let wrr = WaferResults::decode(&mut cursor)?;

        assert_eq!(
            wrr,
            WaferResults {
                head_number: 1,
                finish_time: 1,
                part_count: 10,
                retest_count: 1,
                good_count: 9,
                functional_count: 10,
                wafer_id: "W1".into(),
                exec_description: "x".into(),
                ..Default::default()
            }
        );
        assert_eq!(wrr.encoded_size(), payload_len);
        assert_eq!(wrr.to_string().lines().count(), 15);

        Ok(())
    }
}
