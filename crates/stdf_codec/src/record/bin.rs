//! Bin summary records: HBR and SBR.
//!
//! Both share one layout and differ only in the header type pair.

use std::fmt;
use std::io::{Read, Seek, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{cn_size, RecordKind, StdfRecord};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::write::FieldWriter;

const FIXED_SIZE: usize = 1 + 1 + 2 + 4 + 1;

/// Hardware Bin Record (HBR)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HardwareBin {
    /// Test head number (`HEAD_NUM`)
    pub head_number: u8,
    /// Test site number (`SITE_NUM`)
    pub site_number: u8,
    /// Hardware bin number (`HBIN_NUM`)
    pub number: u16,
    /// Number of parts in bin (`HBIN_CNT`)
    pub count: u32,
    /// Pass/fail indication, `P` or `F` (`HBIN_PF`)
    pub pass_fail: char,
    /// Name of hardware bin (`HBIN_NAM`)
    pub name: String,
}

impl StdfRecord for HardwareBin {
    const KIND: RecordKind = RecordKind::HardwareBin;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(HardwareBin {
            head_number: cursor.read_u1()?,
            site_number: cursor.read_u1()?,
            number: cursor.read_u2()?,
            count: cursor.read_u4()?,
            pass_fail: cursor.read_c1()?,
            name: cursor.read_cn()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u1(self.head_number)?;
        out.write_u1(self.site_number)?;
        out.write_u2(self.number)?;
        out.write_u4(self.count)?;
        out.write_c1("HBIN_PF", self.pass_fail)?;
        out.write_cn("HBIN_NAM", &self.name)
    }

    fn encoded_size(&self) -> usize {
        FIXED_SIZE + cn_size(&self.name)
    }
}

impl fmt::Display for HardwareBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HBR Record:")?;
        writeln!(f, "  HEAD_NUM: {}", self.head_number)?;
        writeln!(f, "  SITE_NUM: {}", self.site_number)?;
        writeln!(f, "  HBIN_NUM: {}", self.number)?;
        writeln!(f, "  HBIN_CNT: {}", self.count)?;
        writeln!(f, "  HBIN_PF: '{}'", self.pass_fail)?;
        writeln!(f, "  HBIN_NAM: \"{}\"", self.name)
    }
}

/// Software Bin Record (SBR)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftwareBin {
    /// Test head number (`HEAD_NUM`)
    pub head_number: u8,
    /// Test site number (`SITE_NUM`)
    pub site_number: u8,
    /// Software bin number (`SBIN_NUM`)
    pub number: u16,
    /// Number of parts in bin (`SBIN_CNT`)
    pub count: u32,
    /// Pass/fail indication, `P` or `F` (`SBIN_PF`)
    pub pass_fail: char,
    /// Name of software bin (`SBIN_NAM`)
    pub name: String,
}

impl StdfRecord for SoftwareBin {
    const KIND: RecordKind = RecordKind::SoftwareBin;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(SoftwareBin {
            head_number: cursor.read_u1()?,
            site_number: cursor.read_u1()?,
            number: cursor.read_u2()?,
            count: cursor.read_u4()?,
            pass_fail: cursor.read_c1()?,
            name: cursor.read_cn()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u1(self.head_number)?;
        out.write_u1(self.site_number)?;
        out.write_u2(self.number)?;
        out.write_u4(self.count)?;
        out.write_c1("SBIN_PF", self.pass_fail)?;
        out.write_cn("SBIN_NAM", &self.name)
    }

    fn encoded_size(&self) -> usize {
        FIXED_SIZE + cn_size(&self.name)
    }
}

impl fmt::Display for SoftwareBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SBR Record:")?;
        writeln!(f, "  HEAD_NUM: {}", self.head_number)?;
        writeln!(f, "  SITE_NUM: {}", self.site_number)?;
        writeln!(f, "  SBIN_NUM: {}", self.number)?;
        writeln!(f, "  SBIN_CNT: {}", self.count)?;
        writeln!(f, "  SBIN_PF: '{}'", self.pass_fail)?;
        writeln!(f, "  SBIN_NAM: \"{}\"", self.name)
    }
}
