//! Functional Test Record (FTR) with its count-sized index and state arrays.

use std::fmt;
use std::io::{Read, Seek, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{bn_size, cn_size, hex, RecordKind, StdfRecord};
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::write::FieldWriter;

/// Functional Test Record (FTR)
///
/// `RTN_ICNT` and `PGM_ICNT` are not stored: they are the lengths of the
/// return and program arrays. On the wire every index array comes before its
/// state array.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionalTest {
    /// Test number (`TEST_NUM`)
    pub test_number: u32,
    /// Test head number (`HEAD_NUM`)
    pub head_number: u8,
    /// Test site number (`SITE_NUM`)
    pub site_number: u8,
    /// Test flags (`TEST_FLG`)
    pub test_flags: u8,
    /// Optional data flags (`OPT_FLAG`)
    pub optional_flags: u8,
    /// Cycle count of vector (`CYCL_CNT`)
    pub cycle_count: u32,
    /// Relative vector address (`REL_VADR`)
    pub relative_address: u32,
    /// Repeat count of vector (`REPT_CNT`)
    pub repeat_count: u32,
    /// Number of pins with one or more failures (`NUM_FAIL`)
    pub failing_pins: u32,
    /// X logical device failure address (`XFAIL_AD`)
    pub x_fail_address: i32,
    /// Y logical device failure address (`YFAIL_AD`)
    pub y_fail_address: i32,
    /// Offset from vector of interest (`VECT_OFF`)
    pub vector_offset: i16,
    /// Return data pin indexes (`RTN_INDX`)
    pub return_indexes: Vec<u16>,
    /// Return data states (`RTN_STAT`)
    pub return_states: Vec<u16>,
    /// Programmed state indexes (`PGM_INDX`)
    pub program_indexes: Vec<u16>,
    /// Programmed states (`PGM_STAT`)
    pub program_states: Vec<u16>,
    /// Failing pin bitfield (`FAIL_PIN`)
    pub fail_pin: Vec<u8>,
    /// Vector module pattern name (`VECT_NAM`)
    pub vector_name: String,
    /// Time set name (`TIME_SET`)
    pub time_set: String,
    /// Vector op code (`OP_CODE`)
    pub op_code: String,
    /// Descriptive text or label (`TEST_TXT`)
    pub test_text: String,
    /// Name of alarm (`ALARM_ID`)
    pub alarm_id: String,
    /// Additional programmed information (`PROG_TXT`)
    pub program_text: String,
    /// Additional result information (`RSLT_TXT`)
    pub result_text: String,
    /// Pattern generator number (`PATG_NUM`)
    pub pattern_generator: u8,
    /// Bit map of enabled comparators (`SPIN_MAP`)
    pub spin_map: Vec<u8>,
}

impl FunctionalTest {
    const FIXED_SIZE: usize = 4 + 1 + 1 + 1 + 1 + 4 * 4 + 4 + 4 + 2 + 2 + 2 + 1;

    /// `RTN_ICNT`
    pub fn return_count(&self) -> usize {
        self.return_indexes.len()
    }

    /// `PGM_ICNT`
    pub fn program_count(&self) -> usize {
        self.program_indexes.len()
    }

    fn pair_count(field: &'static str, indexes: &[u16], states: &[u16]) -> Result<u16> {
        if indexes.len() != states.len() {
            return Err(Error::InvalidField {
                field,
                reason: format!(
                    "{} indexes but {} states",
                    indexes.len(),
                    states.len()
                ),
            });
        }

        u16::try_from(indexes.len()).map_err(|_| Error::InvalidField {
            field,
            reason: format!("{} entries do not fit a two byte count", indexes.len()),
        })
    }
}

impl StdfRecord for FunctionalTest {
    const KIND: RecordKind = RecordKind::FunctionalTest;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let test_number = cursor.read_u4()?;
        let head_number = cursor.read_u1()?;
        let site_number = cursor.read_u1()?;
        let test_flags = cursor.read_u1()?;
        let optional_flags = cursor.read_u1()?;
        let cycle_count = cursor.read_u4()?;
        let relative_address = cursor.read_u4()?;
        let repeat_count = cursor.read_u4()?;
        let failing_pins = cursor.read_u4()?;
        let x_fail_address = cursor.read_i4()?;
        let y_fail_address = cursor.read_i4()?;
        let vector_offset = cursor.read_i2()?;
        let return_count = cursor.read_u2()?;
        let program_count = cursor.read_u2()?;

        Ok(FunctionalTest {
            test_number,
            head_number,
            site_number,
            test_flags,
            optional_flags,
            cycle_count,
            relative_address,
            repeat_count,
            failing_pins,
            x_fail_address,
            y_fail_address,
            vector_offset,
            return_indexes: cursor.read_u2_array(return_count)?,
            return_states: cursor.read_u2_array(return_count)?,
            program_indexes: cursor.read_u2_array(program_count)?,
            program_states: cursor.read_u2_array(program_count)?,
            fail_pin: cursor.read_bn()?,
            vector_name: cursor.read_cn()?,
            time_set: cursor.read_cn()?,
            op_code: cursor.read_cn()?,
            test_text: cursor.read_cn()?,
            alarm_id: cursor.read_cn()?,
            program_text: cursor.read_cn()?,
            result_text: cursor.read_cn()?,
            pattern_generator: cursor.read_u1()?,
            spin_map: cursor.read_bn()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        let return_count = Self::pair_count("RTN_ICNT", &self.return_indexes, &self.return_states)?;
        let program_count =
            Self::pair_count("PGM_ICNT", &self.program_indexes, &self.program_states)?;

        out.write_u4(self.test_number)?;
        out.write_u1(self.head_number)?;
        out.write_u1(self.site_number)?;
        out.write_u1(self.test_flags)?;
        out.write_u1(self.optional_flags)?;
        out.write_u4(self.cycle_count)?;
        out.write_u4(self.relative_address)?;
        out.write_u4(self.repeat_count)?;
        out.write_u4(self.failing_pins)?;
        out.write_i4(self.x_fail_address)?;
        out.write_i4(self.y_fail_address)?;
        out.write_i2(self.vector_offset)?;
        out.write_u2(return_count)?;
        out.write_u2(program_count)?;
        out.write_u2_array(&self.return_indexes)?;
        out.write_u2_array(&self.return_states)?;
        out.write_u2_array(&self.program_indexes)?;
        out.write_u2_array(&self.program_states)?;
        out.write_bn("FAIL_PIN", &self.fail_pin)?;
        out.write_cn("VECT_NAM", &self.vector_name)?;
        out.write_cn("TIME_SET", &self.time_set)?;
        out.write_cn("OP_CODE", &self.op_code)?;
        out.write_cn("TEST_TXT", &self.test_text)?;
        out.write_cn("ALARM_ID", &self.alarm_id)?;
        out.write_cn("PROG_TXT", &self.program_text)?;
        out.write_cn("RSLT_TXT", &self.result_text)?;
        out.write_u1(self.pattern_generator)?;
        out.write_bn("SPIN_MAP", &self.spin_map)
    }

    fn encoded_size(&self) -> usize {
        let arrays = self.return_indexes.len()
            + self.return_states.len()
            + self.program_indexes.len()
            + self.program_states.len();

        Self::FIXED_SIZE
            + 2 * arrays
            + bn_size(&self.fail_pin)
            + cn_size(&self.vector_name)
            + cn_size(&self.time_set)
            + cn_size(&self.op_code)
            + cn_size(&self.test_text)
            + cn_size(&self.alarm_id)
            + cn_size(&self.program_text)
            + cn_size(&self.result_text)
            + bn_size(&self.spin_map)
    }
}

impl fmt::Display for FunctionalTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FTR Record:")?;
        writeln!(f, "  TEST_NUM: {}", self.test_number)?;
        writeln!(f, "  HEAD_NUM: {}", self.head_number)?;
        writeln!(f, "  SITE_NUM: {}", self.site_number)?;
        writeln!(f, "  TEST_FLG: 0x{:x}", self.test_flags)?;
        writeln!(f, "  OPT_FLAG: 0x{:x}", self.optional_flags)?;
        writeln!(f, "  CYCL_CNT: {}", self.cycle_count)?;
        writeln!(f, "  REL_VADR: {}", self.relative_address)?;
        writeln!(f, "  REPT_CNT: {}", self.repeat_count)?;
        writeln!(f, "  NUM_FAIL: {}", self.failing_pins)?;
        writeln!(f, "  XFAIL_AD: {}", self.x_fail_address)?;
        writeln!(f, "  YFAIL_AD: {}", self.y_fail_address)?;
        writeln!(f, "  VECT_OFF: {}", self.vector_offset)?;
        writeln!(f, "  RTN_ICNT: {}", self.return_count())?;
        writeln!(f, "  PGM_ICNT: {}", self.program_count())?;
        writeln!(f, "  RTN_INDX: {:?}", self.return_indexes)?;
        writeln!(f, "  RTN_STAT: {:?}", self.return_states)?;
        writeln!(f, "  PGM_INDX: {:?}", self.program_indexes)?;
        writeln!(f, "  PGM_STAT: {:?}", self.program_states)?;
        writeln!(f, "  FAIL_PIN: {}", hex(&self.fail_pin))?;
        writeln!(f, "  VECT_NAM: \"{}\"", self.vector_name)?;
        writeln!(f, "  TIME_SET: \"{}\"", self.time_set)?;
        writeln!(f, "  OP_CODE: \"{}\"", self.op_code)?;
        writeln!(f, "  TEST_TXT: \"{}\"", self.test_text)?;
        writeln!(f, "  ALARM_ID: \"{}\"", self.alarm_id)?;
        writeln!(f, "  PROG_TXT: \"{}\"", self.program_text)?;
        writeln!(f, "  RSLT_TXT: \"{}\"", self.result_text)?;
        writeln!(f, "  PATG_NUM: {}", self.pattern_generator)?;
        writeln!(f, "  SPIN_MAP: {}", hex(&self.spin_map))
    }
}
