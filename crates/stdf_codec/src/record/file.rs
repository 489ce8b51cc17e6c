//! File level records: FAR and MIR.

use std::fmt;
use std::io::{Read, Seek, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{cn_size, RecordKind, StdfRecord};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::write::FieldWriter;

/// File Attribute Record (FAR)
///
/// Always the first record of a file. Its fixed two byte payload is what byte order detection
/// relies on.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileAttribute {
    /// CPU type that wrote this file (`CPU_TYP`)
    pub cpu_type: u8,
    /// STDF version number (`STDF_VER`)
    pub stdf_version: u8,
}

impl StdfRecord for FileAttribute {
    const KIND: RecordKind = RecordKind::FileAttribute;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(FileAttribute {
            cpu_type: cursor.read_u1()?,
            stdf_version: cursor.read_u1()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u1(self.cpu_type)?;
        out.write_u1(self.stdf_version)
    }

    fn encoded_size(&self) -> usize {
        2
    }
}

impl fmt::Display for FileAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FAR Record:")?;
        writeln!(f, "  CPU_TYP: {}", self.cpu_type)?;
        writeln!(f, "  STDF_VER: {}", self.stdf_version)
    }
}

/// Master Information Record (MIR)
///
/// Global information about the lot being tested: eight fixed fields followed by thirty strings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MasterInformation {
    /// Date and time of job setup (`SETUP_T`)
    pub setup_time: u32,
    /// Date and time first part tested (`START_T`)
    pub start_time: u32,
    /// Tester station number (`STAT_NUM`)
    pub station_number: u8,
    /// Test mode code (`MODE_COD`)
    pub mode_code: char,
    /// Lot retest code (`RTST_COD`)
    pub retest_code: char,
    /// Data protection code (`PROT_COD`)
    pub protection_code: char,
    /// Burn-in time in minutes (`BURN_TIM`)
    pub burn_in_time: u16,
    /// Command mode code (`CMOD_COD`)
    pub command_mode_code: char,
    /// Lot ID (`LOT_ID`)
    pub lot_id: String,
    /// Part type (`PART_TYP`)
    pub part_type: String,
    /// Name of node that generated data (`NODE_NAM`)
    pub node_name: String,
    /// Tester type (`TSTR_TYP`)
    pub tester_type: String,
    /// Job name (`JOB_NAM`)
    pub job_name: String,
    /// Job revision number (`JOB_REV`)
    pub job_revision: String,
    /// Sublot ID (`SBLOT_ID`)
    pub sublot_id: String,
    /// Operator name or ID (`OPER_NAM`)
    pub operator_name: String,
    /// Tester executive software type (`EXEC_TYP`)
    pub exec_type: String,
    /// Tester executive software version (`EXEC_VER`)
    pub exec_version: String,
    /// Test phase or step code (`TEST_COD`)
    pub test_code: String,
    /// Test temperature (`TST_TEMP`)
    pub test_temperature: String,
    /// Generic user text (`USER_TXT`)
    pub user_text: String,
    /// Name of auxiliary data file (`AUX_FILE`)
    pub aux_file: String,
    /// Package type (`PKG_TYP`)
    pub package_type: String,
    /// Product family ID (`FAMLY_ID`)
    pub family_id: String,
    /// Date code (`DATE_COD`)
    pub date_code: String,
    /// Test facility ID (`FACIL_ID`)
    pub facility_id: String,
    /// Test floor ID (`FLOOR_ID`)
    pub floor_id: String,
    /// Fabrication process ID (`PROC_ID`)
    pub process_id: String,
    /// Operation frequency or step (`OPER_FRQ`)
    pub operation_frequency: String,
    /// Test specification name (`SPEC_NAM`)
    pub spec_name: String,
    /// Test specification version (`SPEC_VER`)
    pub spec_version: String,
    /// Test flow ID (`FLOW_ID`)
    pub flow_id: String,
    /// Test setup ID (`SETUP_ID`)
    pub setup_id: String,
    /// Device design revision (`DSGN_REV`)
    pub design_revision: String,
    /// Engineering lot ID (`ENG_ID`)
    pub engineering_id: String,
    /// ROM code ID (`ROM_COD`)
    pub rom_code: String,
    /// Tester serial number (`SERL_NUM`)
    pub serial_number: String,
    /// Supervisor name or ID (`SUPR_NAM`)
    pub supervisor_name: String,
}

impl MasterInformation {
    const FIXED_SIZE: usize = 4 + 4 + 1 + 1 + 1 + 1 + 2 + 1;

    /// The thirty string fields in wire order, with their STDF names
    fn strings(&self) -> [(&'static str, &str); 30] {
        [
            ("LOT_ID", self.lot_id.as_str()),
            ("PART_TYP", self.part_type.as_str()),
            ("NODE_NAM", self.node_name.as_str()),
            ("TSTR_TYP", self.tester_type.as_str()),
            ("JOB_NAM", self.job_name.as_str()),
            ("JOB_REV", self.job_revision.as_str()),
            ("SBLOT_ID", self.sublot_id.as_str()),
            ("OPER_NAM", self.operator_name.as_str()),
            ("EXEC_TYP", self.exec_type.as_str()),
            ("EXEC_VER", self.exec_version.as_str()),
            ("TEST_COD", self.test_code.as_str()),
            ("TST_TEMP", self.test_temperature.as_str()),
            ("USER_TXT", self.user_text.as_str()),
            ("AUX_FILE", self.aux_file.as_str()),
            ("PKG_TYP", self.package_type.as_str()),
            ("FAMLY_ID", self.family_id.as_str()),
            ("DATE_COD", self.date_code.as_str()),
            ("FACIL_ID", self.facility_id.as_str()),
            ("FLOOR_ID", self.floor_id.as_str()),
            ("PROC_ID", self.process_id.as_str()),
            ("OPER_FRQ", self.operation_frequency.as_str()),
            ("SPEC_NAM", self.spec_name.as_str()),
            ("SPEC_VER", self.spec_version.as_str()),
            ("FLOW_ID", self.flow_id.as_str()),
            ("SETUP_ID", self.setup_id.as_str()),
            ("DSGN_REV", self.design_revision.as_str()),
            ("ENG_ID", self.engineering_id.as_str()),
            ("ROM_COD", self.rom_code.as_str()),
            ("SERL_NUM", self.serial_number.as_str()),
            ("SUPR_NAM", self.supervisor_name.as_str()),
        ]
    }
}

impl StdfRecord for MasterInformation {
    const KIND: RecordKind = RecordKind::MasterInformation;

    fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(MasterInformation {
            setup_time: cursor.read_u4()?,
            start_time: cursor.read_u4()?,
            station_number: cursor.read_u1()?,
            mode_code: cursor.read_c1()?,
            retest_code: cursor.read_c1()?,
            protection_code: cursor.read_c1()?,
            burn_in_time: cursor.read_u2()?,
            command_mode_code: cursor.read_c1()?,
            lot_id: cursor.read_cn()?,
            part_type: cursor.read_cn()?,
            node_name: cursor.read_cn()?,
            tester_type: cursor.read_cn()?,
            job_name: cursor.read_cn()?,
            job_revision: cursor.read_cn()?,
            sublot_id: cursor.read_cn()?,
            operator_name: cursor.read_cn()?,
            exec_type: cursor.read_cn()?,
            exec_version: cursor.read_cn()?,
            test_code: cursor.read_cn()?,
            test_temperature: cursor.read_cn()?,
            user_text: cursor.read_cn()?,
            aux_file: cursor.read_cn()?,
            package_type: cursor.read_cn()?,
            family_id: cursor.read_cn()?,
            date_code: cursor.read_cn()?,
            facility_id: cursor.read_cn()?,
            floor_id: cursor.read_cn()?,
            process_id: cursor.read_cn()?,
            operation_frequency: cursor.read_cn()?,
            spec_name: cursor.read_cn()?,
            spec_version: cursor.read_cn()?,
            flow_id: cursor.read_cn()?,
            setup_id: cursor.read_cn()?,
            design_revision: cursor.read_cn()?,
            engineering_id: cursor.read_cn()?,
            rom_code: cursor.read_cn()?,
            serial_number: cursor.read_cn()?,
            supervisor_name: cursor.read_cn()?,
        })
    }

    fn encode<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.write_u4(self.setup_time)?;
        out.write_u4(self.start_time)?;
        out.write_u1(self.station_number)?;
        out.write_c1("MODE_COD", self.mode_code)?;
        out.write_c1("RTST_COD", self.retest_code)?;
        out.write_c1("PROT_COD", self.protection_code)?;
        out.write_u2(self.burn_in_time)?;
        out.write_c1("CMOD_COD", self.command_mode_code)?;
        for (name, value) in self.strings() {
            out.write_cn(name, value)?;
        }
        Ok(())
    }

    fn encoded_size(&self) -> usize {
        Self::FIXED_SIZE
            + self
                .strings()
                .iter()
                .map(|(_, value)| cn_size(value))
                .sum::<usize>()
    }
}

impl fmt::Display for MasterInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MIR Record:")?;
        writeln!(f, "  SETUP_T: {}", self.setup_time)?;
        writeln!(f, "  START_T: {}", self.start_time)?;
        writeln!(f, "  STAT_NUM: {}", self.station_number)?;
        writeln!(f, "  MODE_COD: '{}'", self.mode_code)?;
        writeln!(f, "  RTST_COD: '{}'", self.retest_code)?;
        writeln!(f, "  PROT_COD: '{}'", self.protection_code)?;
        writeln!(f, "  BURN_TIM: {}", self.burn_in_time)?;
        writeln!(f, "  CMOD_COD: '{}'", self.command_mode_code)?;
        for (name, value) in self.strings() {
            writeln!(f, "  {name}: \"{value}\"")?;
        }
        Ok(())
    }
}
