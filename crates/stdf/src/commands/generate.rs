use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use stdf_codec::record::{
    FileAttribute, HardwareBin, MasterInformation, ParametricTest, PartInformation, PartResults,
    SoftwareBin, WaferInformation, WaferResults,
};
use stdf_codec::{
    compression::StdfBlockWriter, CompressionMethod, Endian, StdfWriter, StdfWriterOptions,
};
use tracing::info;

#[derive(Args)]
pub struct GenerateArgs {
    /// A target STDF file, gzipped when it ends in `.gz`
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Number of files to write. Names are numbered when more than one
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Parts tested per file
    #[arg(long, default_value_t = 100)]
    parts: u32,

    /// Parametric tests per part
    #[arg(long, default_value_t = 10)]
    tests: u32,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Write big-endian files
    #[arg(long, default_value_t = false)]
    big_endian: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// Shape of one synthetic wafer
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub parts: u32,
    pub tests: u32,
    pub endian: Endian,
}

fn numbered(path: &Path, index: usize) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let numbered = match name.split_once('.') {
        Some((stem, ext)) => format!("{stem}_{index:03}.{ext}"),
        None => format!("{name}_{index:03}"),
    };
    path.with_file_name(numbered)
}

/// Write one wafer's worth of records: FAR, MIR, WIR, the parts, WRR and the bin summaries.
pub fn write_wafer<W: Write>(
    out: W,
    rng: &mut impl Rng,
    wafer: usize,
    layout: Layout,
) -> stdf_codec::error::Result<W> {
    let mut stdf = StdfWriter::new(
        out,
        StdfWriterOptions::builder().endian(layout.endian).build(),
    );
    let start_time: u32 = rng.gen_range(1_600_000_000..1_800_000_000);
    let wafer_id = format!("W{wafer:02}");

    stdf.write_record(
        &FileAttribute {
            cpu_type: 2,
            stdf_version: 4,
        }
        .into(),
    )?;
    stdf.write_record(
        &MasterInformation {
            setup_time: start_time - 60,
            start_time,
            station_number: 1,
            mode_code: 'P',
            retest_code: 'N',
            protection_code: ' ',
            command_mode_code: ' ',
            lot_id: format!("LOT{:05}", rng.gen_range(0..100_000)),
            part_type: "SYNTH-1".into(),
            node_name: "tester01".into(),
            tester_type: "SYNTH".into(),
            job_name: "synthetic".into(),
            ..Default::default()
        }
        .into(),
    )?;
    stdf.write_record(
        &WaferInformation {
            head_number: 1,
            site_group: 255,
            start_time,
            wafer_id: wafer_id.clone(),
        }
        .into(),
    )?;

    let side = (f64::from(layout.parts).sqrt().ceil() as u32).max(1);
    let mut bins: BTreeMap<u16, u32> = BTreeMap::new();
    let mut good = 0;

    for part in 0..layout.parts {
        let site_number = (part % 4) as u8 + 1;
        stdf.write_record(
            &PartInformation {
                head_number: 1,
                site_number,
            }
            .into(),
        )?;

        let mut first_fail = None;
        for test in 0..layout.tests {
            let result: f32 = rng.gen_range(0.0..1.2);
            let passed = result <= 1.0;
            if !passed && first_fail.is_none() {
                first_fail = Some(test);
            }

            stdf.write_record(
                &ParametricTest {
                    test_number: 1000 + test,
                    head_number: 1,
                    site_number,
                    test_flags: if passed { 0x00 } else { 0x80 },
                    result,
                    test_text: format!("T{test}"),
                    optional_flags: ParametricTest::LOW_LIMIT
                        | ParametricTest::HIGH_LIMIT
                        | ParametricTest::UNITS,
                    low_limit: 0.0,
                    high_limit: 1.0,
                    units: "V".into(),
                    ..Default::default()
                }
                .into(),
            )?;
        }

        let hard_bin = match first_fail {
            None => 1,
            Some(test) => 2 + (test % 4) as u16,
        };
        if hard_bin == 1 {
            good += 1;
        }
        *bins.entry(hard_bin).or_default() += 1;

        stdf.write_record(
            &PartResults {
                head_number: 1,
                site_number,
                part_flag: if hard_bin == 1 { 0x00 } else { PartResults::FLAG_FAILED },
                test_count: layout.tests.min(u32::from(u16::MAX)) as u16,
                hard_bin,
                soft_bin: hard_bin,
                x_coordinate: (part % side) as i16,
                y_coordinate: (part / side) as i16,
                test_time: rng.gen_range(100..2_000),
                part_id: (part + 1).to_string(),
                ..Default::default()
            }
            .into(),
        )?;
    }

    stdf.write_record(
        &WaferResults {
            head_number: 1,
            site_group: 255,
            finish_time: start_time.saturating_add(layout.parts),
            part_count: layout.parts,
            good_count: good,
            functional_count: layout.parts,
            wafer_id,
            ..Default::default()
        }
        .into(),
    )?;

    for (&number, &count) in &bins {
        let pass_fail = if number == 1 { 'P' } else { 'F' };
        let name = if number == 1 {
            "PASS".to_string()
        } else {
            format!("FAIL{number}")
        };

        stdf.write_record(
            &HardwareBin {
                head_number: 255,
                number,
                count,
                pass_fail,
                name: name.clone(),
                ..Default::default()
            }
            .into(),
        )?;
        stdf.write_record(
            &SoftwareBin {
                head_number: 255,
                number,
                count,
                pass_fail,
                name,
                ..Default::default()
            }
            .into(),
        )?;
    }

    stdf.finish()
}

impl GenerateArgs {
    pub fn handle(&self) -> Result<()> {
        if self.count == 0 {
            return Err(miette!("count must be at least 1"));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let layout = Layout {
            parts: self.parts,
            tests: self.tests,
            endian: if self.big_endian {
                Endian::Big
            } else {
                Endian::Little
            },
        };

        for index in 0..self.count {
            let path = if self.count == 1 {
                self.file.clone()
            } else {
                numbered(&self.file, index + 1)
            };
            info!("creating {}", path.display());

            let out = if !self.overwrite {
                File::create_new(&path)
                    .into_diagnostic()
                    .context(format!("creating {}", &path.display()))?
            } else {
                File::create(&path)
                    .into_diagnostic()
                    .context(format!("creating {}", &path.display()))?
            };

            let out = StdfBlockWriter::new(
                BufWriter::new(out),
                CompressionMethod::from_extension(&path),
            );
            let out = write_wafer(out, &mut rng, index + 1, layout)
                .context(format!("writing {}", path.display()))?;
            out.finalize()
                .and_then(|mut w| w.flush())
                .into_diagnostic()
                .context(format!("finalizing {}", path.display()))?;
        }

        Ok(())
    }
}
