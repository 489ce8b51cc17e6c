use std::io::{Cursor, Write};
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use stdf_codec::compression::{CompressionMethod, StdfBlockWriter};
use stdf_codec::error::{Error, Result};
use stdf_codec::record::{
    FileAttribute, FunctionalTest, HardwareBin, MasterInformation, ParametricTest,
    PartInformation, PartResults, Record, RecordKind, SoftwareBin, WaferInformation, WaferResults,
};
use stdf_codec::{Endian, StdfReader, StdfWriter, StdfWriterOptions, Summary};
use tracing::info;
use tracing_test::traced_test;

fn sample_records() -> Vec<Record> {
    vec![
        FileAttribute {
            cpu_type: 2,
            stdf_version: 4,
        }
        .into(),
        MasterInformation {
            setup_time: 1_700_000_000,
            start_time: 1_700_000_100,
            station_number: 3,
            mode_code: 'P',
            retest_code: ' ',
            burn_in_time: 65535,
            lot_id: "LOT42".into(),
            part_type: "ADC12".into(),
            tester_type: "T2000".into(),
            test_temperature: "25\u{b0}C".into(),
            ..Default::default()
        }
        .into(),
        WaferInformation {
            head_number: 1,
            site_group: 255,
            start_time: 1_700_000_200,
            wafer_id: "W07".into(),
        }
        .into(),
        PartInformation {
            head_number: 1,
            site_number: 2,
        }
        .into(),
        ParametricTest {
            test_number: 1001,
            head_number: 1,
            site_number: 2,
            result: 1.25,
            test_text: "VOUT".into(),
            optional_flags: ParametricTest::RESULT_SCALE
                | ParametricTest::LOW_LIMIT
                | ParametricTest::UNITS,
            result_scale: -3,
            low_limit_scale: -3,
            low_limit: 1.0,
            units: "V".into(),
            ..Default::default()
        }
        .into(),
        FunctionalTest {
            test_number: 2001,
            head_number: 1,
            site_number: 2,
            cycle_count: 4096,
            x_fail_address: -1,
            return_indexes: vec![3, 4, 5],
            return_states: vec![1, 0, 1],
            program_indexes: vec![9],
            program_states: vec![2],
            fail_pin: vec![0b1010],
            vector_name: "scan_chain".into(),
            spin_map: vec![0xFF, 0x01],
            ..Default::default()
        }
        .into(),
        PartResults {
            head_number: 1,
            site_number: 2,
            test_count: 2,
            hard_bin: 1,
            soft_bin: 1,
            x_coordinate: -4,
            y_coordinate: 12,
            test_time: 850,
            part_id: "1".into(),
            part_fix: vec![0xCA, 0xFE],
            ..Default::default()
        }
        .into(),
        WaferResults {
            head_number: 1,
            site_group: 255,
            finish_time: 1_700_000_900,
            part_count: 1,
            good_count: 1,
            functional_count: 1,
            wafer_id: "W07".into(),
            ..Default::default()
        }
        .into(),
        HardwareBin {
            head_number: 255,
            number: 1,
            count: 1,
            pass_fail: 'P',
            name: "PASS".into(),
            ..Default::default()
        }
        .into(),
        SoftwareBin {
            head_number: 255,
            number: 1,
            count: 1,
            pass_fail: 'P',
            name: "GOOD".into(),
            ..Default::default()
        }
        .into(),
    ]
}

fn write_file(records: &[Record], endian: Endian) -> Result<Vec<u8>> {
    let mut stdf = StdfWriter::new(
        Vec::new(),
        StdfWriterOptions::builder().endian(endian).build(),
    );
    for (i, record) in records.iter().enumerate() {
        stdf.write_record(record)?;
        if i == 3 {
            stdf.write_raw(50, 10, b"\x01\x00\x00\x00")?;
        }
    }
    stdf.finish()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("stdf_codec_{}_{name}", std::process::id()))
}

#[traced_test]
#[test]
fn decode_every_kind_in_both_byte_orders() -> Result<()> {
    let expected = sample_records();

    for endian in [Endian::Little, Endian::Big] {
        info!("reading {endian:?} file");
        let bytes = write_file(&expected, endian)?;

        let mut stdf = StdfReader::new(Cursor::new(bytes))?;
        assert_eq!(stdf.detected_endian(), Some(endian));

        let records = stdf.read_all().into_result()?;
        assert_eq!(records, expected);
        assert!(stdf.is_eof());

        let kinds: Vec<RecordKind> = records.iter().map(Record::kind).collect();
        assert_eq!(kinds.len(), RecordKind::ALL.len());
        assert!(RecordKind::ALL.iter().all(|kind| kinds.contains(kind)));
    }

    Ok(())
}

#[test]
fn first_record_is_file_attribute() -> Result<()> {
    let bytes = write_file(&sample_records(), Endian::Big)?;
    let mut stdf = StdfReader::new(Cursor::new(bytes))?;

    let first = stdf.next_entry()?.expect("first entry");
    assert_eq!(first.header.length, 2);
    assert_eq!(first.record.map(|r| r.kind()), Some(RecordKind::FileAttribute));

    Ok(())
}

#[test]
fn computed_size_matches_consumption() -> Result<()> {
    let bytes = write_file(&sample_records(), Endian::Little)?;
    let mut stdf = StdfReader::new(Cursor::new(bytes))?;

    let mut skipped = 0;
    while let Some(entry) = stdf.next_entry()? {
        assert!(entry.is_consistent(), "entry at {}", entry.offset);
        match &entry.record {
            Some(record) => assert_eq!(record.encoded_size() as u64, entry.consumed),
            None => {
                assert_eq!((entry.header.major, entry.header.minor), (50, 10));
                skipped += 1;
            }
        }
    }
    assert_eq!(skipped, 1);

    Ok(())
}

#[test]
fn truncated_file_returns_prefix_and_error() -> Result<()> {
    let mut bytes = write_file(&sample_records(), Endian::Little)?;
    let cut = bytes.len() - 3;
    bytes.truncate(cut);

    let mut stdf = StdfReader::new(Cursor::new(bytes))?;
    let parsed = stdf.read_all();

    assert_eq!(parsed.records.len(), 9);
    assert_eq!(parsed.records, sample_records()[..9].to_vec());
    assert!(matches!(parsed.error, Some(Error::UnexpectedEndOfData { .. })));

    Ok(())
}

#[test]
fn open_plain_and_gzipped_files() -> Result<()> {
    let bytes = write_file(&sample_records(), Endian::Little)?;

    let plain = temp_path("plain.stdf");
    std::fs::write(&plain, &bytes)?;

    let packed = temp_path("packed.stdf.gz");
    let mut gz = StdfBlockWriter::new(Vec::new(), CompressionMethod::Gzip);
    gz.write_all(&bytes)?;
    std::fs::write(&packed, gz.finalize()?)?;

    for path in [&plain, &packed] {
        let mut stdf = StdfReader::open(path)?;
        assert_eq!(stdf.len(), bytes.len() as u64);

        let mut summary = Summary::default();
        stdf.drain_into(&mut summary)?;
        assert_eq!(summary.total_records(), 10);
        assert_eq!(summary.parts_passed, 1);
        assert_eq!(summary.parametric_tests, 1);
        assert!(summary.lot_ids.contains("LOT42"));
    }

    std::fs::remove_file(plain)?;
    std::fs::remove_file(packed)?;

    Ok(())
}

#[test]
fn open_missing_file() {
    let path = temp_path("missing.stdf");

    let err = StdfReader::open(&path).unwrap_err();
    assert!(matches!(err, Error::CannotOpenInput { path: p, .. } if p == path));
}
