use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

pub mod read {
    use divan::Bencher;
    use std::io::Cursor;
    use stdf_codec::record::{FileAttribute, ParametricTest, PartInformation, PartResults};
    use stdf_codec::{Endian, StdfReader, StdfWriter, StdfWriterOptions};

    fn get_input(endian: Endian) -> Vec<u8> {
        let mut stdf = StdfWriter::new(
            Vec::new(),
            StdfWriterOptions::builder().endian(endian).build(),
        );
        stdf.write_record(
            &FileAttribute {
                cpu_type: 2,
                stdf_version: 4,
            }
            .into(),
        )
        .unwrap();

        for part in 0..1_000u32 {
            stdf.write_record(&PartInformation::default().into())
                .unwrap();
            for test in 0..20 {
                stdf.write_record(
                    &ParametricTest {
                        test_number: test,
                        result: part as f32 * 0.001,
                        test_text: "IDDQ".into(),
                        optional_flags: 0xFF,
                        units: "A".into(),
                        ..Default::default()
                    }
                    .into(),
                )
                .unwrap();
            }
            stdf.write_record(
                &PartResults {
                    hard_bin: (part % 3) as u16,
                    test_count: 20,
                    ..Default::default()
                }
                .into(),
            )
            .unwrap();
        }

        stdf.finish().unwrap()
    }

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher
            .with_inputs(|| get_input(Endian::Little))
            .bench_refs(|data| {
                divan::black_box(StdfReader::new(Cursor::new(data)).unwrap());
            });
    }

    #[divan::bench(args = [Endian::Little, Endian::Big])]
    fn read_all(bencher: Bencher, endian: Endian) {
        bencher
            .with_inputs(|| get_input(endian))
            .bench_refs(|data| {
                let mut stdf = StdfReader::new(Cursor::new(data)).unwrap();
                divan::black_box(stdf.read_all().into_result().unwrap());
            });
    }
}
