use clap::Args;
use miette::{miette, Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use stdf_codec::{StdfReader, StdfReaderOptions};
use tracing::info;

#[derive(Args)]
pub struct VerifyArgs {
    /// An input STDF file, optionally gzipped
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Keep going after a mismatch by repositioning on the header length
    #[arg(long, default_value_t = false)]
    resync: bool,
}

impl VerifyArgs {
    pub fn handle(&self) -> Result<()> {
        let options = StdfReaderOptions::builder().resync(self.resync).build();
        let mut stdf = StdfReader::open_with_options(&self.file, options)
            .context(format!("path: {}", &self.file.display()))?;

        if stdf.detected_endian().is_none() {
            println!("{} byte order could not be detected", "!".yellow());
        }

        let mut entries = 0u64;
        let mut skipped = 0u64;
        let mut mismatches = 0u64;

        while let Some(entry) = stdf
            .next_entry()
            .context(format!("after {entries} records"))?
        {
            entries += 1;

            let Some(record) = &entry.record else {
                skipped += 1;
                continue;
            };

            let computed = record.encoded_size() as u64;
            let length = u64::from(entry.header.length);
            if entry.consumed != length || computed != length {
                mismatches += 1;
                println!(
                    "{} {} at {:#x}: header {}, consumed {}, computed {}",
                    "✗".red(),
                    record.kind(),
                    entry.offset,
                    length,
                    entry.consumed.red(),
                    computed.red()
                );
            }
        }

        info!("{entries} records, {skipped} of unknown type");

        if mismatches > 0 {
            return Err(miette!("{mismatches} records disagree with their header length"));
        }

        println!("{} {} records verified", "✓".green(), entries - skipped);
        Ok(())
    }
}
