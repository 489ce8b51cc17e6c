use clap::{Args, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};
use stdf_codec::StdfReader;
use tracing::info;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct DumpArgs {
    /// An input STDF file, optionally gzipped
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Stop after this many records
    #[arg(short, long)]
    limit: Option<usize>,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let mut stdf = StdfReader::open(&self.file)
            .context(format!("path: {}", &self.file.display()))?;
        info!("reading {} ({:?})", self.file.display(), stdf.endian());

        let mut out = BufWriter::new(std::io::stdout().lock());
        let mut written = 0;

        for record in stdf.records().take(self.limit.unwrap_or(usize::MAX)) {
            let record = record.context(format!("after {written} records"))?;
            match self.format {
                Format::Text => writeln!(out, "{record}").into_diagnostic()?,
                Format::Json => {
                    serde_json::to_writer(&mut out, &record).into_diagnostic()?;
                    writeln!(out).into_diagnostic()?;
                }
            }
            written += 1;
        }

        out.flush().into_diagnostic()?;
        info!("{written} records");
        Ok(())
    }
}
