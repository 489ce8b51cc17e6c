pub mod dump;
pub mod generate;
pub mod summary;
pub mod verify;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Print the records of an STDF file
    Dump(dump::DumpArgs),
    /// Summarize one STDF file or a directory of them
    Summary(summary::SummaryArgs),
    /// Check that every record decodes to its header length
    Verify(verify::VerifyArgs),
    /// Write synthetic STDF files
    Generate(generate::GenerateArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Dump(dump) => dump.handle(),
            Commands::Summary(summary) => summary.handle(),
            Commands::Verify(verify) => verify.handle(),
            Commands::Generate(generate) => generate.handle(),
        }
    }
}
