use clap::Args;
use itertools::Itertools;
use miette::{miette, Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use stdf_codec::{StdfReader, Summary};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Args)]
pub struct SummaryArgs {
    /// An input STDF file, or a directory searched for them
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// Print the summaries as JSON lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn is_stdf(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_ascii_lowercase())
        .is_some_and(|name| {
            [".stdf", ".std", ".stdf.gz", ".std.gz"]
                .iter()
                .any(|ext| name.ends_with(ext))
        })
}

impl SummaryArgs {
    fn inputs(&self) -> Vec<PathBuf> {
        if !self.file.is_dir() {
            return vec![self.file.clone()];
        }

        WalkDir::new(&self.file)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .map(|e| e.into_path())
            .filter(|p| is_stdf(p))
            .sorted()
            .collect()
    }

    fn summarize(path: &Path) -> Result<Summary> {
        info!("reading {}", path.display());

        let mut stdf =
            StdfReader::open(path).context(format!("path: {}", path.display()))?;
        let mut summary = Summary::default();
        stdf.drain_into(&mut summary)
            .context(format!("decoding {}", path.display()))?;

        Ok(summary)
    }

    fn print(path: &Path, summary: &Summary) {
        println!("{}", path.display().bold());
        println!(
            "  records: {}",
            summary
                .records
                .iter()
                .map(|(kind, count)| format!("{kind}={count}"))
                .join(" ")
        );
        if !summary.lot_ids.is_empty() {
            println!("  lots: {}", summary.lot_ids.iter().join(", "));
        }
        if !summary.part_types.is_empty() {
            println!("  part types: {}", summary.part_types.iter().join(", "));
        }
        println!(
            "  parts: {} tested, {} passed, {} failed",
            summary.parts_tested,
            summary.parts_passed.green(),
            summary.parts_failed.red()
        );
        if let Some(yield_percent) = summary.yield_percent() {
            println!("  yield: {yield_percent:.2}%");
        }
        println!("  parametric tests: {}", summary.parametric_tests);
    }

    pub fn handle(&self) -> Result<()> {
        let inputs = self.inputs();
        if inputs.is_empty() {
            return Err(miette!("no STDF files under {}", self.file.display()));
        }

        let mut failures = 0;
        for path in &inputs {
            let summary = match Self::summarize(path) {
                Ok(summary) => summary,
                Err(err) if inputs.len() > 1 => {
                    warn!("skipping {}: {err:?}", path.display());
                    failures += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if self.json {
                let line = serde_json::json!({ "path": path, "summary": summary });
                println!("{line}");
            } else {
                Self::print(path, &summary);
            }
        }

        if failures > 0 {
            return Err(miette!("{failures} of {} files could not be read", inputs.len()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::is_stdf;

    #[test]
    fn recognise_stdf_names() {
        assert!(is_stdf(Path::new("lot/w01.stdf")));
        assert!(is_stdf(Path::new("lot/W01.STD")));
        assert!(is_stdf(Path::new("w01.stdf.gz")));
        assert!(!is_stdf(Path::new("w01.csv")));
        assert!(!is_stdf(Path::new("w01.gz")));
    }
}
