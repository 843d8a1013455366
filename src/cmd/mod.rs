pub mod amount;
pub mod batch;
pub mod brackets;
pub mod calc;
pub mod schema;

use anyhow::Context;
use clap::Args;
use nencho::engine::{rules, BracketTable, TaxYear};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Selects the deduction table a command evaluates against
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Tax year of the statutory deduction table (default 2024)
    #[arg(short, long)]
    year: Option<i32>,

    /// JSON rule file to use instead of the statutory table
    #[arg(short, long, conflicts_with = "year")]
    rules: Option<PathBuf>,
}

impl TableArgs {
    pub fn load(&self) -> anyhow::Result<BracketTable> {
        self.load_or(None)
    }

    /// Like `load`, falling back to `year` before the default tax year
    pub fn load_or(&self, year: Option<i32>) -> anyhow::Result<BracketTable> {
        if let Some(ref path) = self.rules {
            let file = File::open(path)
                .with_context(|| format!("cannot open rule file {}", path.display()))?;
            return rules::load(BufReader::new(file))
                .with_context(|| format!("invalid rule file {}", path.display()));
        }
        let year = self.year.or(year).map_or(TaxYear::DEFAULT, TaxYear);
        Ok(rules::statutory(year)?)
    }
}

/// Read a whole input file, or stdin with "-"
pub fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
    } else {
        File::open(path)
            .with_context(|| format!("cannot open {}", path.display()))?
            .read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}
