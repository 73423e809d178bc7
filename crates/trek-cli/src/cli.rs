use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "trekpedia")]
#[command(about = "Save the Star Trek series catalog and every episode list from Wikipedia as JSON")]
pub struct Cli {
    /// Directory the JSON files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// TOML file overriding the extractor configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the catalog and stop
    #[arg(long)]
    pub catalog_only: bool,

    /// Catalog index of a series to leave out (repeatable)
    #[arg(long = "skip", value_name = "INDEX")]
    pub skip: Vec<u32>,

    /// Process only these catalog indices (repeatable)
    #[arg(long = "only", value_name = "INDEX")]
    pub only: Vec<u32>,
}

impl Cli {
    /// Whether the series at `index` should have its episodes extracted
    pub fn selects(&self, index: u32) -> bool {
        if !self.only.is_empty() && !self.only.contains(&index) {
            return false;
        }
        !self.skip.contains(&index)
    }
}
