pub mod toml_config;

use crate::core::rounds::DEFAULT_BASE_URL;
use crate::domain::ports::{ConfigProvider, SeriesJob};
use crate::domain::table::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::{validate_base_url, validate_non_empty, validate_path, Validate};
use std::path::Path;

/// Output file for an input list: `premier-league.txt` -> `premier_league.csv`.
pub fn series_output_name(input: &str, format: OutputFormat) -> String {
    let stem = Path::new(input)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(input);
    format!("{}.{}", stem.replace('-', "_"), format.extension())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "kata-etl")]
#[command(about = "Collect WKF kata judge grades from sportdata.org draws pages")]
pub struct CliConfig {
    /// Input lists of event draws URLs, one URL per line
    #[arg(long, value_delimiter = ',', default_value = "premier-league.txt,series-A.txt")]
    pub inputs: Vec<String>,

    /// Directory holding the input lists and receiving the output files
    #[arg(long, default_value = ".")]
    pub output_path: String,

    /// Base that round links on the draws index are relative to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Recompute series whose output file already exists
    #[arg(long)]
    pub force: bool,

    /// List the rounds of every event without extracting them
    #[arg(long)]
    pub dry_run: bool,

    /// TOML configuration file; replaces the inputs, paths and format above
    #[arg(long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn series(&self) -> Vec<SeriesJob> {
        self.inputs
            .iter()
            .map(|input| SeriesJob {
                input: input.clone(),
                output: series_output_name(input, self.format),
            })
            .collect()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_base_url("base_url", &self.base_url)?;
        validate_path("output_path", &self.output_path)?;
        validate_non_empty("inputs", &self.inputs)?;
        for input in &self.inputs {
            validate_path("inputs", input)?;
        }
        Ok(())
    }
}
