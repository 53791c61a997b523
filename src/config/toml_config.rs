use crate::config::series_output_name;
use crate::core::rounds::DEFAULT_BASE_URL;
use crate::domain::ports::{ConfigProvider, SeriesJob};
use crate::domain::table::OutputFormat;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_base_url, validate_non_empty, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub series: Vec<SeriesConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub input: String,
    /// Defaults to the input's stem with `-` turned into `_`.
    pub output: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_output_path() -> String {
    ".".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            format: OutputFormat::default(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// `${VAR}` references are replaced from the environment before parsing.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::Config {
            message: e.to_string(),
        })?;

        // Unknown variables stay as written.
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_format(&self) -> OutputFormat {
        self.load.format
    }

    fn series(&self) -> Vec<SeriesJob> {
        self.series
            .iter()
            .map(|series| SeriesJob {
                input: series.input.clone(),
                output: series
                    .output
                    .clone()
                    .unwrap_or_else(|| series_output_name(&series.input, self.load.format)),
            })
            .collect()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_base_url("source.base_url", &self.source.base_url)?;
        validate_path("load.output_path", &self.load.output_path)?;
        validate_non_empty("series", &self.series)?;
        for series in &self.series {
            validate_path("series.input", &series.input)?;
            if let Some(output) = &series.output {
                validate_path("series.output", output)?;
            }
        }
        Ok(())
    }
}
