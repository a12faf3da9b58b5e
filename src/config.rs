//! Run configuration.
//!
//! Values come from built-in defaults, optionally replaced by a TOML file,
//! optionally replaced again by command-line flags (see `cli`).
//!
//! ```toml
//! output_dir = "out"
//! top_n = 15
//! reference_year = 2019
//!
//! [source]
//! kind = "sqlite"
//! path = "cin.db"
//! query = 'SELECT * FROM "CIN_2009-2019"'
//! ```

use crate::coerce::default_markers;
use crate::error::{PipelineError, Result};
use crate::loader::{CsvSource, RetryPolicy, SqliteSource, TableSource, DEFAULT_QUERY};
use crate::schema;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Csv {
        path: PathBuf,
    },
    Sqlite {
        path: PathBuf,
        #[serde(default = "default_query")]
        query: String,
    },
}

impl SourceConfig {
    pub fn build(&self) -> Box<dyn TableSource> {
        match self {
            SourceConfig::Csv { path } => Box::new(CsvSource::new(path)),
            SourceConfig::Sqlite { path, query } => Box::new(SqliteSource::new(path, query.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
    pub output_dir: PathBuf,
    /// How many LAs the highest/lowest tables hold.
    pub top_n: usize,
    /// Year whose count and rate columns are ranked and averaged.
    pub reference_year: u16,
    /// Year removed from the regional long tables.
    pub dropped_year: u16,
    pub missing_markers: Vec<String>,
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub write_outputs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: SourceConfig::Csv {
                path: PathBuf::from("cin_2009-2019.csv"),
            },
            output_dir: PathBuf::from("output"),
            top_n: 15,
            reference_year: schema::LAST_YEAR,
            dropped_year: schema::FIRST_YEAR,
            missing_markers: default_markers(),
            retries: 1,
            retry_delay_ms: 500,
            write_outputs: true,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(PipelineError::Config("top_n must be at least 1".into()));
        }
        for (name, year) in [
            ("reference_year", self.reference_year),
            ("dropped_year", self.dropped_year),
        ] {
            if !schema::is_covered_year(year) {
                return Err(PipelineError::Config(format!(
                    "{} {} is outside {}-{}",
                    name,
                    year,
                    schema::FIRST_YEAR,
                    schema::LAST_YEAR
                )));
            }
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
