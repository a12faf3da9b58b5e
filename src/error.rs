use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The external source could not be reached or queried.
    #[error("data source unavailable ({source_name}): {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("schema error: missing column(s) {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("line {line}: record has {found} field(s), header has {expected}")]
    RowWidth {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Two spellings of a region collapse onto the same identifier.
    #[error("regions \"{first}\" and \"{second}\" share the identifier {id}")]
    RegionId {
        id: String,
        first: String,
        second: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn unavailable(source_name: impl Into<String>, message: impl ToString) -> Self {
        PipelineError::Source {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn missing_columns<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PipelineError::Schema {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Connectivity failures are the only errors worth retrying.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, PipelineError::Source { .. })
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
