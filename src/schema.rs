//! Column layout of the CIN 2009–2019 table.
//!
//! The source table has three identifier columns followed by one count and
//! one rate column per year:
//!
//! ```text
//! LA | LA_Code | Region | 2009_count .. 2019_count | 2009_rate .. 2019_rate
//! ```
//!
//! Column order in the source does not matter; only names are checked.

use crate::error::Result;
use crate::table::Table;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local authority name.
pub const LA: &str = "LA";
/// ONS code of the local authority.
pub const LA_CODE: &str = "LA_Code";
/// Statistical region of the local authority.
pub const REGION: &str = "Region";

pub const FIRST_YEAR: u16 = 2009;
pub const LAST_YEAR: u16 = 2019;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Count,
    Rate,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Count, Metric::Rate];

    pub fn suffix(self) -> &'static str {
        match self {
            Metric::Count => "_count",
            Metric::Rate => "_rate",
        }
    }

    /// Source column for this metric in `year`, e.g. `2019_rate`.
    pub fn column(self, year: u16) -> String {
        format!("{}{}", year, self.suffix())
    }

    /// Every year column for this metric, oldest first.
    pub fn columns(self) -> Vec<String> {
        years().map(|y| self.column(y)).collect()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Count => write!(f, "count"),
            Metric::Rate => write!(f, "rate"),
        }
    }
}

pub fn years() -> impl Iterator<Item = u16> {
    FIRST_YEAR..=LAST_YEAR
}

pub fn is_covered_year(year: u16) -> bool {
    (FIRST_YEAR..=LAST_YEAR).contains(&year)
}

/// The 22 numeric columns: all counts, then all rates.
pub static NUMERIC_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    Metric::ALL
        .iter()
        .flat_map(|m| m.columns())
        .collect()
});

/// Everything the pipeline reads from the source table.
pub static REQUIRED_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    [LA, LA_CODE, REGION]
        .iter()
        .map(|c| c.to_string())
        .chain(NUMERIC_COLUMNS.iter().cloned())
        .collect()
});

/// Fail fast when the source table lacks any expected column.
pub fn validate(table: &Table) -> Result<()> {
    table.require_columns(REQUIRED_COLUMNS.as_slice()).map(|_| ())
}
