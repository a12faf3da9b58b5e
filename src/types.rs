use crate::table::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tabled::Tabled;

/// One melted cell, before normalization: `year` is still the source column
/// label (e.g. `2014_count`) and `count` the untouched cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub la: String,
    pub region: String,
    pub year: String,
    pub count: Value,
}

/// A normalized long-format row. The string fields are category handles
/// shared by every row of the same regional table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountRecord {
    #[serde(rename = "LA")]
    pub la: Arc<str>,
    #[serde(rename = "Region")]
    pub region: Arc<str>,
    #[serde(rename = "Year")]
    pub year: Arc<str>,
    #[serde(rename = "Count")]
    pub count: f64,
}

/// One LA's count series spread back to one value per year.
#[derive(Debug, Clone, PartialEq)]
pub struct CountSeries {
    pub la: Arc<str>,
    pub region: Arc<str>,
    pub counts: BTreeMap<String, f64>,
}

/// A local authority and its value for the ranked metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    #[serde(rename = "LA")]
    pub la: String,
    #[serde(rename = "Value")]
    pub value: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "LA")]
    #[tabled(rename = "LA")]
    pub la: String,
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RegionMeanRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "MeanCount")]
    #[tabled(rename = "MeanCount")]
    pub mean_count: String,
    #[serde(rename = "MeanRate")]
    #[tabled(rename = "MeanRate")]
    pub mean_rate: String,
}
