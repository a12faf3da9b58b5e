// The full run: load, coerce, dedupe, rank and average nationally, then
// partition, melt and normalize per region.
use crate::aggregate::{self, RegionalMeans};
use crate::coerce::{self, CoercionReport};
use crate::config::Config;
use crate::error::Result;
use crate::loader::{self, TableSource};
use crate::normalize::{self, Categories, NormalizeReport};
use crate::output;
use crate::partition;
use crate::pivot;
use crate::reports;
use crate::reshape;
use crate::schema::{self, Metric};
use crate::table::Table;
use crate::types::{CountRecord, Ranked};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Normalized long-format counts for one region.
#[derive(Debug, Clone)]
pub struct RegionalCounts {
    pub id: String,
    pub name: String,
    pub records: Vec<CountRecord>,
    pub categories: Categories,
    pub report: NormalizeReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricRanking {
    pub column: String,
    pub highest: Vec<Ranked>,
    pub lowest: Vec<Ranked>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub coercion: CoercionReport,
    /// The coerced, de-duplicated national wide table.
    pub national: Table,
    pub regions: Vec<RegionalCounts>,
    pub rankings: Vec<MetricRanking>,
    pub national_means: BTreeMap<String, Option<f64>>,
    pub regional_means: RegionalMeans,
}

impl PipelineOutput {
    pub fn region(&self, id: &str) -> Option<&RegionalCounts> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn ranking(&self, column: &str) -> Option<&MetricRanking> {
        self.rankings.iter().find(|r| r.column == column)
    }
}

/// Load from the configured source and process.
pub fn run(config: &Config) -> Result<PipelineOutput> {
    let source = config.source.build();
    run_with_source(source.as_ref(), config)
}

pub fn run_with_source(source: &dyn TableSource, config: &Config) -> Result<PipelineOutput> {
    let generated_at = Utc::now();
    info!(source = %source.describe(), "loading CIN table");
    let mut national = loader::load(source, config.retry_policy())?;
    let rows_loaded = national.len();
    if national.is_empty() {
        warn!(source = %source.describe(), "source returned no rows");
    }

    let coercion = coerce::coerce_numeric(
        &mut national,
        schema::NUMERIC_COLUMNS.as_slice(),
        &config.missing_markers,
    )?;
    info!(
        parsed = coercion.parsed_cells,
        missing = coercion.missing_cells,
        tokens = ?coercion.non_numeric_tokens,
        "year columns coerced"
    );

    let duplicates_removed = national.drop_duplicates(schema::LA)?;
    if duplicates_removed > 0 {
        warn!(rows = duplicates_removed, "duplicate LA rows dropped");
    }

    let year = config.reference_year;
    let metric_columns: Vec<String> = Metric::ALL.iter().map(|m| m.column(year)).collect();

    let mut rankings = Vec::with_capacity(metric_columns.len());
    let mut national_means = BTreeMap::new();
    for column in &metric_columns {
        rankings.push(MetricRanking {
            column: column.clone(),
            highest: aggregate::highest_n(&national, column, config.top_n)?,
            lowest: aggregate::lowest_n(&national, column, config.top_n)?,
        });
        national_means.insert(column.clone(), aggregate::national_mean(&national, column)?);
    }
    let regional_means = aggregate::regional_means(&national, &metric_columns)?;

    let count_columns = Metric::Count.columns();
    let dropped_year = config.dropped_year.to_string();
    let mut regions = Vec::new();
    for part in partition::partition_by_region(&national)? {
        let long = reshape::melt(&part.table, &count_columns)?;
        let (records, report) = normalize::normalize(long, &dropped_year);
        info!(
            region = %part.name,
            las = part.table.len(),
            rows = records.len(),
            zero_filled = report.zero_filled,
            "regional counts normalized"
        );
        regions.push(RegionalCounts {
            categories: Categories::of(&records),
            id: part.id,
            name: part.name,
            records,
            report,
        });
    }

    Ok(PipelineOutput {
        generated_at,
        source: source.describe(),
        rows_loaded,
        duplicates_removed,
        coercion,
        national,
        regions,
        rankings,
        national_means,
        regional_means,
    })
}

#[derive(Debug, Serialize)]
pub struct RegionSummary {
    pub id: String,
    pub name: String,
    pub local_authorities: usize,
    pub rows: usize,
    pub years: Vec<String>,
    pub rows_dropped: usize,
    pub zero_filled: usize,
}

#[derive(Debug, Serialize)]
pub struct RegionValue {
    pub region: String,
    pub mean: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub coercion: CoercionReport,
    pub regions: Vec<RegionSummary>,
    pub national_means: BTreeMap<String, Option<f64>>,
    /// Per metric column, regions from highest to lowest mean.
    pub regional_means: BTreeMap<String, Vec<RegionValue>>,
}

pub fn summarize(out: &PipelineOutput) -> RunSummary {
    let regional_means = out
        .regional_means
        .metrics
        .iter()
        .map(|m| {
            let ordered = out
                .regional_means
                .sorted_desc(m)
                .unwrap_or_default()
                .into_iter()
                .map(|(region, mean)| RegionValue {
                    region: region.to_string(),
                    mean,
                })
                .collect();
            (m.clone(), ordered)
        })
        .collect();
    RunSummary {
        generated_at: out.generated_at,
        source: out.source.clone(),
        rows_loaded: out.rows_loaded,
        duplicates_removed: out.duplicates_removed,
        coercion: out.coercion.clone(),
        regions: out
            .regions
            .iter()
            .map(|r| RegionSummary {
                id: r.id.clone(),
                name: r.name.clone(),
                local_authorities: r.categories.la.len(),
                rows: r.records.len(),
                years: r.categories.year.iter().map(|y| y.to_string()).collect(),
                rows_dropped: r.report.rows_dropped,
                zero_filled: r.report.zero_filled,
            })
            .collect(),
        national_means: out.national_means.clone(),
        regional_means,
    }
}

/// Write every table of the run into `dir`; returns the paths written.
pub fn write_outputs(out: &PipelineOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for region in &out.regions {
        let path = dir.join(format!("cin_counts_{}.csv", region.id));
        output::write_csv(&path, &region.records)?;
        written.push(path);

        let path = dir.join(format!("cin_count_series_{}.csv", region.id));
        output::write_series_csv(&path, &pivot::pivot(&region.records))?;
        written.push(path);
    }

    for ranking in &out.rankings {
        for (kind, rows) in [("highest", &ranking.highest), ("lowest", &ranking.lowest)] {
            let path = dir.join(format!("{}_{}.csv", kind, ranking.column));
            output::write_csv(&path, rows.as_slice())?;
            written.push(path);
        }
    }

    let path = dir.join("regional_means.csv");
    output::write_csv(&path, &reports::region_mean_rows(&out.regional_means))?;
    written.push(path);

    let path = dir.join("summary.json");
    output::write_json(&path, &summarize(out))?;
    written.push(path);

    info!(files = written.len(), dir = %dir.display(), "outputs written");
    Ok(written)
}
