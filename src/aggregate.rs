use crate::error::Result;
use crate::schema::{LA, REGION};
use crate::table::Table;
use crate::types::Ranked;
use crate::util::mean_present;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Every LA with a value for `column`, ascending. Equal values keep their
/// table order. LAs with a missing value are not ranked.
fn ascending(table: &Table, column: &str) -> Result<Vec<Ranked>> {
    let idx = table.require_columns(&[LA, column])?;
    let mut ranked: Vec<Ranked> = table
        .rows()
        .iter()
        .filter_map(|r| {
            r[idx[1]].as_number().map(|value| Ranked {
                la: r[idx[0]].to_string(),
                value,
            })
        })
        .collect();
    ranked.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
    Ok(ranked)
}

/// The `n` lowest values of `column`, lowest first.
pub fn lowest_n(table: &Table, column: &str, n: usize) -> Result<Vec<Ranked>> {
    let mut ranked = ascending(table, column)?;
    ranked.truncate(n);
    Ok(ranked)
}

/// The `n` highest values of `column`, still in ascending order.
pub fn highest_n(table: &Table, column: &str, n: usize) -> Result<Vec<Ranked>> {
    let mut ranked = ascending(table, column)?;
    let skip = ranked.len().saturating_sub(n);
    Ok(ranked.split_off(skip))
}

/// Mean of `column` over the rows where it is present.
pub fn national_mean(table: &Table, column: &str) -> Result<Option<f64>> {
    let idx = table.require_columns(&[column])?[0];
    Ok(mean_present(table.rows().iter().map(|r| r[idx].as_number())))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMean {
    pub region: String,
    /// One mean per requested metric, in request order.
    pub means: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalMeans {
    pub metrics: Vec<String>,
    /// Groups in region-name order.
    pub groups: Vec<RegionMean>,
}

impl RegionalMeans {
    /// Groups sorted by the mean of `metric`, highest first; regions with no
    /// value for the metric go last. `None` if `metric` was not requested.
    pub fn sorted_desc(&self, metric: &str) -> Option<Vec<(&str, Option<f64>)>> {
        let m = self.metrics.iter().position(|x| x == metric)?;
        let mut rows: Vec<(&str, Option<f64>)> = self
            .groups
            .iter()
            .map(|g| (g.region.as_str(), g.means[m]))
            .collect();
        rows.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Some(rows)
    }

    pub fn mean(&self, region: &str, metric: &str) -> Option<f64> {
        let m = self.metrics.iter().position(|x| x == metric)?;
        self.groups.iter().find(|g| g.region == region)?.means[m]
    }
}

/// Mean of each metric per `Region`. Rows without a region are ignored.
pub fn regional_means<S: AsRef<str>>(table: &Table, metrics: &[S]) -> Result<RegionalMeans> {
    let region_idx = table.require_columns(&[REGION])?[0];
    let metric_idx = table.require_columns(metrics)?;

    let mut groups: BTreeMap<String, Vec<Vec<Option<f64>>>> = BTreeMap::new();
    for row in table.rows() {
        let Some(region) = row[region_idx].as_text() else {
            continue;
        };
        let acc = groups
            .entry(region.to_string())
            .or_insert_with(|| vec![Vec::new(); metric_idx.len()]);
        for (slot, &idx) in acc.iter_mut().zip(&metric_idx) {
            slot.push(row[idx].as_number());
        }
    }

    Ok(RegionalMeans {
        metrics: metrics.iter().map(|m| m.as_ref().to_string()).collect(),
        groups: groups
            .into_iter()
            .map(|(region, values)| RegionMean {
                region,
                means: values.into_iter().map(mean_present).collect(),
            })
            .collect(),
    })
}
