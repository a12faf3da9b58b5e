use crate::types::{CountRecord, CountSeries};
use std::collections::HashMap;
use std::sync::Arc;

/// Spread normalized records back to one series per (LA, Region).
///
/// Series are returned in the order their first record appears. A repeated
/// (LA, Region, Year) keeps the last count.
pub fn pivot(records: &[CountRecord]) -> Vec<CountSeries> {
    let mut index: HashMap<(Arc<str>, Arc<str>), usize> = HashMap::new();
    let mut out: Vec<CountSeries> = Vec::new();
    for r in records {
        let key = (Arc::clone(&r.la), Arc::clone(&r.region));
        let slot = *index.entry(key).or_insert_with(|| {
            out.push(CountSeries {
                la: Arc::clone(&r.la),
                region: Arc::clone(&r.region),
                counts: Default::default(),
            });
            out.len() - 1
        });
        out[slot].counts.insert(r.year.to_string(), r.count);
    }
    out
}

/// Every year label present in `series`, sorted.
pub fn year_columns(series: &[CountSeries]) -> Vec<String> {
    let mut years: Vec<String> = series
        .iter()
        .flat_map(|s| s.counts.keys().cloned())
        .collect();
    years.sort();
    years.dedup();
    years
}
