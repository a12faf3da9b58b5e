// Cleanup applied to every melted regional table.
//
// Order matters: labels are rewritten before the dropped year is matched, and
// counts are zero-filled only after they have been coerced.
use crate::schema::{self, Metric};
use crate::table::Value;
use crate::types::{CountRecord, LongRecord};
use crate::util::parse_f64_safe;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// `2009_count -> 2009` .. `2019_count -> 2019`.
pub static COUNT_YEAR_LABELS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    schema::years()
        .map(|y| (Metric::Count.column(y), y.to_string()))
        .collect()
});

/// Interns category values so equal labels share one allocation.
#[derive(Debug, Default)]
pub struct CategoryPool {
    values: HashMap<String, Arc<str>>,
}

impl CategoryPool {
    pub fn intern(&mut self, value: &str) -> Arc<str> {
        if let Some(existing) = self.values.get(value) {
            return Arc::clone(existing);
        }
        let handle: Arc<str> = Arc::from(value);
        self.values.insert(value.to_string(), Arc::clone(&handle));
        handle
    }
}

/// Distinct values of each categorical column, sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Categories {
    pub la: Vec<Arc<str>>,
    pub region: Vec<Arc<str>>,
    pub year: Vec<Arc<str>>,
}

impl Categories {
    pub fn of(records: &[CountRecord]) -> Self {
        fn levels<'a>(it: impl Iterator<Item = &'a Arc<str>>) -> Vec<Arc<str>> {
            it.collect::<BTreeSet<_>>().into_iter().cloned().collect()
        }
        Categories {
            la: levels(records.iter().map(|r| &r.la)),
            region: levels(records.iter().map(|r| &r.region)),
            year: levels(records.iter().map(|r| &r.year)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub rows_in: usize,
    pub rows_dropped: usize,
    pub zero_filled: usize,
    /// Distinct count cells that were text but not numbers.
    pub non_numeric_tokens: BTreeSet<String>,
}

/// Relabel years, drop every row whose year equals `dropped_year`, then
/// intern categories and coerce and zero-fill counts.
///
/// The rows to drop are picked from this table's own `Year` values.
pub fn normalize(records: Vec<LongRecord>, dropped_year: &str) -> (Vec<CountRecord>, NormalizeReport) {
    let mut report = NormalizeReport {
        rows_in: records.len(),
        ..NormalizeReport::default()
    };
    let mut pool = CategoryPool::default();

    let mut out = Vec::with_capacity(records.len());
    for rec in records {
        let year = COUNT_YEAR_LABELS
            .get(&rec.year)
            .map(String::as_str)
            .unwrap_or(rec.year.as_str());
        if year == dropped_year {
            report.rows_dropped += 1;
            continue;
        }
        let count = match &rec.count {
            Value::Number(n) => Some(*n),
            Value::Missing => None,
            Value::Text(s) => {
                let parsed = parse_f64_safe(Some(s.as_str()));
                if parsed.is_none() {
                    report.non_numeric_tokens.insert(s.clone());
                }
                parsed
            }
        };
        let count = count.unwrap_or_else(|| {
            report.zero_filled += 1;
            0.0
        });
        out.push(CountRecord {
            la: pool.intern(&rec.la),
            region: pool.intern(&rec.region),
            year: pool.intern(year),
            count,
        });
    }

    (out, report)
}
