// Text-to-number coercion of the year columns.
//
// Coercion never fails: a cell that cannot be read as a number becomes
// `Value::Missing`. The distinct tokens that were thrown away are reported so
// the run log shows which suppression markers the source used.
use crate::error::Result;
use crate::table::{Table, Value};
use crate::util::parse_f64_safe;
use serde::Serialize;
use std::collections::BTreeSet;

/// Markers the source uses for suppressed or unavailable figures.
pub const DEFAULT_MISSING_MARKERS: &[&str] = &["NULL", "NA", "N/A", "x", "c", "z", "..", ":", "-"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercionReport {
    /// Text cells successfully read as numbers.
    pub parsed_cells: usize,
    /// Cells that ended up missing, including ones missing in the source.
    pub missing_cells: usize,
    /// Distinct non-numeric tokens found, markers included.
    pub non_numeric_tokens: BTreeSet<String>,
}

/// Coerce `columns` of `table` to numbers in place.
///
/// Cells equal to one of `markers` (case-insensitive) become missing without
/// a parse attempt. Columns not listed are untouched. Fails only when a
/// listed column does not exist.
pub fn coerce_numeric<S: AsRef<str>>(
    table: &mut Table,
    columns: &[S],
    markers: &[String],
) -> Result<CoercionReport> {
    let indices = table.require_columns(columns)?;
    let mut report = CoercionReport::default();
    for row in table.rows_mut() {
        for &idx in &indices {
            let cell = std::mem::replace(&mut row[idx], Value::Missing);
            row[idx] = match cell {
                Value::Number(n) => Value::Number(n),
                Value::Missing => Value::Missing,
                Value::Text(s) => {
                    let is_marker = markers.iter().any(|m| m.eq_ignore_ascii_case(s.trim()));
                    match parse_f64_safe(Some(s.as_str())).filter(|_| !is_marker) {
                        Some(n) => {
                            report.parsed_cells += 1;
                            Value::Number(n)
                        }
                        None => {
                            report.non_numeric_tokens.insert(s);
                            Value::Missing
                        }
                    }
                }
            };
            if row[idx].is_missing() {
                report.missing_cells += 1;
            }
        }
    }
    Ok(report)
}

pub fn default_markers() -> Vec<String> {
    DEFAULT_MISSING_MARKERS.iter().map(|m| m.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> Table {
        let mut t = Table::new(["LA", "2018_count", "2019_count"]);
        t.push_row(vec!["Derby".into(), "1450".into(), "x".into()]);
        t.push_row(vec!["Rutland".into(), Value::Number(88.0), Value::Missing]);
        t.push_row(vec!["Leicester".into(), "n/a ".into(), "2,100".into()]);
        t
    }

    #[test]
    fn only_listed_columns_change() {
        let mut t = raw();
        let before = t.clone();
        coerce_numeric(&mut t, &["2019_count"], &default_markers()).unwrap();
        assert_eq!(t.len(), before.len());
        assert_eq!(t.columns(), before.columns());
        for r in 0..t.len() {
            assert_eq!(t.cell(r, "LA"), before.cell(r, "LA"));
            assert_eq!(t.cell(r, "2018_count"), before.cell(r, "2018_count"));
        }
    }

    #[test]
    fn unparseable_cells_become_missing_and_numbers_survive() {
        let mut t = raw();
        let report = coerce_numeric(&mut t, &["2018_count", "2019_count"], &default_markers()).unwrap();
        assert_eq!(t.cell(0, "2018_count"), Some(&Value::Number(1450.0)));
        assert_eq!(t.cell(0, "2019_count"), Some(&Value::Missing));
        assert_eq!(t.cell(1, "2018_count"), Some(&Value::Number(88.0)));
        assert_eq!(t.cell(2, "2018_count"), Some(&Value::Missing));
        // thousands separators are not numbers to the source either
        assert_eq!(t.cell(2, "2019_count"), Some(&Value::Missing));

        assert_eq!(report.parsed_cells, 1);
        assert_eq!(report.missing_cells, 4);
        let tokens: Vec<&str> = report.non_numeric_tokens.iter().map(String::as_str).collect();
        assert_eq!(tokens, vec!["2,100", "n/a ", "x"]);
    }

    #[test]
    fn dash_marker_is_missing_but_negative_numbers_parse() {
        let mut t = Table::new(["2019_count"]);
        t.push_row(vec!["-".into()]);
        t.push_row(vec!["-5".into()]);
        coerce_numeric(&mut t, &["2019_count"], &default_markers()).unwrap();
        assert_eq!(t.cell(0, "2019_count"), Some(&Value::Missing));
        assert_eq!(t.cell(1, "2019_count"), Some(&Value::Number(-5.0)));
    }

    #[test]
    fn unknown_column_is_a_schema_error() {
        let mut t = raw();
        assert!(coerce_numeric(&mut t, &["2020_count"], &default_markers()).is_err());
    }
}
