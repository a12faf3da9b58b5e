// In-memory tabular data as it comes out of the source.
//
// Cells stay loosely typed until the coercion stage so that a column can hold
// a mixture of numbers, raw text tokens and missing values, the way an
// untyped SQL export does.
use crate::error::{PipelineError, Result};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Missing,
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Missing => Ok(()),
        }
    }
}

/// A rectangular table: named columns, rows of equal width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with `Missing`, long rows are cut
    /// to the table width.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Value>] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Resolve every name to its column index, or fail with all of the
    /// absent names at once.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name.as_ref()) {
                Some(idx) => found.push(idx),
                None => missing.push(name.as_ref().to_string()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(PipelineError::missing_columns(missing))
        }
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Copy of the table without the named columns. Unknown names are ignored.
    pub fn without_columns(&self, names: &[&str]) -> Table {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|i| !names.contains(&self.columns[*i].as_str()))
            .collect();
        Table {
            columns: keep.iter().map(|i| self.columns[*i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| keep.iter().map(|i| r[*i].clone()).collect())
                .collect(),
        }
    }

    /// Copy of the table keeping only rows accepted by `pred`, in order.
    pub fn filter_rows<F>(&self, mut pred: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| pred(r)).cloned().collect(),
        }
    }

    /// Remove rows whose `key` cell repeats an earlier row, keeping the first.
    /// Rows with a missing key are kept. Returns how many rows were removed.
    pub fn drop_duplicates(&mut self, key: &str) -> Result<usize> {
        let idx = self.require_columns(&[key])?[0];
        let before = self.rows.len();
        let mut seen: HashSet<String> = HashSet::new();
        self.rows.retain(|r| match &r[idx] {
            Value::Missing => true,
            v => seen.insert(v.to_string()),
        });
        Ok(before - self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(["LA", "LA_Code", "2019_count"]);
        t.push_row(vec!["Derby".into(), "E06000015".into(), "1450".into()]);
        t.push_row(vec!["Leicester".into(), "E06000016".into()]);
        t.push_row(vec!["Derby".into(), "E06000015".into(), "99".into()]);
        t
    }

    #[test]
    fn short_rows_are_padded_with_missing() {
        let t = sample();
        assert_eq!(t.cell(1, "2019_count"), Some(&Value::Missing));
        assert!(t.rows().iter().all(|r| r.len() == 3));
    }

    #[test]
    fn require_columns_reports_all_missing_names() {
        let t = sample();
        let err = t.require_columns(&["LA", "Region", "2018_rate"]).unwrap_err();
        match err {
            PipelineError::Schema { missing } => {
                assert_eq!(missing, vec!["Region".to_string(), "2018_rate".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn without_columns_keeps_order_of_the_rest() {
        let t = sample().without_columns(&["LA_Code"]);
        assert_eq!(t.columns(), &["LA".to_string(), "2019_count".to_string()]);
        assert_eq!(t.cell(0, "2019_count"), Some(&Value::Text("1450".into())));
    }

    #[test]
    fn drop_duplicates_keeps_first_occurrence() {
        let mut t = sample();
        assert_eq!(t.drop_duplicates("LA").unwrap(), 1);
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(0, "2019_count"), Some(&Value::Text("1450".into())));
    }
}
