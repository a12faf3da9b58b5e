// Wide-to-long reshaping of a regional table.
use crate::error::Result;
use crate::schema::{LA, REGION};
use crate::table::Table;
use crate::types::LongRecord;

/// Melt `value_columns` of `table` into one record per (LA, Region, column).
///
/// The column label becomes `year` and the cell becomes `count`. Records are
/// ordered by label (plain string order, which is chronological for
/// `YYYY_suffix` labels), and by source row within a label. The output always
/// has `table.len() * value_columns.len()` records.
pub fn melt<S: AsRef<str>>(table: &Table, value_columns: &[S]) -> Result<Vec<LongRecord>> {
    let ids = table.require_columns(&[LA, REGION])?;
    let (la_idx, region_idx) = (ids[0], ids[1]);
    let value_idx = table.require_columns(value_columns)?;

    let mut out = Vec::with_capacity(table.len() * value_idx.len());
    for (label, &col) in value_columns.iter().zip(&value_idx) {
        for row in table.rows() {
            out.push(LongRecord {
                la: row[la_idx].to_string(),
                region: row[region_idx].to_string(),
                year: label.as_ref().to_string(),
                count: row[col].clone(),
            });
        }
    }
    // stable: rows keep source order within a label
    out.sort_by(|a, b| a.year.cmp(&b.year));
    Ok(out)
}
