use crate::error::Result;
use crate::pivot::year_columns;
use crate::types::CountSeries;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Wide per-LA series: `LA,Region,<year>...`. Years an LA lacks are blank.
pub fn write_series_csv(path: &Path, series: &[CountSeries]) -> Result<()> {
    let years = year_columns(series);
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["LA".to_string(), "Region".to_string()];
    header.extend(years.iter().cloned());
    wtr.write_record(&header)?;
    for s in series {
        let mut record = vec![s.la.to_string(), s.region.to_string()];
        record.extend(
            years
                .iter()
                .map(|y| s.counts.get(y).map(|c| c.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
