#![allow(dead_code)]

use cin_trends::schema::{self, Metric};
use std::path::{Path, PathBuf};

pub const REGIONS: [(&str, &[&str]); 3] = [
    ("East Midlands", &["Derby", "Leicester", "Rutland"]),
    ("London", &["Camden", "Hackney", "Islington", "Southwark"]),
    ("North East", &["Durham", "Sunderland"]),
];

/// Count for an LA in a year; distinct for every pair.
pub fn count_for(la_index: usize, year: u16) -> f64 {
    (100 * (la_index + 1)) as f64 + f64::from(year - schema::FIRST_YEAR)
}

pub fn rate_for(la_index: usize, year: u16) -> f64 {
    300.0 + la_index as f64 * 10.5 + f64::from(year - schema::FIRST_YEAR) / 4.0
}

pub fn header() -> Vec<String> {
    let mut h = vec!["LA".to_string(), "LA_Code".to_string(), "Region".to_string()];
    h.extend(schema::NUMERIC_COLUMNS.iter().cloned());
    h
}

/// Rows of the clean fixture as text, interleaving the regions so that a
/// region's rows are not contiguous in the source.
pub fn rows() -> Vec<Vec<String>> {
    let mut labelled: Vec<(usize, &str, &str)> = Vec::new();
    let mut i = 0;
    for (region, las) in REGIONS {
        for la in las {
            labelled.push((i, region, *la));
            i += 1;
        }
    }
    labelled.sort_by_key(|(i, _, _)| (i % 3, *i));
    labelled
        .into_iter()
        .map(|(i, region, la)| {
            let mut row = vec![la.to_string(), format!("E{:08}", i), region.to_string()];
            for metric in Metric::ALL {
                for year in schema::years() {
                    let v = match metric {
                        Metric::Count => count_for(i, year),
                        Metric::Rate => rate_for(i, year),
                    };
                    row.push(v.to_string());
                }
            }
            row
        })
        .collect()
}

/// Index used by `count_for` for the named LA.
pub fn la_index(name: &str) -> usize {
    REGIONS
        .iter()
        .flat_map(|(_, las)| las.iter())
        .position(|la| *la == name)
        .expect("fixture LA")
}

pub fn write_csv(dir: &Path, header: &[String], rows: &[Vec<String>]) -> PathBuf {
    let path = dir.join("cin.csv");
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&path)
        .unwrap();
    wtr.write_record(header).unwrap();
    for r in rows {
        wtr.write_record(r).unwrap();
    }
    wtr.flush().unwrap();
    path
}

/// Same fixture as a SQLite table named like the production one. Year
/// columns are TEXT, as in the source database.
pub fn write_sqlite(dir: &Path, rows: &[Vec<String>]) -> PathBuf {
    let path = dir.join("cin.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    let cols = header();
    let ddl = format!(
        "CREATE TABLE \"CIN_2009-2019\" ({})",
        cols.iter()
            .map(|c| format!("\"{}\" TEXT", c))
            .collect::<Vec<_>>()
            .join(", ")
    );
    conn.execute(&ddl, []).unwrap();
    let placeholders = vec!["?"; cols.len()].join(", ");
    let insert = format!("INSERT INTO \"CIN_2009-2019\" VALUES ({})", placeholders);
    for r in rows {
        let cells: Vec<Option<&str>> = r
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.as_str()) })
            .collect();
        conn.execute(&insert, rusqlite::params_from_iter(cells)).unwrap();
    }
    drop(conn);
    path
}
