use crate::error::{PipelineError, Result};
use crate::schema::{LA_CODE, REGION};
use crate::table::{Table, Value};
use tracing::{debug, warn};

/// The rows of one region, with `LA_Code` removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalTable {
    /// Identifier form of the region name, e.g. `eastmidlands`.
    pub id: String,
    /// Region name as it appears in the source.
    pub name: String,
    pub table: Table,
}

/// `"Yorkshire and the Humber"` -> `"yorkshireandthehumber"`.
pub fn region_id(name: &str) -> String {
    name.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split the national table by the distinct `Region` values it contains.
///
/// Regions come out in the order they are first seen. Rows without a region
/// belong to no partition and are only counted in a warning. Two spellings
/// that map to one identifier are an error.
pub fn partition_by_region(table: &Table) -> Result<Vec<RegionalTable>> {
    let region_idx = table.require_columns(&[REGION])?[0];

    let mut names: Vec<String> = Vec::new();
    let mut unassigned = 0usize;
    for row in table.rows() {
        match row[region_idx].as_text() {
            Some(name) if !names.iter().any(|n| n == name) => {
                let id = region_id(name);
                if let Some(first) = names.iter().find(|n| region_id(n) == id) {
                    return Err(PipelineError::RegionId {
                        id,
                        first: first.clone(),
                        second: name.to_string(),
                    });
                }
                names.push(name.to_string());
            }
            Some(_) => {}
            None => unassigned += 1,
        }
    }
    if unassigned > 0 {
        warn!(rows = unassigned, "rows without a region excluded from regional tables");
    }

    let trimmed = table.without_columns(&[LA_CODE]);
    let region_idx = trimmed.require_columns(&[REGION])?[0];
    let regions = names
        .into_iter()
        .map(|name| {
            let sub = trimmed.filter_rows(|r| matches!(&r[region_idx], Value::Text(s) if *s == name));
            debug!(region = %name, rows = sub.len(), "partitioned");
            RegionalTable {
                id: region_id(&name),
                name,
                table: sub,
            }
        })
        .collect();
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn national() -> Table {
        let mut t = Table::new(["LA", "LA_Code", "Region", "2019_count"]);
        t.push_row(vec!["Derby".into(), "E06000015".into(), "East Midlands".into(), Value::Number(10.0)]);
        t.push_row(vec!["Camden".into(), "E09000007".into(), "London".into(), Value::Number(20.0)]);
        t.push_row(vec!["Rutland".into(), "E06000017".into(), "East Midlands".into(), Value::Number(5.0)]);
        t.push_row(vec!["Nowhere".into(), "E99999999".into(), Value::Missing, Value::Number(1.0)]);
        t.push_row(vec!["Isles".into(), "E06000053".into(), "Isles of Scilly".into(), Value::Number(0.0)]);
        t
    }

    #[test]
    fn ids_are_lowercase_without_spaces() {
        assert_eq!(region_id("Yorkshire and the Humber"), "yorkshireandthehumber");
        assert_eq!(region_id("East of England"), "eastofengland");
    }

    #[test]
    fn every_observed_region_gets_a_table() {
        let parts = partition_by_region(&national()).unwrap();
        let ids: Vec<&str> = parts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["eastmidlands", "london", "islesofscilly"]);

        let em = &parts[0];
        assert_eq!(em.name, "East Midlands");
        assert_eq!(em.table.len(), 2);
        assert_eq!(em.table.cell(1, "LA"), Some(&Value::Text("Rutland".into())));
        assert!(em.table.column_index("LA_Code").is_none());
    }

    #[test]
    fn rows_without_region_are_excluded() {
        let parts = partition_by_region(&national()).unwrap();
        let total: usize = parts.iter().map(|p| p.table.len()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn spellings_sharing_an_id_are_rejected() {
        let mut t = national();
        t.push_row(vec!["Durham".into(), "E06000047".into(), "east midlands".into(), Value::Number(3.0)]);
        match partition_by_region(&t) {
            Err(PipelineError::RegionId { id, first, second }) => {
                assert_eq!(id, "eastmidlands");
                assert_eq!(first, "East Midlands");
                assert_eq!(second, "east midlands");
            }
            other => panic!("expected region id error, got {:?}", other.map(|p| p.len())),
        }
    }
}
