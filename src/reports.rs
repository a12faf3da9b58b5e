// Display rows for the console previews and the regional means export.
use crate::aggregate::RegionalMeans;
use crate::schema::Metric;
use crate::types::{Ranked, RankingRow, RegionMeanRow};
use crate::util::{format_number, format_opt};

pub fn ranking_rows(column: &str, ranked: &[Ranked]) -> Vec<RankingRow> {
    ranked
        .iter()
        .map(|r| RankingRow {
            la: r.la.clone(),
            metric: column.to_string(),
            value: format_number(r.value, 2),
        })
        .collect()
}

/// One row per region, highest mean count first.
pub fn region_mean_rows(means: &RegionalMeans) -> Vec<RegionMeanRow> {
    let find = |metric: Metric| {
        means
            .metrics
            .iter()
            .find(|m| m.ends_with(metric.suffix()))
            .cloned()
    };
    let (Some(count_col), rate_col) = (find(Metric::Count), find(Metric::Rate)) else {
        return Vec::new();
    };
    means
        .sorted_desc(&count_col)
        .unwrap_or_default()
        .into_iter()
        .map(|(region, mean_count)| RegionMeanRow {
            region: region.to_string(),
            mean_count: format_opt(mean_count, 2),
            mean_rate: format_opt(
                rate_col.as_deref().and_then(|c| means.mean(region, c)),
                2,
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::RegionMean;

    #[test]
    fn region_rows_follow_count_order() {
        let means = RegionalMeans {
            metrics: vec!["2019_count".into(), "2019_rate".into()],
            groups: vec![
                RegionMean {
                    region: "London".into(),
                    means: vec![Some(1200.0), Some(350.457)],
                },
                RegionMean {
                    region: "North East".into(),
                    means: vec![Some(2500.0), None],
                },
            ],
        };
        let rows = region_mean_rows(&means);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region, "North East");
        assert_eq!(rows[0].mean_count, "2,500.00");
        assert_eq!(rows[0].mean_rate, "");
        assert_eq!(rows[1].mean_rate, "350.46");
    }

    #[test]
    fn ranking_rows_carry_the_column_name() {
        let rows = ranking_rows(
            "2019_rate",
            &[Ranked {
                la: "Blackpool".into(),
                value: 1045.2,
            }],
        );
        assert_eq!(rows[0].metric, "2019_rate");
        assert_eq!(rows[0].value, "1,045.20");
    }
}
