use std::collections::{BTreeMap, HashMap};

use bson::oid::ObjectId;
use chrono::NaiveDate;
use model::statistics::{
    emissions::{CategoryTotal, DepartmentTotal, LogRow, TimeBucket},
    period::Period,
};

const UNKNOWN: &str = "Unknown";

/// Sums rows per period bucket, ascending by bucket start. Undated rows are left out.
pub fn by_time(rows: &[LogRow], period: Period) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for row in rows {
        let Some(date) = row.activity_date() else {
            continue;
        };
        let bucket = buckets.entry(period.bucket_start(date)).or_default();
        bucket.0 += row.co2e_kg;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(start, (total_emissions, entries))| TimeBucket {
            period: period.bucket_key(start),
            start,
            total_emissions,
            entries,
        })
        .collect()
}

/// Sums rows per factor category in order of first occurrence.
pub fn by_category(rows: &[LogRow]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for row in rows {
        let category = row.category.as_deref().unwrap_or(UNKNOWN);
        let idx = *index.entry(category).or_insert_with(|| {
            totals.push(CategoryTotal {
                category: category.to_string(),
                total_emissions: 0.0,
                entries: 0,
            });
            totals.len() - 1
        });
        totals[idx].total_emissions += row.co2e_kg;
        totals[idx].entries += 1;
    }
    totals
}

/// Sums rows per department, largest emitter first.
pub fn by_department(rows: &[LogRow]) -> Vec<DepartmentTotal> {
    let mut totals: HashMap<ObjectId, DepartmentTotal> = HashMap::new();
    for row in rows {
        let total = totals.entry(row.dept_id).or_insert_with(|| DepartmentTotal {
            dept_id: row.dept_id,
            dept_name: row.dept_name.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            total_emissions: 0.0,
            entries: 0,
        });
        total.total_emissions += row.co2e_kg;
        total.entries += 1;
    }

    let mut totals = totals.into_values().collect::<Vec<_>>();
    totals.sort_by(|a, b| {
        b.total_emissions
            .total_cmp(&a.total_emissions)
            .then_with(|| a.dept_name.cmp(&b.dept_name))
    });
    totals
}

#[cfg(test)]
mod tests {
    use bson::Bson;

    use super::*;

    fn row(dept: (ObjectId, &str), category: Option<&str>, co2e_kg: f64, date: Option<&str>) -> LogRow {
        LogRow {
            dept_id: dept.0,
            dept_name: Some(dept.1.to_string()),
            category: category.map(str::to_string),
            co2e_kg,
            activity_date: date.map(|d| Bson::String(d.to_string())),
        }
    }

    fn sample() -> Vec<LogRow> {
        let ops = (ObjectId::new(), "Operations");
        let fleet = (ObjectId::new(), "Fleet");
        let office = (ObjectId::new(), "Office");
        vec![
            row(ops, Some("Energy"), 757.0, Some("2024-01-03")),
            row(fleet, Some("Transport"), 115.5, Some("2024-01-08")),
            row(ops, Some("Energy"), 75.7, Some("2024-02-29")),
            row(office, Some("Waste"), 4.67, Some("2023-12-31")),
            row(fleet, None, 10.0, Some("2024-02-01")),
            row(office, Some("Transport"), 23.1, None),
            row(ops, Some("Water"), 3.44, Some("not a date")),
        ]
    }

    fn dated_sum(rows: &[LogRow]) -> f64 {
        rows.iter()
            .filter(|row| row.activity_date().is_some())
            .map(|row| row.co2e_kg)
            .sum()
    }

    #[test]
    fn test_by_time_month() {
        let buckets = by_time(&sample(), Period::Month);
        let keys = buckets.iter().map(|b| b.period.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["2023-12", "2024-01", "2024-02"]);
        assert!((buckets[1].total_emissions - 872.5).abs() < 1e-9);
        assert_eq!(buckets[1].entries, 2);
        assert_eq!(buckets[2].entries, 2);
    }

    #[test]
    fn test_by_time_week_is_monday_aligned() {
        let buckets = by_time(&sample(), Period::Week);
        let keys = buckets.iter().map(|b| b.period.as_str()).collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec!["2023-12-25", "2024-01-01", "2024-01-08", "2024-01-29", "2024-02-26"]
        );
    }

    #[test]
    fn test_bucket_sums_match_dated_rows() {
        let rows = sample();
        let expected = dated_sum(&rows);
        for period in [Period::Day, Period::Week, Period::Month, Period::Year] {
            let buckets = by_time(&rows, period);
            let total: f64 = buckets.iter().map(|b| b.total_emissions).sum();
            assert!((total - expected).abs() < 1e-9, "{}", period);
            let entries: u32 = buckets.iter().map(|b| b.entries).sum();
            assert_eq!(entries, 5);
            assert!(buckets.windows(2).all(|w| w[0].start < w[1].start));
        }
    }

    #[test]
    fn test_by_time_skips_non_iso_dates() {
        let dept = (ObjectId::new(), "Office");
        let rows = vec![
            row(dept, Some("Energy"), 10.0, Some("2024-03-05")),
            row(dept, Some("Energy"), 20.0, Some("05/03/2024")),
        ];
        let buckets = by_time(&rows, Period::Day);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total_emissions, 10.0);
        assert_eq!(buckets[0].entries, 1);
    }

    #[test]
    fn test_by_category() {
        let totals = by_category(&sample());
        let names = totals.iter().map(|t| t.category.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Energy", "Transport", "Waste", "Unknown", "Water"]);
        assert!((totals[0].total_emissions - 832.7).abs() < 1e-9);
        assert!((totals[1].total_emissions - 138.6).abs() < 1e-9);
        assert_eq!(totals[1].entries, 2);

        assert!(by_category(&[]).is_empty());
    }

    #[test]
    fn test_by_department_sorted_descending() {
        let totals = by_department(&sample());
        let names = totals.iter().map(|t| t.dept_name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Operations", "Fleet", "Office"]);
        assert!(totals
            .windows(2)
            .all(|w| w[0].total_emissions >= w[1].total_emissions));
        let total: f64 = totals.iter().map(|t| t.total_emissions).sum();
        let expected: f64 = sample().iter().map(|row| row.co2e_kg).sum();
        assert!((total - expected).abs() < 1e-9);
    }
}
