use std::collections::HashMap;

use bson::oid::ObjectId;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::warn;
use model::{
    date::parse_date,
    factor::EmissionFactor,
    log::{EmissionLog, EntryType},
};
use serde::Deserialize;

/// (category, activity)
pub(crate) type FactorKey = (String, String);
/// Lookup results per distinct pair; `None` marks a pair with no factor.
pub(crate) type FactorTable = HashMap<FactorKey, Option<EmissionFactor>>;

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    activity: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    activity_date: Option<String>,
}

impl Record {
    fn into_row(self, line: u64, today: NaiveDate) -> Result<ActivityRow, String> {
        let category = non_empty(self.category).ok_or("missing category")?;
        let activity = non_empty(self.activity).ok_or("missing activity")?;
        let raw_value = non_empty(self.value).ok_or("missing value")?;
        let value = raw_value
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| format!("invalid value '{}'", raw_value))?;
        let activity_date = self
            .activity_date
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(today);

        Ok(ActivityRow {
            line,
            category,
            activity,
            value,
            activity_date,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// A CSV row that passed column and value checks, not yet priced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ActivityRow {
    pub line: u64,
    pub category: String,
    pub activity: String,
    pub value: f64,
    pub activity_date: NaiveDate,
}

impl ActivityRow {
    pub fn key(&self) -> FactorKey {
        (self.category.clone(), self.activity.clone())
    }
}

/// Reads rows with `category`, `activity`, `value` and an optional
/// `activity_date` column. Cells are trimmed, extra columns ignored.
/// Broken rows are logged and dropped. Missing or unparseable dates fall back to `today`.
pub(crate) fn parse_rows(content: &str, today: NaiveDate) -> Vec<ActivityRow> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            warn!("Unreadable CSV header: {}", err);
            return vec![];
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record: StringRecord = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("Skipping unreadable CSV row: {}", err);
                continue;
            }
        };
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let parsed = record
            .deserialize::<Record>(Some(&headers))
            .map_err(|err| err.to_string())
            .and_then(|rec| rec.into_row(line, today));
        match parsed {
            Ok(row) => rows.push(row),
            Err(reason) => warn!("Skipping CSV line {}: {}", line, reason),
        }
    }
    rows
}

/// Distinct pairs in first-seen order, so each factor is looked up once.
pub(crate) fn distinct_keys(rows: &[ActivityRow]) -> Vec<FactorKey> {
    let mut keys = Vec::new();
    for row in rows {
        let key = row.key();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Prices every row whose pair has a factor; the rest are logged and dropped.
pub(crate) fn build_logs(
    dept_id: ObjectId,
    rows: &[ActivityRow],
    factors: &FactorTable,
) -> Vec<EmissionLog> {
    rows.iter()
        .filter_map(|row| match factors.get(&row.key()).and_then(Option::as_ref) {
            Some(factor) => Some(EmissionLog::new(
                dept_id,
                row.value,
                factor.apply(row.value),
                EntryType::Csv,
                row.activity_date,
            )),
            None => {
                warn!(
                    "Skipping CSV line {}: no factor found for {} - {}",
                    row.line, row.category, row.activity
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn table(factors: &[EmissionFactor]) -> FactorTable {
        factors
            .iter()
            .map(|f| ((f.category.clone(), f.activity.clone()), Some(f.clone())))
            .collect()
    }

    #[test]
    fn test_parse_rows() {
        let content = "category, activity ,value,activity_date,note\n\
                       Energy , Grid Electricity, 1000 ,2024-03-15,meter A\n\
                       Transport,Petrol,50,15/03/2024,\n\
                       Waste,General Landfill,12.5,,\n";
        let rows = parse_rows(content, today());
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].category, "Energy");
        assert_eq!(rows[0].activity, "Grid Electricity");
        assert_eq!(rows[0].value, 1000.0);
        assert_eq!(rows[0].activity_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(rows[1].activity_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(rows[2].activity_date, today());
    }

    #[test]
    fn test_parse_rows_skips_broken_rows() {
        let content = "category,activity,value,activity_date\n\
                       Energy,Grid Electricity,lots,2024-03-15\n\
                       Energy,,10,2024-03-15\n\
                       Energy,Grid Electricity\n\
                       Energy,Grid Electricity,-5,someday\n";
        let rows = parse_rows(content, today());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, -5.0);
        assert_eq!(rows[0].activity_date, today());
    }

    #[test]
    fn test_parse_rows_without_date_column() {
        let rows = parse_rows("category,activity,value\nTransport,Petrol,50\n", today());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].activity_date, today());

        assert!(parse_rows("activity,value\nPetrol,50\n", today()).is_empty());
        assert!(parse_rows("", today()).is_empty());
    }

    #[test]
    fn test_distinct_keys() {
        let content = "category,activity,value\n\
                       Transport,Petrol,50\n\
                       Energy,Grid Electricity,10\n\
                       Transport,Petrol,20\n";
        let keys = distinct_keys(&parse_rows(content, today()));
        assert_eq!(
            keys,
            vec![
                ("Transport".to_string(), "Petrol".to_string()),
                ("Energy".to_string(), "Grid Electricity".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_pairs_are_skipped() {
        let petrol = EmissionFactor::new("Transport", "Petrol", 2.31, "Litre", "EPA Hub 2025");
        let rows = parse_rows("category,activity,value\nTransport,Petrol,50\nBogus,X,10\n", today());
        let mut factors = table(&[petrol.clone()]);
        factors.insert(("Bogus".to_string(), "X".to_string()), None);

        let dept_id = ObjectId::new();
        let logs = build_logs(dept_id, &rows, &factors);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].dept_id, dept_id);
        assert_eq!(logs[0].factor_id, petrol.id);
        assert_eq!(logs[0].entry_type, EntryType::Csv);
        assert!((logs[0].co2e_kg - 115.5).abs() < 1e-9);
    }

    #[test]
    fn test_known_rows_minus_unknown_rows() {
        let grid = EmissionFactor::new("Energy", "Grid Electricity", 0.757, "kWh", "CEA India v20");
        let petrol = EmissionFactor::new("Transport", "Petrol", 2.31, "Litre", "EPA Hub 2025");
        let content = "category,activity,value\n\
                       Energy,Grid Electricity,1000\n\
                       Bogus,X,1\n\
                       Transport,Petrol,50\n\
                       Energy,Coal,3\n\
                       Energy,Grid Electricity,200\n\
                       transport,petrol,7\n";
        let rows = parse_rows(content, today());
        let n = rows.len();
        let factors = table(&[grid, petrol]);
        let k = rows
            .iter()
            .filter(|row| !factors.contains_key(&row.key()))
            .count();

        let logs = build_logs(ObjectId::new(), &rows, &factors);
        assert_eq!(n, 6);
        assert_eq!(k, 3);
        assert_eq!(logs.len(), n - k);
        let total: f64 = logs.iter().map(|log| log.co2e_kg).sum();
        assert!((total - (757.0 + 115.5 + 151.4)).abs() < 1e-9);
    }
}
