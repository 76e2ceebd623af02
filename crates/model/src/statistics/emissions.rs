use bson::{oid::ObjectId, Bson};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::parse_iso_date;

/// A log joined with its department and factor, as fetched for aggregation.
#[derive(Debug, Deserialize, Clone)]
pub struct LogRow {
    pub dept_id: ObjectId,
    #[serde(default)]
    pub dept_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub co2e_kg: f64,
    #[serde(default)]
    pub activity_date: Option<Bson>,
}

impl LogRow {
    /// Only ISO `YYYY-MM-DD` strings count, the form logs are stored in and
    /// the date range `$match` compares against. Anything else is undated.
    pub fn activity_date(&self) -> Option<NaiveDate> {
        match self.activity_date.as_ref()? {
            Bson::String(value) => parse_iso_date(value),
            _ => None,
        }
    }
}

/// Database-side rollup row, returned to clients as is.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmissionTotal {
    pub total_emissions: f64,
    pub entries: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TimeBucket {
    pub period: String,
    pub start: NaiveDate,
    pub total_emissions: f64,
    pub entries: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total_emissions: f64,
    pub entries: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DepartmentTotal {
    #[serde(serialize_with = "bson::serde_helpers::serialize_object_id_as_hex_string")]
    pub dept_id: ObjectId,
    pub dept_name: String,
    pub total_emissions: f64,
    pub entries: u32,
}
