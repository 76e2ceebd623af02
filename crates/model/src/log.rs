use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::factor::Co2e;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryType {
    #[default]
    Manual,
    Csv,
}

/// One emission entry. `co2e_kg` is fixed when the entry is built and never
/// recomputed, later factor changes leave it untouched.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmissionLog {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub dept_id: ObjectId,
    pub factor_id: ObjectId,
    pub value: f64,
    pub co2e_kg: f64,
    pub entry_type: EntryType,
    pub activity_date: NaiveDate,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl EmissionLog {
    pub fn new(
        dept_id: ObjectId,
        value: f64,
        co2e: Co2e,
        entry_type: EntryType,
        activity_date: NaiveDate,
    ) -> Self {
        EmissionLog {
            id: ObjectId::new(),
            dept_id,
            factor_id: co2e.factor_id,
            value,
            co2e_kg: co2e.co2e_kg,
            entry_type,
            activity_date,
            created_at: Utc::now(),
        }
    }
}
