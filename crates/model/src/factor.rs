use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// kg CO2e emitted per unit of `activity`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmissionFactor {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub category: String,
    pub activity: String,
    pub factor: f64,
    pub unit: String,
    pub source: String,
}

impl EmissionFactor {
    pub fn new(category: &str, activity: &str, factor: f64, unit: &str, source: &str) -> Self {
        EmissionFactor {
            id: ObjectId::new(),
            category: category.to_string(),
            activity: activity.to_string(),
            factor,
            unit: unit.to_string(),
            source: source.to_string(),
        }
    }

    /// No bounds checking: zero and negative values produce zero and negative emissions.
    pub fn apply(&self, value: f64) -> Co2e {
        Co2e {
            co2e_kg: value * self.factor,
            factor_id: self.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2e {
    pub co2e_kg: f64,
    pub factor_id: ObjectId,
}
