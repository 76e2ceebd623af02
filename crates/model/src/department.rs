use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Department {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub branch_id: ObjectId,
    pub name: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Department {
    pub fn new(branch_id: ObjectId, name: String) -> Self {
        Department {
            id: ObjectId::new(),
            branch_id,
            name,
            created_at: Utc::now(),
        }
    }
}
