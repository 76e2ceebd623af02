use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Branch {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub org_id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Branch {
    pub fn new(org_id: ObjectId, name: String, location: Option<String>) -> Self {
        Branch {
            id: ObjectId::new(),
            org_id,
            name,
            location: location.filter(|location| !location.is_empty()),
            created_at: Utc::now(),
        }
    }
}
