use bson::oid::ObjectId;
use bson::serde_helpers::serialize_object_id_as_hex_string;
use chrono::{DateTime, NaiveDate, Utc};
use model::{
    branch::Branch,
    department::Department,
    factor::EmissionFactor,
    log::{EmissionLog, EntryType},
    organization::Organization,
};
use serde::Serialize;

/// `{"status": "success", "data": ...}`
#[derive(Serialize)]
pub struct Success<T> {
    pub status: &'static str,
    pub data: T,
}

pub fn success<T: Serialize>(data: T) -> axum::Json<Success<T>> {
    axum::Json(Success {
        status: "success",
        data,
    })
}

#[derive(Serialize)]
pub struct OrganizationView {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationView {
    fn from(org: Organization) -> Self {
        OrganizationView {
            id: org.id,
            name: org.name,
            created_at: org.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct BranchView {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub org_id: ObjectId,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Branch> for BranchView {
    fn from(branch: Branch) -> Self {
        BranchView {
            id: branch.id,
            org_id: branch.org_id,
            name: branch.name,
            location: branch.location,
            created_at: branch.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct DepartmentView {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub branch_id: ObjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Department> for DepartmentView {
    fn from(dept: Department) -> Self {
        DepartmentView {
            id: dept.id,
            branch_id: dept.branch_id,
            name: dept.name,
            created_at: dept.created_at,
        }
    }
}

/// Listing row. Only branches carry a location.
#[derive(Serialize)]
pub struct ListItem {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
}

impl From<Organization> for ListItem {
    fn from(org: Organization) -> Self {
        ListItem {
            id: org.id,
            name: org.name,
            location: None,
        }
    }
}

impl From<Branch> for ListItem {
    fn from(branch: Branch) -> Self {
        ListItem {
            id: branch.id,
            name: branch.name,
            location: Some(branch.location),
        }
    }
}

impl From<Department> for ListItem {
    fn from(dept: Department) -> Self {
        ListItem {
            id: dept.id,
            name: dept.name,
            location: None,
        }
    }
}

#[derive(Serialize)]
pub struct LogView {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub dept_id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub factor_id: ObjectId,
    pub value: f64,
    pub co2e_kg: f64,
    pub entry_type: EntryType,
    pub activity_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<EmissionLog> for LogView {
    fn from(log: EmissionLog) -> Self {
        LogView {
            id: log.id,
            dept_id: log.dept_id,
            factor_id: log.factor_id,
            value: log.value,
            co2e_kg: log.co2e_kg,
            entry_type: log.entry_type,
            activity_date: log.activity_date,
            created_at: log.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct FactorView {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub category: String,
    pub activity: String,
    pub factor: f64,
    pub unit: String,
    pub source: String,
}

impl From<EmissionFactor> for FactorView {
    fn from(factor: EmissionFactor) -> Self {
        FactorView {
            id: factor.id,
            category: factor.category,
            activity: factor.activity,
            factor: factor.factor,
            unit: factor.unit,
            source: factor.source,
        }
    }
}
