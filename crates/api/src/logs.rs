use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, State},
    routing::post,
    Json, Router,
};
use ledger::{service::logs::ManualEntry, Ledger};
use log::info;
use model::log::EntryType;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    params::{parse_id, parse_opt_date},
    view::LogView,
};

const FILE_FIELD: &str = "file";

pub fn routes() -> Router<Ledger> {
    Router::new()
        .route("/log/manual", post(log_manual))
        .route("/log/csv/{dept_id}", post(upload_csv))
}

#[derive(Deserialize)]
pub struct ManualLogRequest {
    pub dept_id: String,
    pub category: String,
    pub activity: String,
    pub value: f64,
    #[serde(default)]
    pub entry_type: Option<EntryType>,
    #[serde(default)]
    pub activity_date: Option<String>,
}

impl ManualLogRequest {
    fn into_entry(self) -> Result<ManualEntry, ApiError> {
        Ok(ManualEntry {
            dept_id: parse_id(&self.dept_id)?,
            activity_date: parse_opt_date(self.activity_date.as_deref(), "activity_date")?,
            category: self.category,
            activity: self.activity,
            value: self.value,
            entry_type: self.entry_type.unwrap_or_default(),
        })
    }
}

#[derive(Serialize)]
pub struct ManualLogResponse {
    status: &'static str,
    data: LogView,
    co2e_kg: f64,
}

#[derive(Serialize)]
pub struct CsvUploadResponse {
    status: &'static str,
    rows_processed: usize,
}

async fn log_manual(
    State(ledger): State<Ledger>,
    payload: Result<Json<ManualLogRequest>, JsonRejection>,
) -> ApiResult<Json<ManualLogResponse>> {
    let Json(req) = payload?;
    let entry = req.into_entry()?;
    let mut session = ledger.db.start_session().await?;
    let log = ledger.logs.log_manual(&mut session, entry).await?;
    Ok(Json(ManualLogResponse {
        status: "success",
        co2e_kg: log.co2e_kg,
        data: log.into(),
    }))
}

async fn upload_csv(
    State(ledger): State<Ledger>,
    Path(dept_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<CsvUploadResponse>> {
    let dept_id = parse_id(&dept_id)?;
    let mut multipart = multipart?;

    let mut content = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            info!(
                "CSV upload for department {}: {}",
                dept_id,
                field.file_name().unwrap_or("<unnamed>")
            );
            content = Some(field.text().await?);
            break;
        }
    }
    let content = content
        .ok_or_else(|| ApiError::bad_request(format!("Missing multipart field '{}'", FILE_FIELD)))?;

    let mut session = ledger.db.start_session().await?;
    let rows_processed = ledger
        .logs
        .ingest_csv(&mut session, dept_id, &content)
        .await?;
    Ok(Json(CsvUploadResponse {
        status: "success",
        rows_processed,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use bson::oid::ObjectId;
    use chrono::NaiveDate;

    use super::*;

    fn request(body: serde_json::Value) -> ManualLogRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_manual_entry_defaults() {
        let dept_id = ObjectId::new();
        let entry = request(serde_json::json!({
            "dept_id": dept_id.to_hex(),
            "category": "Energy",
            "activity": "Grid Electricity",
            "value": 1000,
        }))
        .into_entry()
        .unwrap();
        assert_eq!(entry.dept_id, dept_id);
        assert_eq!(entry.entry_type, EntryType::Manual);
        assert_eq!(entry.activity_date, None);
        assert_eq!(entry.value, 1000.0);
    }

    #[test]
    fn test_manual_entry_date() {
        let entry = request(serde_json::json!({
            "dept_id": ObjectId::new().to_hex(),
            "category": "Transport",
            "activity": "Petrol",
            "value": -3.5,
            "entry_type": "csv",
            "activity_date": "15/03/2024",
        }))
        .into_entry()
        .unwrap();
        assert_eq!(entry.entry_type, EntryType::Csv);
        assert_eq!(entry.activity_date, NaiveDate::from_ymd_opt(2024, 3, 15));

        let err = request(serde_json::json!({
            "dept_id": ObjectId::new().to_hex(),
            "category": "Transport",
            "activity": "Petrol",
            "value": 1,
            "activity_date": "March",
        }))
        .into_entry()
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upload_response_shape() {
        let json = serde_json::to_value(CsvUploadResponse {
            status: "success",
            rows_processed: 1,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "rows_processed": 1}));
    }
}
