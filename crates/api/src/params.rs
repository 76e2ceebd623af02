use bson::oid::ObjectId;
use chrono::NaiveDate;
use ledger::service::analytics::check_range;
use model::{date::parse_date, scope::Scope, statistics::period::Period};
use serde::Deserialize;

use crate::error::ApiError;

pub fn parse_id(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value.trim())
        .map_err(|_| ApiError::bad_request(format!("Invalid id: {}", value)))
}

/// Blank values count as absent.
pub fn parse_opt_date(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, ApiError> {
    non_blank(value)
        .map(|value| {
            parse_date(value)
                .ok_or_else(|| ApiError::bad_request(format!("Invalid {}: {}", name, value)))
        })
        .transpose()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// `/analytics/{level}/{id}`
pub fn parse_scope(level: &str, id: &str) -> Result<Scope, ApiError> {
    let id = parse_id(id)?;
    match level {
        "org" | "organization" => Ok(Scope::Organization(id)),
        "branch" => Ok(Scope::Branch(id)),
        "department" | "dept" => Ok(Scope::Department(id)),
        _ => Err(ApiError::bad_request(format!("Unknown scope: {}", level))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TimeQuery {
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TimeQuery {
    pub fn period(&self) -> Result<Period, ApiError> {
        match non_blank(self.period.as_deref()) {
            Some(period) => period
                .to_lowercase()
                .parse()
                .map_err(|_| ApiError::bad_request(format!("Invalid period: {}", period))),
            None => Ok(Period::default()),
        }
    }

    pub fn range(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
        date_range(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub org_id: Option<String>,
    pub branch_id: Option<String>,
    pub dept_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RecommendationQuery {
    /// Department wins over branch, branch over organization. Only the winning id is parsed.
    pub fn scope(&self) -> Result<Scope, ApiError> {
        if let Some(id) = non_blank(self.dept_id.as_deref()) {
            return Ok(Scope::Department(parse_id(id)?));
        }
        if let Some(id) = non_blank(self.branch_id.as_deref()) {
            return Ok(Scope::Branch(parse_id(id)?));
        }
        if let Some(id) = non_blank(self.org_id.as_deref()) {
            return Ok(Scope::Organization(parse_id(id)?));
        }
        Err(ApiError::bad_request(
            "One of org_id, branch_id or dept_id is required",
        ))
    }

    pub fn range(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
        date_range(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

fn date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
    let from = parse_opt_date(start, "start_date")?;
    let to = parse_opt_date(end, "end_date")?;
    check_range(from, to)?;
    Ok((from, to))
}
