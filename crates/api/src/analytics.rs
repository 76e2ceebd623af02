use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use ledger::Ledger;
use model::statistics::emissions::{CategoryTotal, DepartmentTotal, EmissionTotal, TimeBucket};

use crate::{
    error::ApiResult,
    params::{parse_scope, TimeQuery},
    view::{success, Success},
};

pub fn routes() -> Router<Ledger> {
    Router::new()
        .route("/analytics/{level}/{id}/total", get(total))
        .route("/analytics/{level}/{id}/by-time", get(by_time))
        .route("/analytics/{level}/{id}/by-category", get(by_category))
        .route("/analytics/{level}/{id}/by-department", get(by_department))
}

async fn total(
    State(ledger): State<Ledger>,
    Path((level, id)): Path<(String, String)>,
) -> ApiResult<Json<Success<Vec<EmissionTotal>>>> {
    let scope = parse_scope(&level, &id)?;
    let mut session = ledger.db.start_session().await?;
    Ok(success(ledger.analytics.total(&mut session, scope).await?))
}

async fn by_time(
    State(ledger): State<Ledger>,
    Path((level, id)): Path<(String, String)>,
    query: Result<Query<TimeQuery>, QueryRejection>,
) -> ApiResult<Json<Success<Vec<TimeBucket>>>> {
    let scope = parse_scope(&level, &id)?;
    let Query(query) = query?;
    let period = query.period()?;
    let (from, to) = query.range()?;
    let mut session = ledger.db.start_session().await?;
    let buckets = ledger
        .analytics
        .by_time(&mut session, scope, period, from, to)
        .await?;
    Ok(success(buckets))
}

async fn by_category(
    State(ledger): State<Ledger>,
    Path((level, id)): Path<(String, String)>,
) -> ApiResult<Json<Success<Vec<CategoryTotal>>>> {
    let scope = parse_scope(&level, &id)?;
    let mut session = ledger.db.start_session().await?;
    Ok(success(ledger.analytics.by_category(&mut session, scope).await?))
}

async fn by_department(
    State(ledger): State<Ledger>,
    Path((level, id)): Path<(String, String)>,
) -> ApiResult<Json<Success<Vec<DepartmentTotal>>>> {
    let scope = parse_scope(&level, &id)?;
    let mut session = ledger.db.start_session().await?;
    Ok(success(ledger.analytics.by_department(&mut session, scope).await?))
}
