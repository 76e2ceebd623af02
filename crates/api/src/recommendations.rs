use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use ledger::{service::recommendations::RecommendationReport, Ledger};

use crate::{
    error::ApiResult,
    params::RecommendationQuery,
    view::{success, Success},
};

pub fn routes() -> Router<Ledger> {
    Router::new().route("/recommendations", get(recommendations))
}

async fn recommendations(
    State(ledger): State<Ledger>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> ApiResult<Json<Success<RecommendationReport>>> {
    let Query(query) = query?;
    let scope = query.scope()?;
    let (from, to) = query.range()?;
    let mut session = ledger.db.start_session().await?;
    let report = ledger
        .recommendations
        .generate(&mut session, scope, from, to)
        .await?;
    Ok(success(report))
}
