use axum::{extract::State, routing::get, Json, Router};
use ledger::Ledger;

use crate::{
    error::ApiResult,
    view::{success, FactorView, Success},
};

pub fn routes() -> Router<Ledger> {
    Router::new().route("/factors", get(factors))
}

async fn factors(State(ledger): State<Ledger>) -> ApiResult<Json<Success<Vec<FactorView>>>> {
    let mut session = ledger.db.start_session().await?;
    let factors = ledger.factors.list(&mut session).await?;
    Ok(success(factors.into_iter().map(FactorView::from).collect()))
}
