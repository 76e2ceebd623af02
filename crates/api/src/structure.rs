use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use ledger::Ledger;
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    params::parse_id,
    view::{success, BranchView, DepartmentView, ListItem, OrganizationView, Success},
};

pub fn routes() -> Router<Ledger> {
    Router::new()
        .route("/organizations", post(create_organization).get(organizations))
        .route("/branches", post(create_branch))
        .route("/branches/{org_id}", get(branches))
        .route("/departments", post(create_department))
        .route("/departments/{branch_id}", get(departments))
}

#[derive(Deserialize)]
pub struct CreateOrganization {
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateBranch {
    pub org_id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateDepartment {
    pub branch_id: String,
    pub name: String,
}

fn required_name(name: String) -> Result<String, ApiError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        Err(ApiError::bad_request("name must not be empty"))
    } else {
        Ok(name)
    }
}

async fn create_organization(
    State(ledger): State<Ledger>,
    payload: Result<Json<CreateOrganization>, JsonRejection>,
) -> ApiResult<Json<Success<OrganizationView>>> {
    let Json(req) = payload?;
    let name = required_name(req.name)?;
    let mut session = ledger.db.start_session().await?;
    let org = ledger
        .structure
        .create_organization(&mut session, name)
        .await?;
    Ok(success(org.into()))
}

async fn create_branch(
    State(ledger): State<Ledger>,
    payload: Result<Json<CreateBranch>, JsonRejection>,
) -> ApiResult<Json<Success<BranchView>>> {
    let Json(req) = payload?;
    let org_id = parse_id(&req.org_id)?;
    let name = required_name(req.name)?;
    let location = req.location.map(|location| location.trim().to_string());
    let mut session = ledger.db.start_session().await?;
    let branch = ledger
        .structure
        .create_branch(&mut session, org_id, name, location)
        .await?;
    Ok(success(branch.into()))
}

async fn create_department(
    State(ledger): State<Ledger>,
    payload: Result<Json<CreateDepartment>, JsonRejection>,
) -> ApiResult<Json<Success<DepartmentView>>> {
    let Json(req) = payload?;
    let branch_id = parse_id(&req.branch_id)?;
    let name = required_name(req.name)?;
    let mut session = ledger.db.start_session().await?;
    let dept = ledger
        .structure
        .create_department(&mut session, branch_id, name)
        .await?;
    Ok(success(dept.into()))
}

async fn organizations(State(ledger): State<Ledger>) -> ApiResult<Json<Success<Vec<ListItem>>>> {
    let mut session = ledger.db.start_session().await?;
    let orgs = ledger.structure.organizations(&mut session).await?;
    Ok(success(orgs.into_iter().map(ListItem::from).collect()))
}

async fn branches(
    State(ledger): State<Ledger>,
    Path(org_id): Path<String>,
) -> ApiResult<Json<Success<Vec<ListItem>>>> {
    let org_id = parse_id(&org_id)?;
    let mut session = ledger.db.start_session().await?;
    let branches = ledger.structure.branches(&mut session, org_id).await?;
    Ok(success(branches.into_iter().map(ListItem::from).collect()))
}

async fn departments(
    State(ledger): State<Ledger>,
    Path(branch_id): Path<String>,
) -> ApiResult<Json<Success<Vec<ListItem>>>> {
    let branch_id = parse_id(&branch_id)?;
    let mut session = ledger.db.start_session().await?;
    let depts = ledger.structure.departments(&mut session, branch_id).await?;
    Ok(success(depts.into_iter().map(ListItem::from).collect()))
}
