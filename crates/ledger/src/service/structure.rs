use bson::oid::ObjectId;
use log::info;
use model::{
    branch::Branch, department::Department, errors::LedgerError, organization::Organization,
    session::Session,
};
use storage::{branch::BranchStore, department::DepartmentStore, organization::OrganizationStore};

/// Organizations, their branches and the branches' departments.
#[derive(Clone)]
pub struct Structure {
    organizations: OrganizationStore,
    branches: BranchStore,
    departments: DepartmentStore,
}

impl Structure {
    pub fn new(
        organizations: OrganizationStore,
        branches: BranchStore,
        departments: DepartmentStore,
    ) -> Self {
        Structure {
            organizations,
            branches,
            departments,
        }
    }

    pub async fn create_organization(
        &self,
        session: &mut Session,
        name: String,
    ) -> Result<Organization, LedgerError> {
        let org = Organization::new(name);
        self.organizations.insert(session, &org).await?;
        info!("organization created: {} ({})", org.name, org.id);
        Ok(org)
    }

    pub async fn create_branch(
        &self,
        session: &mut Session,
        org_id: ObjectId,
        name: String,
        location: Option<String>,
    ) -> Result<Branch, LedgerError> {
        if self.organizations.get(session, org_id).await?.is_none() {
            return Err(LedgerError::OrganizationNotFound(org_id));
        }
        let branch = Branch::new(org_id, name, location);
        self.branches.insert(session, &branch).await?;
        info!("branch created: {} ({})", branch.name, branch.id);
        Ok(branch)
    }

    pub async fn create_department(
        &self,
        session: &mut Session,
        branch_id: ObjectId,
        name: String,
    ) -> Result<Department, LedgerError> {
        if self.branches.get(session, branch_id).await?.is_none() {
            return Err(LedgerError::BranchNotFound(branch_id));
        }
        let dept = Department::new(branch_id, name);
        self.departments.insert(session, &dept).await?;
        info!("department created: {} ({})", dept.name, dept.id);
        Ok(dept)
    }

    pub async fn organizations(
        &self,
        session: &mut Session,
    ) -> Result<Vec<Organization>, LedgerError> {
        Ok(self.organizations.list(session).await?)
    }

    pub async fn branches(
        &self,
        session: &mut Session,
        org_id: ObjectId,
    ) -> Result<Vec<Branch>, LedgerError> {
        Ok(self.branches.by_org(session, org_id).await?)
    }

    pub async fn departments(
        &self,
        session: &mut Session,
        branch_id: ObjectId,
    ) -> Result<Vec<Department>, LedgerError> {
        Ok(self.departments.by_branch(session, branch_id).await?)
    }

    pub async fn department(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Department, LedgerError> {
        self.departments
            .get(session, id)
            .await?
            .ok_or(LedgerError::DepartmentNotFound(id))
    }
}
