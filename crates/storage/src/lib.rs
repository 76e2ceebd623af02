pub mod branch;
pub mod department;
pub mod factor;
pub mod logs;
pub mod organization;
pub mod session;

use branch::BranchStore;
use department::DepartmentStore;
use eyre::Result;
use factor::FactorStore;
use log::info;
use logs::LogStore;
use organization::OrganizationStore;
use session::Db;

#[derive(Clone)]
pub struct Storage {
    pub db: Db,
    pub organizations: OrganizationStore,
    pub branches: BranchStore,
    pub departments: DepartmentStore,
    pub factors: FactorStore,
    pub logs: LogStore,
}

impl Storage {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        let db = Db::new(uri, db_name).await?;
        info!("preparing collections in {}", db_name);
        let organizations = OrganizationStore::new(&db).await?;
        let branches = BranchStore::new(&db).await?;
        let departments = DepartmentStore::new(&db).await?;
        let factors = FactorStore::new(&db).await?;
        let logs = LogStore::new(&db).await?;

        Ok(Storage {
            db,
            organizations,
            branches,
            departments,
            factors,
            logs,
        })
    }
}
