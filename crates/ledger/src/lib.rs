use ai::Ai;
use service::{
    analytics::Analytics, factors::Factors, logs::Logs, recommendations::Recommendations,
    structure::Structure,
};
use storage::{session::Db, Storage};

pub mod service;

#[derive(Clone)]
pub struct Ledger {
    pub db: Db,
    pub structure: Structure,
    pub factors: Factors,
    pub logs: Logs,
    pub analytics: Analytics,
    pub recommendations: Recommendations,
}

impl Ledger {
    pub fn new(storage: Storage, ai: Ai) -> Self {
        let structure = Structure::new(
            storage.organizations,
            storage.branches,
            storage.departments,
        );
        let factors = Factors::new(storage.factors);
        let logs = Logs::new(storage.logs.clone(), structure.clone(), factors.clone());
        let analytics = Analytics::new(storage.logs);
        let recommendations = Recommendations::new(analytics.clone(), ai);
        Ledger {
            db: storage.db,
            structure,
            factors,
            logs,
            analytics,
            recommendations,
        }
    }
}
