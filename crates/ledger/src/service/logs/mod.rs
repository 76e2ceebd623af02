pub(crate) mod ingest;

use bson::oid::ObjectId;
use chrono::{Local, NaiveDate};
use log::info;
use model::{
    errors::LedgerError,
    log::{EmissionLog, EntryType},
    session::Session,
};
use storage::logs::LogStore;

use super::{factors::Factors, structure::Structure};
use ingest::{build_logs, distinct_keys, parse_rows, FactorTable};

/// A single activity reading entered by hand.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub dept_id: ObjectId,
    pub category: String,
    pub activity: String,
    pub value: f64,
    pub entry_type: EntryType,
    pub activity_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct Logs {
    store: LogStore,
    structure: Structure,
    factors: Factors,
}

impl Logs {
    pub fn new(store: LogStore, structure: Structure, factors: Factors) -> Self {
        Logs {
            store,
            structure,
            factors,
        }
    }

    pub async fn log_manual(
        &self,
        session: &mut Session,
        entry: ManualEntry,
    ) -> Result<EmissionLog, LedgerError> {
        self.structure.department(session, entry.dept_id).await?;
        let co2e = self
            .factors
            .calculate_co2e(session, &entry.category, &entry.activity, entry.value)
            .await?;
        let log = EmissionLog::new(
            entry.dept_id,
            entry.value,
            co2e,
            entry.entry_type,
            entry.activity_date.unwrap_or_else(today),
        );
        self.store.insert(session, &log).await?;
        info!(
            "Logged {} {} - {}: {:.2} kg CO2e",
            entry.entry_type, entry.category, entry.activity, log.co2e_kg
        );
        Ok(log)
    }

    /// Converts every usable row of `content` into a log of the department and
    /// writes them in one batch. Returns the number of logs written.
    pub async fn ingest_csv(
        &self,
        session: &mut Session,
        dept_id: ObjectId,
        content: &str,
    ) -> Result<usize, LedgerError> {
        self.structure.department(session, dept_id).await?;

        let rows = parse_rows(content, today());
        let mut factors = FactorTable::new();
        for key in distinct_keys(&rows) {
            let factor = self.factors.find(session, &key.0, &key.1).await?;
            factors.insert(key, factor);
        }

        let logs = build_logs(dept_id, &rows, &factors);
        if logs.is_empty() {
            info!("CSV for department {} produced no logs", dept_id);
            return Ok(0);
        }
        self.store.insert_many(session, &logs).await?;
        info!("CSV for department {}: {} logs written", dept_id, logs.len());
        Ok(logs.len())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
