pub mod aggregation;

use chrono::NaiveDate;
use log::debug;
use model::{
    errors::LedgerError,
    scope::Scope,
    session::Session,
    statistics::{
        emissions::{CategoryTotal, DepartmentTotal, EmissionTotal, TimeBucket},
        period::Period,
    },
};
use storage::logs::LogStore;

#[derive(Clone)]
pub struct Analytics {
    logs: LogStore,
}

impl Analytics {
    pub fn new(logs: LogStore) -> Self {
        Analytics { logs }
    }

    /// Database rollup, one row or none when the scope has no logs.
    pub async fn total(
        &self,
        session: &mut Session,
        scope: Scope,
    ) -> Result<Vec<EmissionTotal>, LedgerError> {
        Ok(self.logs.total(session, scope).await?)
    }

    pub async fn total_emissions(
        &self,
        session: &mut Session,
        scope: Scope,
    ) -> Result<Option<f64>, LedgerError> {
        let totals = self.total(session, scope).await?;
        Ok(totals.first().map(|total| total.total_emissions))
    }

    pub async fn by_time(
        &self,
        session: &mut Session,
        scope: Scope,
        period: Period,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<TimeBucket>, LedgerError> {
        check_range(from, to)?;
        let rows = self.logs.rows(session, scope, from, to).await?;
        debug!("{} {}: {} rows by {}", scope.label(), scope.id(), rows.len(), period);
        Ok(aggregation::by_time(&rows, period))
    }

    pub async fn by_category(
        &self,
        session: &mut Session,
        scope: Scope,
    ) -> Result<Vec<CategoryTotal>, LedgerError> {
        let rows = self.logs.rows(session, scope, None, None).await?;
        Ok(aggregation::by_category(&rows))
    }

    pub async fn by_department(
        &self,
        session: &mut Session,
        scope: Scope,
    ) -> Result<Vec<DepartmentTotal>, LedgerError> {
        let rows = self.logs.rows(session, scope, None, None).await?;
        Ok(aggregation::by_department(&rows))
    }
}

/// Both ends are inclusive; an inverted range is rejected.
pub fn check_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), LedgerError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(LedgerError::InvalidRange { from, to }),
        _ => Ok(()),
    }
}
