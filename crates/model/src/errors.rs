use bson::oid::ObjectId;
use chrono::NaiveDate;
use mongodb::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Common error: {0}")]
    Eyre(#[from] eyre::Error),
    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),
    #[error("No factor found for {category} - {activity}")]
    FactorNotFound { category: String, activity: String },
    #[error("Organization not found: {0}")]
    OrganizationNotFound(ObjectId),
    #[error("Branch not found: {0}")]
    BranchNotFound(ObjectId),
    #[error("Department not found: {0}")]
    DepartmentNotFound(ObjectId),
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
}

impl LedgerError {
    /// Errors caused by the caller's input rather than by the infrastructure.
    ///
    /// Rejected writes (duplicate keys, validation failures) count as the
    /// caller's failure: the insert was refused, nothing is broken.
    pub fn is_client_error(&self) -> bool {
        match self {
            LedgerError::FactorNotFound { .. }
            | LedgerError::OrganizationNotFound(_)
            | LedgerError::BranchNotFound(_)
            | LedgerError::DepartmentNotFound(_)
            | LedgerError::InvalidRange { .. } => true,
            LedgerError::MongoError(err) => is_rejected_write(err),
            LedgerError::Eyre(err) => err
                .downcast_ref::<mongodb::error::Error>()
                .is_some_and(is_rejected_write),
        }
    }
}

fn is_rejected_write(err: &mongodb::error::Error) -> bool {
    matches!(*err.kind, ErrorKind::Write(_) | ErrorKind::InsertMany(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        let err = LedgerError::FactorNotFound {
            category: "Bogus".to_string(),
            activity: "X".to_string(),
        };
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "No factor found for Bogus - X");

        assert!(LedgerError::DepartmentNotFound(ObjectId::new()).is_client_error());
        assert!(!LedgerError::Eyre(eyre::eyre!("connection reset")).is_client_error());
    }
}
