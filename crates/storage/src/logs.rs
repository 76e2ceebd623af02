use std::sync::Arc;

use bson::{doc, from_document, Document};
use chrono::NaiveDate;
use eyre::Error;
use futures_util::TryStreamExt as _;
use log::debug;
use model::{
    log::EmissionLog,
    scope::Scope,
    session::Session,
    statistics::emissions::{EmissionTotal, LogRow},
};
use mongodb::{Collection, IndexModel};

use crate::{branch, department, factor};

const COLLECTION: &str = "carbon_logs";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct LogStore {
    store: Arc<Collection<EmissionLog>>,
}

impl LogStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let store = db.collection(COLLECTION);
        store
            .create_index(IndexModel::builder().keys(doc! { "dept_id": 1 }).build())
            .await?;
        store
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "activity_date": -1 })
                    .build(),
            )
            .await?;
        Ok(LogStore {
            store: Arc::new(store),
        })
    }

    pub async fn insert(&self, session: &mut Session, entry: &EmissionLog) -> Result<(), Error> {
        self.store.insert_one(entry).session(session).await?;
        Ok(())
    }

    /// Single batch write.
    pub async fn insert_many(
        &self,
        session: &mut Session,
        entries: &[EmissionLog],
    ) -> Result<(), Error> {
        if entries.is_empty() {
            return Ok(());
        }
        self.store.insert_many(entries).session(session).await?;
        Ok(())
    }

    /// Logs of the scope joined with their department name and factor category.
    pub async fn rows(
        &self,
        session: &mut Session,
        scope: Scope,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<LogRow>, Error> {
        let pipeline = rows_pipeline(scope, from, to);
        debug!("rows pipeline: {:?}", pipeline);
        let mut cursor = self
            .store
            .aggregate(pipeline)
            .session(&mut *session)
            .await?;
        let docs: Vec<Document> = cursor.stream(&mut *session).try_collect().await?;
        docs.into_iter()
            .map(|doc| from_document(doc).map_err(Error::from))
            .collect()
    }

    /// Rollup computed by the database. Empty when the scope has no logs.
    pub async fn total(
        &self,
        session: &mut Session,
        scope: Scope,
    ) -> Result<Vec<EmissionTotal>, Error> {
        let mut cursor = self
            .store
            .aggregate(total_pipeline(scope))
            .session(&mut *session)
            .await?;
        let docs: Vec<Document> = cursor.stream(&mut *session).try_collect().await?;
        docs.into_iter()
            .map(|doc| from_document(doc).map_err(Error::from))
            .collect()
    }
}

/// Joins log -> department -> branch as far as the scope needs and filters on it.
fn scope_stages(scope: Scope) -> Vec<Document> {
    let lookup_dept = doc! {
        "$lookup": {
            "from": department::COLLECTION,
            "localField": "dept_id",
            "foreignField": "_id",
            "as": "dept",
        }
    };
    let unwind_dept = doc! { "$unwind": "$dept" };

    match scope {
        Scope::Department(id) => vec![
            doc! { "$match": { "dept_id": id } },
            lookup_dept,
            unwind_dept,
        ],
        Scope::Branch(id) => vec![
            lookup_dept,
            unwind_dept,
            doc! { "$match": { "dept.branch_id": id } },
        ],
        Scope::Organization(id) => vec![
            lookup_dept,
            unwind_dept,
            doc! {
                "$lookup": {
                    "from": branch::COLLECTION,
                    "localField": "dept.branch_id",
                    "foreignField": "_id",
                    "as": "branch",
                }
            },
            doc! { "$unwind": "$branch" },
            doc! { "$match": { "branch.org_id": id } },
        ],
    }
}

fn date_stage(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<Document> {
    let mut range = Document::new();
    if let Some(from) = from {
        range.insert("$gte", from.format(DATE_FORMAT).to_string());
    }
    if let Some(to) = to {
        range.insert("$lte", to.format(DATE_FORMAT).to_string());
    }
    if range.is_empty() {
        None
    } else {
        Some(doc! { "$match": { "activity_date": range } })
    }
}

pub(crate) fn rows_pipeline(
    scope: Scope,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<Document> {
    let mut pipeline: Vec<Document> = date_stage(from, to).into_iter().collect();
    pipeline.extend(scope_stages(scope));
    pipeline.push(doc! {
        "$lookup": {
            "from": factor::COLLECTION,
            "localField": "factor_id",
            "foreignField": "_id",
            "as": "factor",
        }
    });
    pipeline.push(doc! {
        "$project": {
            "_id": 0,
            "dept_id": 1,
            "dept_name": "$dept.name",
            "category": { "$arrayElemAt": ["$factor.category", 0] },
            "co2e_kg": 1,
            "activity_date": 1,
        }
    });
    pipeline
}

pub(crate) fn total_pipeline(scope: Scope) -> Vec<Document> {
    let mut pipeline = scope_stages(scope);
    pipeline.push(doc! {
        "$group": {
            "_id": null,
            "total_emissions": { "$sum": "$co2e_kg" },
            "entries": { "$sum": 1 },
        }
    });
    pipeline.push(doc! { "$project": { "_id": 0, "total_emissions": 1, "entries": 1 } });
    pipeline
}

#[cfg(test)]
mod tests {
    use bson::oid::ObjectId;

    use super::*;

    #[test]
    fn test_department_scope_matches_first() {
        let id = ObjectId::new();
        let pipeline = total_pipeline(Scope::Department(id));
        assert_eq!(pipeline[0], doc! { "$match": { "dept_id": id } });
        assert!(pipeline.iter().any(|stage| stage.contains_key("$group")));
    }

    #[test]
    fn test_organization_scope_joins_branches() {
        let id = ObjectId::new();
        let pipeline = rows_pipeline(Scope::Organization(id), None, None);
        let lookups = pipeline
            .iter()
            .filter_map(|stage| stage.get_document("$lookup").ok())
            .map(|lookup| lookup.get_str("from").unwrap_or_default().to_string())
            .collect::<Vec<_>>();
        assert_eq!(lookups, vec!["departments", "branches", "emission_factors"]);
        assert!(pipeline.contains(&doc! { "$match": { "branch.org_id": id } }));
    }

    #[test]
    fn test_branch_scope_filters_on_department_branch() {
        let id = ObjectId::new();
        let pipeline = rows_pipeline(Scope::Branch(id), None, None);
        assert!(pipeline.contains(&doc! { "$match": { "dept.branch_id": id } }));
        assert!(!pipeline.iter().any(|stage| stage
            .get_document("$lookup")
            .map(|lookup| matches!(lookup.get_str("from"), Ok("branches")))
            .unwrap_or(false)));
    }

    #[test]
    fn test_date_range_stage() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1);
        let to = NaiveDate::from_ymd_opt(2024, 6, 30);
        let pipeline = rows_pipeline(Scope::Department(ObjectId::new()), from, to);
        assert_eq!(
            pipeline[0],
            doc! { "$match": { "activity_date": { "$gte": "2024-01-01", "$lte": "2024-06-30" } } }
        );

        let pipeline = rows_pipeline(Scope::Department(ObjectId::new()), None, to);
        assert_eq!(
            pipeline[0],
            doc! { "$match": { "activity_date": { "$lte": "2024-06-30" } } }
        );
        assert_eq!(date_stage(None, None), None);
    }
}
