use std::sync::Arc;

use bson::doc;
use eyre::Error;
use futures_util::TryStreamExt as _;
use model::{factor::EmissionFactor, session::Session};
use mongodb::{options::IndexOptions, Collection, IndexModel};

pub(crate) const COLLECTION: &str = "emission_factors";

#[derive(Clone)]
pub struct FactorStore {
    store: Arc<Collection<EmissionFactor>>,
}

impl FactorStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let store = db.collection(COLLECTION);
        let index = IndexModel::builder()
            .keys(doc! { "category": 1, "activity": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        store.create_index(index).await?;
        Ok(FactorStore {
            store: Arc::new(store),
        })
    }

    /// Exact, case-sensitive match on the pair.
    pub async fn find(
        &self,
        session: &mut Session,
        category: &str,
        activity: &str,
    ) -> Result<Option<EmissionFactor>, Error> {
        Ok(self
            .store
            .find_one(doc! { "category": category, "activity": activity })
            .session(session)
            .await?)
    }

    pub async fn list(&self, session: &mut Session) -> Result<Vec<EmissionFactor>, Error> {
        let mut cursor = self
            .store
            .find(doc! {})
            .sort(doc! { "category": 1, "activity": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    /// Inserts the factor or updates the value, unit and source of the existing pair.
    /// The id of an existing pair is kept so logs keep pointing at it.
    pub async fn upsert(&self, session: &mut Session, factor: &EmissionFactor) -> Result<(), Error> {
        self.store
            .update_one(
                doc! { "category": factor.category.as_str(), "activity": factor.activity.as_str() },
                doc! {
                    "$set": {
                        "factor": factor.factor,
                        "unit": factor.unit.as_str(),
                        "source": factor.source.as_str(),
                    },
                    "$setOnInsert": { "_id": factor.id },
                },
            )
            .upsert(true)
            .session(session)
            .await?;
        Ok(())
    }
}
