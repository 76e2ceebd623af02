use std::sync::Arc;

use bson::{doc, oid::ObjectId};
use eyre::Error;
use futures_util::TryStreamExt as _;
use model::{organization::Organization, session::Session};
use mongodb::{Collection, IndexModel};

const COLLECTION: &str = "organizations";

#[derive(Clone)]
pub struct OrganizationStore {
    store: Arc<Collection<Organization>>,
}

impl OrganizationStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let store = db.collection(COLLECTION);
        store
            .create_index(IndexModel::builder().keys(doc! { "name": 1 }).build())
            .await?;
        Ok(OrganizationStore {
            store: Arc::new(store),
        })
    }

    pub async fn insert(&self, session: &mut Session, org: &Organization) -> Result<(), Error> {
        self.store.insert_one(org).session(session).await?;
        Ok(())
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Organization>, Error> {
        Ok(self
            .store
            .find_one(doc! { "_id": id })
            .session(session)
            .await?)
    }

    pub async fn list(&self, session: &mut Session) -> Result<Vec<Organization>, Error> {
        let mut cursor = self
            .store
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }
}
