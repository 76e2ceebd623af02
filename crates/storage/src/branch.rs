use std::sync::Arc;

use bson::{doc, oid::ObjectId};
use eyre::Error;
use futures_util::TryStreamExt as _;
use model::{branch::Branch, session::Session};
use mongodb::{Collection, IndexModel};

pub(crate) const COLLECTION: &str = "branches";

#[derive(Clone)]
pub struct BranchStore {
    store: Arc<Collection<Branch>>,
}

impl BranchStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let store = db.collection(COLLECTION);
        store
            .create_index(IndexModel::builder().keys(doc! { "org_id": 1 }).build())
            .await?;
        Ok(BranchStore {
            store: Arc::new(store),
        })
    }

    pub async fn insert(&self, session: &mut Session, branch: &Branch) -> Result<(), Error> {
        self.store.insert_one(branch).session(session).await?;
        Ok(())
    }

    pub async fn get(&self, session: &mut Session, id: ObjectId) -> Result<Option<Branch>, Error> {
        Ok(self
            .store
            .find_one(doc! { "_id": id })
            .session(session)
            .await?)
    }

    pub async fn by_org(
        &self,
        session: &mut Session,
        org_id: ObjectId,
    ) -> Result<Vec<Branch>, Error> {
        let mut cursor = self
            .store
            .find(doc! { "org_id": org_id })
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }
}
