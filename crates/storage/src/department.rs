use std::sync::Arc;

use bson::{doc, oid::ObjectId};
use eyre::Error;
use futures_util::TryStreamExt as _;
use model::{department::Department, session::Session};
use mongodb::{Collection, IndexModel};

pub(crate) const COLLECTION: &str = "departments";

#[derive(Clone)]
pub struct DepartmentStore {
    store: Arc<Collection<Department>>,
}

impl DepartmentStore {
    pub(crate) async fn new(db: &mongodb::Database) -> Result<Self, Error> {
        let store = db.collection(COLLECTION);
        store
            .create_index(IndexModel::builder().keys(doc! { "branch_id": 1 }).build())
            .await?;
        Ok(DepartmentStore {
            store: Arc::new(store),
        })
    }

    pub async fn insert(&self, session: &mut Session, dept: &Department) -> Result<(), Error> {
        self.store.insert_one(dept).session(session).await?;
        Ok(())
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Department>, Error> {
        Ok(self
            .store
            .find_one(doc! { "_id": id })
            .session(session)
            .await?)
    }

    pub async fn by_branch(
        &self,
        session: &mut Session,
        branch_id: ObjectId,
    ) -> Result<Vec<Department>, Error> {
        let mut cursor = self
            .store
            .find(doc! { "branch_id": branch_id })
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }
}
