#[cfg(test)]
use crate::db::memory::MemoryStore;
use crate::db::{StoreError, client::StoreClient};
use futures::TryStreamExt;
use mongodb::{
    Database,
    bson::{Bson, Document},
    options::{FindOneOptions, FindOptions},
};
use std::sync::Arc;
#[cfg(test)]
use tokio::sync::RwLock;
use tracing::debug;

/// Handle to the document store. Every operation names the collection it targets, so clones can be
/// shared freely between concurrent requests.
#[derive(Clone, Debug)]
pub struct Gateway {
    backend: Backend,
}

#[derive(Clone, Debug)]
enum Backend {
    Mongo { client: Arc<StoreClient>, database: Database },
    #[cfg(test)]
    Memory(Arc<RwLock<MemoryStore>>),
}

impl Gateway {
    pub async fn connect(client: StoreClient, database_name: &str) -> Result<Self, StoreError> {
        let database = client.connect(database_name).await?;
        Ok(Self { backend: Backend::Mongo { client: Arc::new(client), database } })
    }

    #[cfg(test)]
    pub fn memory() -> Self {
        Self { backend: Backend::Memory(Arc::default()) }
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
        sort: Option<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        debug!("find in {collection}: {filter}");

        match &self.backend {
            Backend::Mongo { database, .. } => {
                let options = FindOptions::builder().projection(projection).sort(sort).build();
                Ok(database.collection::<Document>(collection).find(filter).with_options(options).await?.try_collect().await?)
            },
            #[cfg(test)]
            Backend::Memory(store) => store.read().await.find(collection, &filter, projection.as_ref(), sort.as_ref()),
        }
    }

    pub async fn find_one(&self, collection: &str, filter: Document, projection: Option<Document>) -> Result<Option<Document>, StoreError> {
        debug!("find_one in {collection}: {filter}");

        match &self.backend {
            Backend::Mongo { database, .. } => {
                let options = FindOneOptions::builder().projection(projection).build();
                Ok(database.collection::<Document>(collection).find_one(filter).with_options(options).await?)
            },
            #[cfg(test)]
            Backend::Memory(store) => store.read().await.find_one(collection, &filter, projection.as_ref()),
        }
    }

    /// Inserts `document` and returns the id the store assigned to it.
    pub async fn create(&self, collection: &str, document: Document) -> Result<Bson, StoreError> {
        match &self.backend {
            Backend::Mongo { database, .. } => Ok(database.collection::<Document>(collection).insert_one(document).await?.inserted_id),
            #[cfg(test)]
            Backend::Memory(store) => store.write().await.insert_one(collection, document),
        }
    }

    /// Inserts every document and returns their ids in input order.
    pub async fn create_many(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<Bson>, StoreError> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            Backend::Mongo { database, .. } => {
                let result = database.collection::<Document>(collection).insert_many(documents).await?;
                let mut ids = result.inserted_ids.into_iter().collect::<Vec<(usize, Bson)>>();
                ids.sort_by_key(|(index, _)| *index);
                Ok(ids.into_iter().map(|(_, id)| id).collect())
            },
            #[cfg(test)]
            Backend::Memory(store) => store.write().await.insert_many(collection, documents),
        }
    }

    /// Drops `collection` and fills it with `documents`. Only meant for fixtures.
    pub async fn drop_and_seed(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<Bson>, StoreError> {
        match &self.backend {
            Backend::Mongo { database, .. } => database.collection::<Document>(collection).drop().await?,
            #[cfg(test)]
            Backend::Memory(store) => store.write().await.drop_collection(collection)?,
        }

        self.create_many(collection, documents).await
    }

    /// Runs `pipeline` against `collection`. The pipeline is handed to the store as is.
    pub async fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> Result<Vec<Document>, StoreError> {
        match &self.backend {
            Backend::Mongo { database, .. } => Ok(database.collection::<Document>(collection).aggregate(pipeline).await?.try_collect().await?),
            #[cfg(test)]
            Backend::Memory(store) => store.read().await.aggregate(collection, &pipeline),
        }
    }

    pub async fn close(&self) {
        match &self.backend {
            Backend::Mongo { client, .. } => client.close().await,
            #[cfg(test)]
            Backend::Memory(_) => debug!("Closing in-memory store"),
        }
    }

    #[cfg(test)]
    pub async fn fail_with(&self, message: &str) {
        if let Backend::Memory(store) = &self.backend {
            store.write().await.fail_with(message);
        }
    }
}
