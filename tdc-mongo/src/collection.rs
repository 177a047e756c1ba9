//! Driver seam between the accessor and a document store.
//!
//! [`DocumentCollection`] is the minimal set of calls the accessor needs from
//! a collection. [`MongoCollection`] forwards them one-to-one to the driver;
//! [`crate::memory::MemoryCollection`] keeps documents in process.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::options::FindOptions;
use tdc_core::Page;

use crate::document::{id_filter, id_to_string};
use crate::error::{MongoError, MongoResult};

/// Counts reported by a `$set` update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetResult {
    /// Documents matching the identifier.
    pub matched: u64,
    /// Documents actually changed.
    pub modified: u64,
}

/// A named collection of schema-less documents.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Collection name.
    fn name(&self) -> &str;

    /// Documents in natural order, windowed by `page`.
    async fn find_page(&self, page: Page) -> MongoResult<Vec<Document>>;

    /// Insert a document without `_id`; returns the generated identifier.
    async fn insert(&self, document: Document) -> MongoResult<String>;

    /// The document with the given identifier.
    async fn find_by_id(&self, id: ObjectId) -> MongoResult<Option<Document>>;

    /// Overwrite the given fields of one document, leaving the others untouched.
    async fn set_fields(&self, id: ObjectId, fields: Document) -> MongoResult<SetResult>;

    /// Remove one document; returns the number removed.
    async fn delete_by_id(&self, id: ObjectId) -> MongoResult<u64>;

    /// Number of documents.
    async fn count(&self) -> MongoResult<u64>;
}

/// Something collections can be resolved from.
pub trait CollectionSource: Send + Sync {
    /// Resolve a collection handle by name.
    fn open_collection(&self, name: &str) -> MongoResult<Arc<dyn DocumentCollection>>;
}

/// A collection backed by the MongoDB driver.
#[derive(Clone)]
pub struct MongoCollection {
    name: String,
    inner: Collection<Document>,
}

impl MongoCollection {
    /// Wrap a driver collection.
    pub fn new(inner: Collection<Document>) -> Self {
        Self {
            name: inner.name().to_string(),
            inner,
        }
    }

    /// Get the underlying driver collection.
    pub fn inner(&self) -> &Collection<Document> {
        &self.inner
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_page(&self, page: Page) -> MongoResult<Vec<Document>> {
        let limit = page
            .take()
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX));
        let options = FindOptions::builder()
            .skip(page.offset)
            .limit(limit)
            .build();

        let cursor = self.inner.find(None, options).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn insert(&self, document: Document) -> MongoResult<String> {
        let result = self.inner.insert_one(document, None).await?;
        id_to_string(&result.inserted_id)
    }

    async fn find_by_id(&self, id: ObjectId) -> MongoResult<Option<Document>> {
        let document = self.inner.find_one(id_filter(id), None).await?;
        Ok(document)
    }

    async fn set_fields(&self, id: ObjectId, fields: Document) -> MongoResult<SetResult> {
        let result = self
            .inner
            .update_one(id_filter(id), doc! { "$set": fields }, None)
            .await?;
        Ok(SetResult {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_by_id(&self, id: ObjectId) -> MongoResult<u64> {
        let result = self.inner.delete_one(id_filter(id), None).await?;
        Ok(result.deleted_count)
    }

    async fn count(&self) -> MongoResult<u64> {
        self.inner
            .count_documents(None, None)
            .await
            .map_err(MongoError::from)
    }
}
