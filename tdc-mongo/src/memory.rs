//! In-process document store.
//!
//! Mirrors the driver's observable behavior for the operations the accessor
//! uses: natural order is insertion order, identifiers are fresh
//! [`ObjectId`]s stored first in the document, and `$set` reports a document
//! as modified only when a field value actually changes. Field names are
//! taken literally; the accessor never passes dotted paths down.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use parking_lot::RwLock;
use tdc_core::Page;

use crate::collection::{CollectionSource, DocumentCollection, SetResult};
use crate::document::ID_FIELD;
use crate::error::MongoResult;

/// A collection held in memory.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    fn position(documents: &[Document], id: ObjectId) -> Option<usize> {
        documents
            .iter()
            .position(|d| d.get(ID_FIELD) == Some(&Bson::ObjectId(id)))
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_page(&self, page: Page) -> MongoResult<Vec<Document>> {
        let documents = self.documents.read();
        Ok(page.apply(documents.iter()).cloned().collect())
    }

    async fn insert(&self, document: Document) -> MongoResult<String> {
        let id = ObjectId::new();
        let mut stored = Document::new();
        stored.insert(ID_FIELD, id);
        for (key, value) in document {
            stored.insert(key, value);
        }

        self.documents.write().push(stored);
        Ok(id.to_hex())
    }

    async fn find_by_id(&self, id: ObjectId) -> MongoResult<Option<Document>> {
        let documents = self.documents.read();
        Ok(Self::position(&documents, id).map(|i| documents[i].clone()))
    }

    async fn set_fields(&self, id: ObjectId, fields: Document) -> MongoResult<SetResult> {
        let mut documents = self.documents.write();
        let Some(index) = Self::position(&documents, id) else {
            return Ok(SetResult {
                matched: 0,
                modified: 0,
            });
        };

        let target = &mut documents[index];
        let mut changed = false;
        for (key, value) in fields {
            if target.get(&key) != Some(&value) {
                target.insert(key, value);
                changed = true;
            }
        }

        Ok(SetResult {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn delete_by_id(&self, id: ObjectId) -> MongoResult<u64> {
        let mut documents = self.documents.write();
        match Self::position(&documents, id) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count(&self) -> MongoResult<u64> {
        Ok(self.documents.read().len() as u64)
    }
}

/// A set of in-memory collections, created on first use like server-side ones.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    collections: RwLock<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the collections created so far, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl CollectionSource for MemoryDatabase {
    fn open_collection(&self, name: &str) -> MongoResult<Arc<dyn DocumentCollection>> {
        let collection = self
            .collections
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCollection::new(name)))
            .clone();
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_insert_assigns_id_first() {
        let collection = MemoryCollection::new("companies");
        let id = collection.insert(doc! { "name": "Arbalo" }).await.unwrap();

        let stored = collection
            .find_by_id(ObjectId::parse_str(&id).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.keys().next().map(String::as_str), Some(ID_FIELD));
        assert_eq!(stored.get_str("name").unwrap(), "Arbalo");
    }

    #[tokio::test]
    async fn test_set_fields_reports_unchanged() {
        let collection = MemoryCollection::new("companies");
        let id = collection.insert(doc! { "name": "Arbalo" }).await.unwrap();
        let oid = ObjectId::parse_str(&id).unwrap();

        let same = collection
            .set_fields(oid, doc! { "name": "Arbalo" })
            .await
            .unwrap();
        assert_eq!(same, SetResult { matched: 1, modified: 0 });

        let changed = collection
            .set_fields(oid, doc! { "name": "Arbalo AG" })
            .await
            .unwrap();
        assert_eq!(changed, SetResult { matched: 1, modified: 1 });

        let missing = collection
            .set_fields(ObjectId::new(), doc! { "name": "x" })
            .await
            .unwrap();
        assert_eq!(missing.matched, 0);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let collection = MemoryCollection::new("companies");
        let id = collection.insert(doc! { "name": "Arbalo" }).await.unwrap();
        let oid = ObjectId::parse_str(&id).unwrap();

        assert_eq!(collection.delete_by_id(oid).await.unwrap(), 1);
        assert_eq!(collection.delete_by_id(oid).await.unwrap(), 0);
        assert_eq!(collection.count().await.unwrap(), 0);
    }

    #[test]
    fn test_database_reuses_collections() {
        let db = MemoryDatabase::new();
        let a = db.open_collection("companies").unwrap();
        let b = db.open_collection("companies").unwrap();
        db.open_collection("addresses").unwrap();

        assert_eq!(a.name(), b.name());
        assert_eq!(db.collection_names(), vec!["addresses", "companies"]);
    }
}
