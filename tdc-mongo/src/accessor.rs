//! Named-collection CRUD accessor.
//!
//! A [`CollectionAccessor`] resolves a collection by name from an explicitly
//! owned [`CollectionSource`] and forwards list/create/read/update/delete to
//! it, translating outcomes into [`ServiceError`] kinds.
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() -> Result<(), tdc_core::ServiceError> {
//! use std::sync::Arc;
//! use bson::doc;
//! use tdc_mongo::{CollectionAccessor, MemoryDatabase};
//!
//! let mut companies = CollectionAccessor::new(Arc::new(MemoryDatabase::new()));
//! companies.resolve_collection("companies")?;
//!
//! let id = companies.create(doc! { "title": "Arbalo AG" }).await?;
//! let stored = companies.read_one(&id).await?.expect("just created");
//! assert_eq!(stored.get_str("title").unwrap(), "Arbalo AG");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use bson::Document;
use tdc_core::{Page, ServiceError, ServiceResult};
use tracing::{debug, error, warn};

use crate::collection::{CollectionSource, DocumentCollection};
use crate::document::{DocumentExt, parse_id, without_id};
use crate::error::MongoError;

/// Outcome of a successful [`CollectionAccessor::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one field changed.
    Modified,
    /// The record exists but already held every value.
    Unchanged,
}

struct Resolved {
    name: String,
    collection: Arc<dyn DocumentCollection>,
}

/// CRUD access to one named collection at a time.
pub struct CollectionAccessor {
    source: Arc<dyn CollectionSource>,
    resolved: Option<Resolved>,
}

impl CollectionAccessor {
    /// Create an unresolved accessor over `source`.
    pub fn new(source: Arc<dyn CollectionSource>) -> Self {
        Self {
            source,
            resolved: None,
        }
    }

    /// Resolve and cache the collection called `name`.
    ///
    /// Re-resolving switches the cached collection.
    pub fn resolve_collection(&mut self, name: &str) -> ServiceResult<&str> {
        if name.trim().is_empty() {
            warn!("resolve_collection(): empty collection name");
            return Err(ServiceError::validation("collection name must not be empty")
                .with_operation("resolve_collection"));
        }

        let collection = self.source.open_collection(name).map_err(|e| {
            error!(collection = %name, error = %e, "resolve_collection() failed");
            internal(e, "resolve_collection").with_collection(name)
        })?;

        debug!(collection = %name, "resolve_collection()");
        let resolved = self.resolved.insert(Resolved {
            name: name.to_string(),
            collection,
        });
        Ok(&resolved.name)
    }

    /// Name of the resolved collection, if any.
    pub fn collection_name(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.name.as_str())
    }

    fn resolved(&self, operation: &'static str) -> ServiceResult<&Resolved> {
        self.resolved.as_ref().ok_or_else(|| {
            error!(operation, "no collection resolved");
            ServiceError::internal("no collection resolved: call resolve_collection() first")
                .with_operation(operation)
        })
    }

    /// Documents in natural order, skipping `offset` and returning at most
    /// `limit` (`0` returns everything after the offset).
    pub async fn list(&self, offset: u64, limit: u64) -> ServiceResult<Vec<Document>> {
        let resolved = self.resolved("list")?;
        let documents = resolved
            .collection
            .find_page(Page::new(offset, limit))
            .await
            .map_err(|e| {
                error!(collection = %resolved.name, offset, limit, error = %e, "list() failed");
                internal(e, "list").with_collection(&resolved.name)
            })?;

        debug!(
            collection = %resolved.name,
            offset,
            limit,
            count = documents.len(),
            "list()"
        );
        Ok(documents)
    }

    /// Insert a document and return the identifier the store assigned.
    pub async fn create(&self, document: Document) -> ServiceResult<String> {
        let resolved = self.resolved("create")?;
        if document.has_id() {
            warn!(collection = %resolved.name, "create(): document already carries an _id");
            return Err(
                ServiceError::validation("document must not carry an identifier on create")
                    .with_operation("create")
                    .with_collection(&resolved.name),
            );
        }

        let id = resolved.collection.insert(document).await.map_err(|e| {
            error!(collection = %resolved.name, error = %e, "create() failed");
            internal(e, "create").with_collection(&resolved.name)
        })?;

        debug!(collection = %resolved.name, id = %id, "create()");
        Ok(id)
    }

    /// The document with `id`, or `None` if there is none.
    ///
    /// A malformed identifier is a validation error, never `None`.
    pub async fn read_one(&self, id: &str) -> ServiceResult<Option<Document>> {
        let resolved = self.resolved("read_one")?;
        let oid = parse(id, "read_one", &resolved.name)?;

        let document = resolved.collection.find_by_id(oid).await.map_err(|e| {
            error!(collection = %resolved.name, id = %id, error = %e, "read_one() failed");
            internal(e, "read_one")
                .with_collection(&resolved.name)
                .with_id(id)
        })?;

        debug!(
            collection = %resolved.name,
            id = %id,
            found = document.is_some(),
            "read_one()"
        );
        Ok(document)
    }

    /// The document with `id`; absence is a not-found error.
    pub async fn get(&self, id: &str) -> ServiceResult<Document> {
        match self.read_one(id).await? {
            Some(document) => Ok(document),
            None => Err(not_found(id, "get", self.collection_name())),
        }
    }

    /// Merge the fields of `document` into the stored record.
    ///
    /// Fields absent from `document` are left untouched; an `_id` key is ignored.
    /// Only top-level fields can be set: dotted paths and `$` operators are
    /// rejected.
    pub async fn update(&self, id: &str, document: Document) -> ServiceResult<UpdateOutcome> {
        let resolved = self.resolved("update")?;
        let oid = parse(id, "update", &resolved.name)?;

        let fields = without_id(&document);
        if fields.is_empty() {
            warn!(collection = %resolved.name, id = %id, "update(): no fields to set");
            return Err(ServiceError::validation("update must set at least one field")
                .with_operation("update")
                .with_collection(&resolved.name)
                .with_id(id));
        }

        if let Some(key) = fields.keys().find(|key| !is_plain_field(key)) {
            warn!(collection = %resolved.name, id = %id, field = %key, "update(): field path rejected");
            return Err(ServiceError::validation(format!(
                "field name '{}' must not contain '.' or start with '$'",
                key
            ))
            .with_operation("update")
            .with_collection(&resolved.name)
            .with_id(id));
        }

        let result = resolved.collection.set_fields(oid, fields).await.map_err(|e| {
            error!(collection = %resolved.name, id = %id, error = %e, "update() failed");
            internal(e, "update")
                .with_collection(&resolved.name)
                .with_id(id)
        })?;

        if result.matched == 0 {
            warn!(collection = %resolved.name, id = %id, "update(): no such document");
            return Err(not_found(id, "update", Some(&resolved.name)));
        }

        let outcome = if result.modified == 0 {
            UpdateOutcome::Unchanged
        } else {
            UpdateOutcome::Modified
        };
        debug!(collection = %resolved.name, id = %id, outcome = ?outcome, "update()");
        Ok(outcome)
    }

    /// Remove the document with `id`.
    pub async fn delete_one(&self, id: &str) -> ServiceResult<()> {
        let resolved = self.resolved("delete_one")?;
        let oid = parse(id, "delete_one", &resolved.name)?;

        let deleted = resolved.collection.delete_by_id(oid).await.map_err(|e| {
            error!(collection = %resolved.name, id = %id, error = %e, "delete_one() failed");
            internal(e, "delete_one")
                .with_collection(&resolved.name)
                .with_id(id)
        })?;

        if deleted == 0 {
            warn!(collection = %resolved.name, id = %id, "delete_one(): no such document");
            return Err(not_found(id, "delete_one", Some(&resolved.name)));
        }

        debug!(collection = %resolved.name, id = %id, "delete_one()");
        Ok(())
    }

    /// Number of documents in the resolved collection.
    pub async fn count(&self) -> ServiceResult<u64> {
        let resolved = self.resolved("count")?;
        let count = resolved.collection.count().await.map_err(|e| {
            error!(collection = %resolved.name, error = %e, "count() failed");
            internal(e, "count").with_collection(&resolved.name)
        })?;

        debug!(collection = %resolved.name, count, "count()");
        Ok(count)
    }
}

fn parse(id: &str, operation: &'static str, collection: &str) -> ServiceResult<bson::oid::ObjectId> {
    parse_id(id).map_err(|e| {
        warn!(collection = %collection, id = %id, "{}(): malformed identifier", operation);
        ServiceError::from(e)
            .with_operation(operation)
            .with_collection(collection)
            .with_id(id)
    })
}

fn is_plain_field(key: &str) -> bool {
    !key.contains('.') && !key.starts_with('$')
}

fn internal(err: MongoError, operation: &'static str) -> ServiceError {
    ServiceError::internal(err.to_string())
        .with_operation(operation)
        .with_source(err)
}

fn not_found(id: &str, operation: &'static str, collection: Option<&str>) -> ServiceError {
    let err = ServiceError::not_found(format!("document {}", id))
        .with_operation(operation)
        .with_id(id);
    match collection {
        Some(name) => err.with_collection(name),
        None => err,
    }
}
