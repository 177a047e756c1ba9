//! Identifier conversion and document helpers.
//!
//! Callers address documents by opaque strings; the database stores
//! [`ObjectId`]s under `_id`. These helpers convert between the two.

use bson::{Bson, Document, doc, oid::ObjectId};

use crate::error::{MongoError, MongoResult};

/// Name of the identifier field.
pub const ID_FIELD: &str = "_id";

/// Parse a caller-supplied identifier.
pub fn parse_id(id: &str) -> MongoResult<ObjectId> {
    ObjectId::parse_str(id.trim()).map_err(|_| MongoError::invalid_object_id(id))
}

/// Filter matching a single identifier.
pub fn id_filter(id: ObjectId) -> Document {
    doc! { ID_FIELD: id }
}

/// Render a stored identifier as the caller-facing string.
pub fn id_to_string(id: &Bson) -> MongoResult<String> {
    match id {
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        Bson::String(s) => Ok(s.clone()),
        other => Err(MongoError::internal(format!(
            "unsupported identifier type: {:?}",
            other.element_type()
        ))),
    }
}

/// Copy of `document` without its identifier field.
pub fn without_id(document: &Document) -> Document {
    document
        .iter()
        .filter(|(key, _)| key.as_str() != ID_FIELD)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Extension trait for BSON documents.
pub trait DocumentExt {
    /// The `_id` field rendered as a string, if present.
    fn id_string(&self) -> Option<String>;

    /// Whether the document carries an `_id` field.
    fn has_id(&self) -> bool;
}

impl DocumentExt for Document {
    fn id_string(&self) -> Option<String> {
        self.get(ID_FIELD).and_then(|id| id_to_string(id).ok())
    }

    fn has_id(&self) -> bool {
        self.contains_key(ID_FIELD)
    }
}
