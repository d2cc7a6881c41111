//! Document store boundary.
//!
//! The clinic data lives in an external document database. Everything the seed
//! pipeline and the inspection utilities need from it is captured by the
//! [`DocumentStore`] trait: equality lookup, collection scan, insert with an
//! auto-assigned id, atomic batched insert, and count.
//!
//! Two backends implement it:
//! - [`FirestoreClient`]: the hosted database over its REST API, in emulator or
//!   production mode
//! - [`crate::db::Database`]: a local SQLite document table used for offline
//!   runs and tests

mod firestore;
pub mod value;

pub use firestore::*;

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::db::DbError;

/// Document body: top-level field name to JSON value.
pub type Fields = Map<String, Value>;

/// Maximum number of writes committed in one atomic batch.
pub const MAX_BATCH_WRITES: usize = 500;

/// Length of generated document ids.
pub const AUTO_ID_LEN: usize = 20;

const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode document: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid field path: {0}")]
    InvalidFieldPath(String),

    #[error("Document body must be a JSON object, got: {0}")]
    NotAnObject(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored document: its id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// String value of a top-level field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Deserialize the fields into a typed record. The id is not part of the body.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| StoreError::Decode(format!("{}: {}", self.id, e)))
    }
}

/// Operations consumed from the external document database.
pub trait DocumentStore {
    /// Documents in `collection` whose `field` equals `value`, at most `limit`.
    fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> StoreResult<Vec<Document>>;

    /// Every document in `collection`.
    fn scan(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Insert one document, returning its assigned id.
    fn insert(&self, collection: &str, fields: Fields) -> StoreResult<String>;

    /// Insert documents atomically (all or nothing), returning ids in input order.
    ///
    /// Callers must keep batches within [`MAX_BATCH_WRITES`]; see [`insert_chunked`].
    fn insert_batch(&self, collection: &str, docs: Vec<Fields>) -> StoreResult<Vec<String>>;

    /// Number of documents in `collection`.
    fn count(&self, collection: &str) -> StoreResult<u64>;
}

/// Insert any number of documents as consecutive atomic batches.
///
/// Each chunk is all-or-nothing; a failure leaves earlier chunks committed.
pub fn insert_chunked<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &str,
    docs: Vec<Fields>,
) -> StoreResult<Vec<String>> {
    let mut ids = Vec::with_capacity(docs.len());
    let mut pending = docs.into_iter().peekable();
    while pending.peek().is_some() {
        let chunk: Vec<Fields> = pending.by_ref().take(MAX_BATCH_WRITES).collect();
        ids.extend(store.insert_batch(collection, chunk)?);
    }
    Ok(ids)
}

/// Generate a document id in the hosted store's auto-id format.
pub fn auto_id() -> String {
    let mut rng = rand::thread_rng();
    (0..AUTO_ID_LEN)
        .map(|_| AUTO_ID_ALPHABET[rng.gen_range(0..AUTO_ID_ALPHABET.len())] as char)
        .collect()
}

/// Serialize a record into a document body.
pub fn to_fields<T: Serialize>(record: &T) -> StoreResult<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::NotAnObject(other.to_string())),
    }
}

/// Accept dotted paths of identifier segments only (`email`, `vitals.pulse`).
pub(crate) fn validate_field_path(field: &str) -> StoreResult<()> {
    let valid = !field.is_empty()
        && field.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !segment.starts_with(|c: char| c.is_ascii_digit())
        });
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidFieldPath(field.to_string()))
    }
}
