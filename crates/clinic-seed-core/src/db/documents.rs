//! Document operations on the local store.

use rusqlite::params;
use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use super::{Database, DbResult};
use crate::store::{
    auto_id, validate_field_path, Document, DocumentStore, Fields, StoreResult,
};

impl Database {
    /// Insert a document under a caller-chosen id.
    pub fn insert_document(&self, collection: &str, id: &str, fields: &Fields) -> DbResult<()> {
        let data = serde_json::to_string(fields)?;
        self.conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)",
            params![collection, id, data],
        )?;
        Ok(())
    }

    /// Insert documents in one transaction.
    pub fn insert_documents(&self, collection: &str, docs: &[(String, Fields)]) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)")?;
            for (id, fields) in docs {
                let data = serde_json::to_string(fields)?;
                stmt.execute(params![collection, id, data])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Documents whose JSON field at `path` (e.g. `$.email`) equals `value`.
    pub fn query_documents_eq(
        &self,
        collection: &str,
        path: &str,
        value: &Value,
        limit: usize,
    ) -> DbResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = ?1 AND json_extract(data, ?2) IS ?3
            ORDER BY rowid
            LIMIT ?4
            "#,
        )?;

        let rows = stmt.query_map(
            params![collection, path, to_sql_value(value)?, limit as i64],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, data) = row?;
            docs.push(Document::new(id, serde_json::from_str(&data)?));
        }
        Ok(docs)
    }

    /// All documents in a collection, in insertion order.
    pub fn list_documents(&self, collection: &str) -> DbResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = ?
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, data) = row?;
            docs.push(Document::new(id, serde_json::from_str(&data)?));
        }
        Ok(docs)
    }

    /// Number of documents in a collection.
    pub fn count_documents(&self, collection: &str) -> DbResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?",
            [collection],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl DocumentStore for Database {
    fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        validate_field_path(field)?;
        let path = format!("$.{}", field);
        Ok(self.query_documents_eq(collection, &path, value, limit)?)
    }

    fn scan(&self, collection: &str) -> StoreResult<Vec<Document>> {
        Ok(self.list_documents(collection)?)
    }

    fn insert(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let id = auto_id();
        self.insert_document(collection, &id, &fields)?;
        tracing::debug!(collection, id = %id, "inserted document");
        Ok(id)
    }

    fn insert_batch(&self, collection: &str, docs: Vec<Fields>) -> StoreResult<Vec<String>> {
        let docs: Vec<(String, Fields)> = docs.into_iter().map(|f| (auto_id(), f)).collect();
        self.insert_documents(collection, &docs)?;
        tracing::debug!(collection, count = docs.len(), "committed batch");
        Ok(docs.into_iter().map(|(id, _)| id).collect())
    }

    fn count(&self, collection: &str) -> StoreResult<u64> {
        Ok(self.count_documents(collection)?)
    }
}

/// Map a JSON comparison value onto what `json_extract` yields for it.
fn to_sql_value(value: &Value) -> DbResult<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(serde_json::to_string(value)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{insert_chunked, to_fields, StoreError, MAX_BATCH_WRITES};
    use serde_json::json;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn fields(value: Value) -> Fields {
        to_fields(&value).unwrap()
    }

    #[test]
    fn test_insert_and_scan() {
        let db = setup_db();

        let id1 = db.insert("patients", fields(json!({"name": "Asha"}))).unwrap();
        let id2 = db.insert("patients", fields(json!({"name": "Ravi"}))).unwrap();
        db.insert("medicines", fields(json!({"name": "Paracetamol"})))
            .unwrap();

        let docs = db.scan("patients").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, id1);
        assert_eq!(docs[1].id, id2);
        assert_eq!(docs[1].get_str("name"), Some("Ravi"));
        assert_eq!(db.count("patients").unwrap(), 2);
        assert_eq!(db.count("medicines").unwrap(), 1);
        assert_eq!(db.count("invoices").unwrap(), 0);
    }

    #[test]
    fn test_find_by_field_is_exact() {
        let db = setup_db();
        db.insert(
            "staffData",
            fields(json!({"email": "Doctor@Gmail.com", "role": "doctor"})),
        )
        .unwrap();

        let exact = db
            .find_by_field("staffData", "email", &json!("Doctor@Gmail.com"), 1)
            .unwrap();
        assert_eq!(exact.len(), 1);

        let lowered = db
            .find_by_field("staffData", "email", &json!("doctor@gmail.com"), 1)
            .unwrap();
        assert!(lowered.is_empty());
    }

    #[test]
    fn test_find_by_numeric_and_nested_field() {
        let db = setup_db();
        db.insert("invoices", fields(json!({"totalAmount": 750, "meta": {"paid": true}})))
            .unwrap();
        db.insert("invoices", fields(json!({"totalAmount": 500, "meta": {"paid": false}})))
            .unwrap();

        let found = db
            .find_by_field("invoices", "totalAmount", &json!(750), 10)
            .unwrap();
        assert_eq!(found.len(), 1);

        let paid = db
            .find_by_field("invoices", "meta.paid", &json!(true), 10)
            .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].fields["totalAmount"], json!(750));
    }

    #[test]
    fn test_find_respects_limit() {
        let db = setup_db();
        for _ in 0..5 {
            db.insert("appointments", fields(json!({"date": "2026-10-18"})))
                .unwrap();
        }
        let found = db
            .find_by_field("appointments", "date", &json!("2026-10-18"), 3)
            .unwrap();
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_find_rejects_bad_path() {
        let db = setup_db();
        let result = db.find_by_field("staffData", "email'", &json!("x"), 1);
        assert!(matches!(result, Err(StoreError::InvalidFieldPath(_))));
    }

    #[test]
    fn test_batch_is_atomic() {
        let db = setup_db();
        db.insert_document("patients", "dup", &fields(json!({}))).unwrap();

        // Second row collides on the primary key, so the whole batch rolls back.
        let docs = vec![
            ("fresh".to_string(), fields(json!({"name": "A"}))),
            ("dup".to_string(), fields(json!({"name": "B"}))),
        ];
        assert!(db.insert_documents("patients", &docs).is_err());
        assert_eq!(db.count("patients").unwrap(), 1);
    }

    #[test]
    fn test_insert_chunked_spans_batches() {
        let db = setup_db();
        let docs: Vec<Fields> = (0..MAX_BATCH_WRITES + 7)
            .map(|i| fields(json!({ "n": i })))
            .collect();

        let ids = insert_chunked(&db, "medicines", docs).unwrap();
        assert_eq!(ids.len(), MAX_BATCH_WRITES + 7);
        assert_eq!(db.count("medicines").unwrap(), (MAX_BATCH_WRITES + 7) as u64);

        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
