//! SQLite schema definition.

/// Complete database schema for the local document store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Documents
-- ============================================================================

-- One row per document; `data` is the JSON body without the id.
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL CHECK (json_valid(data)),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_rejects_invalid_json() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES ('patients', 'a', 'not json')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_id_unique_per_collection() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES ('patients', 'a', '{}')",
            [],
        )
        .unwrap();

        // Same id in another collection is fine
        let result = conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES ('medicines', 'a', '{}')",
            [],
        );
        assert!(result.is_ok());

        // Duplicate within a collection is not
        let result = conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES ('patients', 'a', '{}')",
            [],
        );
        assert!(result.is_err());
    }
}
