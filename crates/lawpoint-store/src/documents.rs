//! Document operations over the named collections.
//!
//! Updates are read-modify-write on the JSON body. A field set to `null` in
//! an update is removed from the stored document rather than stored as
//! `null`, so cleared values do not linger. The `id` field is never changed
//! by an update.

use chrono::Utc;
use rusqlite::{params, ErrorCode, OptionalExtension};
use serde_json::{Map, Value};

use crate::collections::Collection;
use crate::database::Database;
use crate::error::{Result, StoreError};

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new document. The document must be a JSON object with a
    /// string `id` unique within its collection.
    pub fn insert_document(&self, collection: Collection, doc: &Value) -> Result<()> {
        let obj = doc.as_object().ok_or(StoreError::NotAnObject {
            collection: collection.name(),
        })?;
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or(StoreError::MissingId {
                collection: collection.name(),
            })?;

        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO documents (collection, id, body, inserted_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![collection.name(), id, serde_json::to_string(obj)?, now],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    StoreError::Duplicate {
                        collection: collection.name(),
                        id: id.to_string(),
                    }
                }
                other => StoreError::Sqlite(other),
            })?;

        tracing::debug!(collection = %collection, id, "document inserted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// List every document of a collection in insertion order.
    pub fn find_all(&self, collection: Collection) -> Result<Vec<Value>> {
        let mut stmt = self.conn().prepare(
            "SELECT body FROM documents
             WHERE collection = ?1
             ORDER BY seq ASC",
        )?;

        let rows = stmt.query_map(params![collection.name()], |row| row.get::<_, String>(0))?;

        let mut docs = Vec::new();
        for row in rows {
            docs.push(serde_json::from_str(&row?)?);
        }
        Ok(docs)
    }

    /// Fetch a single document by id.
    pub fn find_by_id(&self, collection: Collection, id: &str) -> Result<Value> {
        self.load(collection, id)?
            .map(Value::Object)
            .ok_or(StoreError::NotFound)
    }

    /// Every collection keyed by its name.
    pub fn snapshot(&self) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        for collection in Collection::ALL {
            out.insert(
                collection.name().to_string(),
                Value::Array(self.find_all(collection)?),
            );
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Set top-level fields of a document. Returns `false` when no document
    /// has that id.
    pub fn set_fields(
        &self,
        collection: Collection,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<bool> {
        let Some(mut body) = self.load(collection, id)? else {
            return Ok(false);
        };
        merge_fields(&mut body, fields);
        self.store(collection, id, &body)?;
        Ok(true)
    }

    /// Append `value` to the array stored under `field`, creating the array
    /// when absent. Returns `false` when no document has that id.
    pub fn push_to_array(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<bool> {
        let Some(mut body) = self.load(collection, id)? else {
            return Ok(false);
        };

        let slot = body
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
        let Value::Array(items) = slot else {
            return Err(StoreError::NotAnArray {
                field: field.to_string(),
            });
        };
        items.push(value);

        self.store(collection, id, &body)?;
        Ok(true)
    }

    /// Set fields on the element of the array `field` whose `id` equals
    /// `element_id`. Returns `false` when either the document or the element
    /// is missing.
    pub fn update_array_element(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        element_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<bool> {
        let Some(mut body) = self.load(collection, id)? else {
            return Ok(false);
        };

        let element = body
            .get_mut(field)
            .and_then(Value::as_array_mut)
            .and_then(|items| {
                items
                    .iter_mut()
                    .filter_map(Value::as_object_mut)
                    .find(|item| item.get("id").and_then(Value::as_str) == Some(element_id))
            });

        let Some(element) = element else {
            return Ok(false);
        };
        merge_fields(element, fields);

        self.store(collection, id, &body)?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a document by id. Returns `true` if a document was deleted.
    pub fn delete_document(&self, collection: Collection, id: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection.name(), id],
        )?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------

    fn load(&self, collection: Collection, id: &str) -> Result<Option<Map<String, Value>>> {
        let body: Option<String> = self
            .conn()
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.name(), id],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(text) => match serde_json::from_str(&text)? {
                Value::Object(map) => Ok(Some(map)),
                _ => Err(StoreError::NotAnObject {
                    collection: collection.name(),
                }),
            },
            None => Ok(None),
        }
    }

    fn store(&self, collection: Collection, id: &str, body: &Map<String, Value>) -> Result<()> {
        self.conn().execute(
            "UPDATE documents SET body = ?3, updated_at = ?4
             WHERE collection = ?1 AND id = ?2",
            params![
                collection.name(),
                id,
                serde_json::to_string(body)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn merge_fields(target: &mut Map<String, Value>, fields: &Map<String, Value>) {
    for (key, value) in fields {
        if key == "id" {
            continue;
        }
        if value.is_null() {
            target.remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn insert_and_find_in_order() {
        let db = db();
        db.insert_document(Collection::Lawyers, &json!({ "id": "l2", "name": "B" }))
            .unwrap();
        db.insert_document(Collection::Lawyers, &json!({ "id": "l1", "name": "A" }))
            .unwrap();

        let all = db.find_all(Collection::Lawyers).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["id"], "l2");
        assert_eq!(all[1]["id"], "l1");
        assert!(db.find_all(Collection::Clients).unwrap().is_empty());

        let found = db.find_by_id(Collection::Lawyers, "l1").unwrap();
        assert_eq!(found["name"], "A");
    }

    #[test]
    fn find_missing_is_not_found() {
        let db = db();
        let err = db.find_by_id(Collection::Cases, "nope").unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn insert_rejects_bad_documents() {
        let db = db();
        assert!(matches!(
            db.insert_document(Collection::Cases, &json!([1, 2])),
            Err(StoreError::NotAnObject { .. })
        ));
        assert!(matches!(
            db.insert_document(Collection::Cases, &json!({ "name": "x" })),
            Err(StoreError::MissingId { .. })
        ));

        db.insert_document(Collection::Cases, &json!({ "id": "case-1" }))
            .unwrap();
        assert!(matches!(
            db.insert_document(Collection::Cases, &json!({ "id": "case-1" })),
            Err(StoreError::Duplicate { .. })
        ));

        // Same id in another collection is fine.
        db.insert_document(Collection::Chats, &json!({ "id": "case-1" }))
            .unwrap();
    }

    #[test]
    fn set_fields_merges_and_unsets_null() {
        let db = db();
        db.insert_document(
            Collection::Cases,
            &json!({ "id": "case-1", "status": "completed", "result": "win", "closingNote": "Won" }),
        )
        .unwrap();

        let matched = db
            .set_fields(
                Collection::Cases,
                "case-1",
                &fields(json!({ "status": "active", "result": null, "closingNote": null, "id": "other" })),
            )
            .unwrap();
        assert!(matched);

        let doc = db.find_by_id(Collection::Cases, "case-1").unwrap();
        assert_eq!(doc["id"], "case-1");
        assert_eq!(doc["status"], "active");
        assert!(doc.get("result").is_none());
        assert!(doc.get("closingNote").is_none());

        assert!(!db
            .set_fields(Collection::Cases, "missing", &fields(json!({ "status": "active" })))
            .unwrap());
    }

    #[test]
    fn push_creates_and_appends() {
        let db = db();
        db.insert_document(Collection::Chats, &json!({ "id": "chat-req-1" }))
            .unwrap();

        for text in ["hi", "there"] {
            assert!(db
                .push_to_array(Collection::Chats, "chat-req-1", "messages", json!({ "text": text }))
                .unwrap());
        }

        let doc = db.find_by_id(Collection::Chats, "chat-req-1").unwrap();
        let messages = doc["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1]["text"], "there");

        assert!(!db
            .push_to_array(Collection::Chats, "missing", "messages", json!({}))
            .unwrap());
    }

    #[test]
    fn update_array_element_by_id() {
        let db = db();
        db.insert_document(
            Collection::Chats,
            &json!({
                "id": "chat-1",
                "messages": [
                    { "id": "m1", "text": "a" },
                    { "id": "m2", "text": "b" }
                ]
            }),
        )
        .unwrap();

        assert!(db
            .update_array_element(
                Collection::Chats,
                "chat-1",
                "messages",
                "m2",
                &fields(json!({ "deletedForEveryone": true })),
            )
            .unwrap());
        assert!(!db
            .update_array_element(Collection::Chats, "chat-1", "messages", "m9", &Map::new())
            .unwrap());

        let doc = db.find_by_id(Collection::Chats, "chat-1").unwrap();
        assert_eq!(doc["messages"][1]["deletedForEveryone"], true);
        assert!(doc["messages"][0].get("deletedForEveryone").is_none());
    }

    #[test]
    fn delete_and_snapshot() {
        let db = db();
        db.insert_document(Collection::Posts, &json!({ "id": "post-1" }))
            .unwrap();
        db.insert_document(Collection::Posts, &json!({ "id": "post-2" }))
            .unwrap();

        assert!(db.delete_document(Collection::Posts, "post-1").unwrap());
        assert!(!db.delete_document(Collection::Posts, "post-1").unwrap());

        let snapshot = db.snapshot().unwrap();
        assert_eq!(snapshot.len(), 6);
        assert_eq!(snapshot["posts"], json!([{ "id": "post-2" }]));
        assert_eq!(snapshot["clients"], json!([]));
    }
}
