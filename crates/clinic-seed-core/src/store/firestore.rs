//! Hosted document store over the Firestore REST API (v1).

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::value::{decode_fields, encode, encode_fields};
use super::{
    auto_id, validate_field_path, Document, DocumentStore, Fields, StoreError, StoreResult,
};

const PRODUCTION_ENDPOINT: &str = "https://firestore.googleapis.com";

/// Token the emulator accepts as a privileged caller (security rules bypassed).
const EMULATOR_BEARER: &str = "owner";

const LIST_PAGE_SIZE: usize = 300;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Which deployment the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirestoreMode {
    /// Local emulator at `host:port`, no credentials.
    Emulator { host: String },
    /// Hosted service, authenticated with an OAuth access token.
    Production { access_token: String },
}

/// Blocking REST client for one project's default database.
pub struct FirestoreClient {
    project_id: String,
    documents_url: String,
    bearer: String,
    client: reqwest::blocking::Client,
}

impl FirestoreClient {
    /// Create a client for `project_id` in the given mode.
    pub fn new(project_id: &str, mode: &FirestoreMode) -> StoreResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let (endpoint, bearer) = match mode {
            FirestoreMode::Emulator { host } => (
                format!("http://{}", host.trim_end_matches('/')),
                EMULATOR_BEARER.to_string(),
            ),
            FirestoreMode::Production { access_token } => {
                (PRODUCTION_ENDPOINT.to_string(), access_token.clone())
            }
        };

        Ok(Self {
            project_id: project_id.to_string(),
            documents_url: format!("{}/v1/{}", endpoint, documents_root(project_id)),
            bearer,
            client,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Root URL that collection paths and `:runQuery`-style verbs hang off.
    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", documents_root(&self.project_id), collection, id)
    }

    fn post(&self, url: &str, body: &Value) -> StoreResult<reqwest::blocking::Response> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.bearer)
            .json(body)
            .send()?;
        check_status(response)
    }

    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> StoreResult<reqwest::blocking::Response> {
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.bearer)
            .send()?;
        check_status(response)
    }
}

impl DocumentStore for FirestoreClient {
    fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        validate_field_path(field)?;
        let url = format!("{}:runQuery", self.documents_url);
        let rows: Vec<QueryRow> = self
            .post(&url, &equality_query(collection, field, value, limit))?
            .json()?;

        rows.into_iter()
            .filter_map(|row| row.document)
            .map(RestDocument::into_document)
            .collect()
    }

    fn scan(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = format!("{}/{}", self.documents_url, collection);
            let mut query = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: ListResponse = self.get(&url, &query)?.json()?;
            for doc in page.documents {
                documents.push(doc.into_document()?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    fn insert(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let id = auto_id();
        let url = format!("{}/{}?documentId={}", self.documents_url, collection, id);
        self.post(&url, &json!({ "fields": encode_fields(&fields) }))?;
        tracing::debug!(collection, id = %id, "inserted document");
        Ok(id)
    }

    fn insert_batch(&self, collection: &str, docs: Vec<Fields>) -> StoreResult<Vec<String>> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = docs.iter().map(|_| auto_id()).collect();
        let writes: Vec<Value> = ids
            .iter()
            .zip(&docs)
            .map(|(id, fields)| {
                json!({
                    "update": {
                        "name": self.document_name(collection, id),
                        "fields": encode_fields(fields),
                    },
                    "currentDocument": { "exists": false },
                })
            })
            .collect();

        let url = format!("{}:commit", self.documents_url);
        self.post(&url, &json!({ "writes": writes }))?;
        tracing::debug!(collection, count = ids.len(), "committed batch");
        Ok(ids)
    }

    fn count(&self, collection: &str) -> StoreResult<u64> {
        let url = format!("{}:runAggregationQuery", self.documents_url);
        let rows: Vec<AggregationRow> = self.post(&url, &count_query(collection))?.json()?;

        let count = rows
            .into_iter()
            .filter_map(|row| row.result)
            .find_map(|result| result.aggregate_fields.get("count").cloned())
            .ok_or_else(|| StoreError::Decode("aggregation returned no count".into()))?;

        super::value::decode(&count)?
            .as_u64()
            .ok_or_else(|| StoreError::Decode(format!("count is not an integer: {}", count)))
    }
}

fn documents_root(project_id: &str) -> String {
    format!("projects/{}/databases/(default)/documents", project_id)
}

fn check_status(
    response: reqwest::blocking::Response,
) -> StoreResult<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Structured query matching `field == value` in one collection.
fn equality_query(collection: &str, field: &str, value: &Value, limit: usize) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": encode(value),
                }
            },
            "limit": limit,
        }
    })
}

/// Aggregation query counting a whole collection.
fn count_query(collection: &str) -> Value {
    json!({
        "structuredAggregationQuery": {
            "structuredQuery": { "from": [{ "collectionId": collection }] },
            "aggregations": [{ "alias": "count", "count": {} }],
        }
    })
}

#[derive(Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Value,
}

impl RestDocument {
    fn into_document(self) -> StoreResult<Document> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StoreError::Decode(format!("malformed document name: {}", self.name)))?
            .to_string();
        Ok(Document::new(id, decode_fields(&self.fields)?))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RestDocument>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct QueryRow {
    document: Option<RestDocument>,
}

#[derive(Deserialize)]
struct AggregationRow {
    result: Option<AggregationResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregationResult {
    aggregate_fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emulator_urls() {
        let client = FirestoreClient::new(
            "demo-clinic",
            &FirestoreMode::Emulator {
                host: "127.0.0.1:8080".into(),
            },
        )
        .unwrap();
        assert_eq!(
            client.documents_url(),
            "http://127.0.0.1:8080/v1/projects/demo-clinic/databases/(default)/documents"
        );
        assert_eq!(client.bearer, "owner");
        assert_eq!(
            client.document_name("patients", "abc"),
            "projects/demo-clinic/databases/(default)/documents/patients/abc"
        );
    }

    #[test]
    fn test_production_urls() {
        let client = FirestoreClient::new(
            "clinic-prod",
            &FirestoreMode::Production {
                access_token: "ya29.token".into(),
            },
        )
        .unwrap();
        assert!(client
            .documents_url()
            .starts_with("https://firestore.googleapis.com/v1/projects/clinic-prod/"));
        assert_eq!(client.bearer, "ya29.token");
        assert_eq!(client.project_id(), "clinic-prod");
    }

    #[test]
    fn test_equality_query_shape() {
        let query = equality_query("staffData", "email", &json!("doctor@gmail.com"), 1);
        let filter = &query["structuredQuery"]["where"]["fieldFilter"];
        assert_eq!(filter["field"]["fieldPath"], "email");
        assert_eq!(filter["op"], "EQUAL");
        assert_eq!(filter["value"]["stringValue"], "doctor@gmail.com");
        assert_eq!(query["structuredQuery"]["limit"], 1);
        assert_eq!(
            query["structuredQuery"]["from"][0]["collectionId"],
            "staffData"
        );
    }

    #[test]
    fn test_count_query_shape() {
        let query = count_query("invoices");
        let aggregation = &query["structuredAggregationQuery"];
        assert_eq!(aggregation["aggregations"][0]["alias"], "count");
        assert_eq!(
            aggregation["structuredQuery"]["from"][0]["collectionId"],
            "invoices"
        );
    }

    #[test]
    fn test_rest_document_id_extraction() {
        let rest: RestDocument = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/patients/Xy12",
            "fields": {"name": {"stringValue": "Meera"}}
        }))
        .unwrap();
        let doc = rest.into_document().unwrap();
        assert_eq!(doc.id, "Xy12");
        assert_eq!(doc.get_str("name"), Some("Meera"));
    }

    #[test]
    fn test_query_rows_without_documents() {
        // Empty result sets come back as a bare read-time row.
        let rows: Vec<QueryRow> =
            serde_json::from_value(json!([{"readTime": "2026-10-18T00:00:00Z"}])).unwrap();
        assert!(rows[0].document.is_none());
    }
}
