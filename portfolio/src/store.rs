use crate::models::{Collection, Document, Record};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 300;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Read-only access to the remote document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;
}

/// Fetches a whole collection and converts it into typed records.
pub async fn fetch_records<T: Record>(store: &dyn DocumentStore) -> Result<Vec<T>, StoreError> {
    let documents = store.fetch_collection(T::COLLECTION).await?;
    Ok(documents.into_iter().map(T::from_document).collect())
}

/// Firestore REST client reading `projects/{project}/databases/(default)/documents`.
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
    page_size: u32,
}

impl FirestoreStore {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        FirestoreStore {
            client,
            base_url: base_url.into(),
            project_id: project_id.into(),
            api_key,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            collection
        )
    }
}

#[derive(Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", self.page_size.to_string())]);
            if let Some(key) = &self.api_key {
                request = request.query(&[("key", key)]);
            }
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(StoreError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: ListDocumentsResponse = response.json().await?;
            for raw in page.documents {
                documents.push(decode_document(raw)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(%collection, count = documents.len(), "Fetched collection");
        Ok(documents)
    }
}

fn decode_document(raw: RawDocument) -> Result<Document, StoreError> {
    // Document names end in `/documents/{collection}/{id}`.
    let id = raw
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::Malformed(raw.name.clone()))?
        .to_string();

    Ok(Document {
        id,
        fields: decode_fields(raw.fields),
    })
}

fn decode_fields(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key, decode_value(value)))
        .collect()
}

/// Unwraps a Firestore typed value (`{"stringValue": "x"}`) into plain JSON.
fn decode_value(value: Value) -> Value {
    let Value::Object(typed) = value else {
        return Value::Null;
    };
    let Some((kind, inner)) = typed.into_iter().next() else {
        return Value::Null;
    };

    match (kind.as_str(), inner) {
        ("nullValue", _) => Value::Null,
        ("integerValue", Value::String(digits)) => digits
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or(Value::String(digits)),
        ("arrayValue", Value::Object(mut array)) => match array.remove("values") {
            Some(Value::Array(items)) => {
                Value::Array(items.into_iter().map(decode_value).collect())
            }
            _ => Value::Array(Vec::new()),
        },
        ("mapValue", Value::Object(mut map)) => match map.remove("fields") {
            Some(Value::Object(fields)) => Value::Object(decode_fields(fields)),
            _ => Value::Object(Map::new()),
        },
        (_, inner) => inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Certificate, Project};
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn store(base_url: String) -> FirestoreStore {
        FirestoreStore::new(Client::new(), base_url, "demo", Some("secret".into()))
    }

    #[test]
    fn decodes_typed_values() {
        let value = json!({
            "mapValue": {
                "fields": {
                    "name": { "stringValue": "Rust" },
                    "count": { "integerValue": "12" },
                    "ratio": { "doubleValue": 0.5 },
                    "live": { "booleanValue": true },
                    "gone": { "nullValue": null },
                    "tags": { "arrayValue": { "values": [
                        { "stringValue": "a" },
                        { "stringValue": "b" }
                    ] } },
                    "empty": { "arrayValue": {} }
                }
            }
        });

        assert_eq!(
            decode_value(value),
            json!({
                "name": "Rust",
                "count": 12,
                "ratio": 0.5,
                "live": true,
                "gone": null,
                "tags": ["a", "b"],
                "empty": [],
            })
        );
    }

    #[test]
    fn document_id_is_last_name_segment() {
        let raw = RawDocument {
            name: "projects/demo/databases/(default)/documents/projects/car".into(),
            fields: Map::new(),
        };
        assert_eq!(decode_document(raw).unwrap().id, "car");

        let raw = RawDocument {
            name: "projects/demo/databases/(default)/documents/projects/".into(),
            fields: Map::new(),
        };
        assert!(matches!(
            decode_document(raw),
            Err(StoreError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn follows_page_tokens_until_exhausted() {
        let app = Router::new().route(
            "/v1/projects/demo/databases/(default)/documents/:collection",
            get(
                |Path(collection): Path<String>,
                 Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(collection, "projects");
                    assert_eq!(params.get("key").map(String::as_str), Some("secret"));
                    let doc = |id: &str, title: &str| {
                        json!({
                            "name": format!("projects/demo/databases/(default)/documents/projects/{id}"),
                            "fields": { "Title": { "stringValue": title } }
                        })
                    };
                    match params.get("pageToken").map(String::as_str) {
                        None => Json(json!({
                            "documents": [doc("a", "First")],
                            "nextPageToken": "page-2"
                        })),
                        Some("page-2") => Json(json!({ "documents": [doc("b", "Second")] })),
                        Some(other) => panic!("unexpected token {other}"),
                    }
                },
            ),
        );
        let store = store(spawn(app).await).with_page_size(1);

        let projects: Vec<Project> = fetch_records(&store).await.unwrap();
        let ids: Vec<_> = projects.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(projects[1].title.as_deref(), Some("Second"));
    }

    #[tokio::test]
    async fn empty_collection_yields_no_records() {
        let app = Router::new().route(
            "/v1/projects/demo/databases/(default)/documents/certificates",
            get(|| async { Json(json!({})) }),
        );
        let store = store(spawn(app).await);

        let certificates: Vec<Certificate> = fetch_records(&store).await.unwrap();
        assert!(certificates.is_empty());
    }

    #[tokio::test]
    async fn error_status_is_propagated() {
        let app = Router::new().route(
            "/v1/projects/demo/databases/(default)/documents/projects",
            get(|| async { (StatusCode::FORBIDDEN, "denied").into_response() }),
        );
        let store = store(spawn(app).await);

        match store.fetch_collection(Collection::Projects).await {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "denied");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
