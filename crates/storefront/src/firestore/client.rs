//! The Firestore REST client.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::FirebaseConfig;

use super::FirestoreError;
use super::documents::{Document, Write};
use super::query::StructuredQuery;

/// Client for the Firestore REST v1 API.
///
/// Cheaply cloneable; all clones share one HTTP connection pool.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    /// API base, e.g. `https://firestore.googleapis.com/v1`.
    endpoint: String,
    /// `projects/{id}/databases/(default)/documents`.
    documents_root: String,
    api_key: SecretString,
}

/// Response shape of `ListDocuments`. The `documents` key is absent entirely
/// for an empty collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// One entry of a `runQuery` response stream. Entries without a `document`
/// carry only read metadata and are skipped.
#[derive(Debug, Deserialize)]
struct RunQueryEntry {
    document: Option<Document>,
}

#[derive(Debug, serde::Serialize)]
struct RunQueryRequest {
    #[serde(rename = "structuredQuery")]
    structured_query: StructuredQuery,
}

#[derive(Debug, serde::Serialize)]
struct CommitRequest {
    writes: Vec<Write>,
}

impl FirestoreClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not a valid URL or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &FirebaseConfig, timeout: Duration) -> Result<Self, FirestoreError> {
        // Validate the endpoint up front so a typo fails at startup, not on
        // the first catalog load.
        Url::parse(&config.endpoint)?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(FirestoreClientInner {
                client,
                endpoint: config.endpoint.trim_end_matches('/').to_string(),
                documents_root: config.documents_root(),
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// The full resource name for a document path, e.g.
    /// `orders/o1` -> `projects/p/databases/(default)/documents/orders/o1`.
    #[must_use]
    pub fn document_name(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.documents_root)
    }

    /// Read a whole collection (or sub-collection), following pagination.
    ///
    /// `path` is relative to the documents root, e.g. `categories` or
    /// `products/abc123/variants`.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn list_documents(&self, path: &str) -> Result<Vec<Document>, FirestoreError> {
        let url = format!(
            "{}/{}/{path}",
            self.inner.endpoint, self.inner.documents_root
        );

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("key".to_string(), self.expose_key().to_string()),
                ("pageSize".to_string(), "300".to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken".to_string(), token.clone()));
            }

            let request = self.inner.client.get(&url).query(&params);
            let page: ListDocumentsResponse = self.send(request).await?;

            documents.extend(page.documents);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    /// Run a structured query against the documents root.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is unparseable.
    #[instrument(skip(self, query))]
    pub async fn run_query(
        &self,
        query: StructuredQuery,
    ) -> Result<Vec<Document>, FirestoreError> {
        let url = format!(
            "{}/{}:runQuery",
            self.inner.endpoint, self.inner.documents_root
        );

        let request = self
            .inner
            .client
            .post(&url)
            .query(&[("key", self.expose_key())])
            .json(&RunQueryRequest {
                structured_query: query,
            });

        let entries: Vec<RunQueryEntry> = self.send(request).await?;

        Ok(entries.into_iter().filter_map(|e| e.document).collect())
    }

    /// Apply a batch of writes atomically. Either every write lands or none
    /// does.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit is rejected or the request fails; on
    /// error, none of the writes have been applied.
    #[instrument(skip(self, writes), fields(write_count = writes.len()))]
    pub async fn commit(&self, writes: Vec<Write>) -> Result<(), FirestoreError> {
        let url = format!(
            "{}/{}:commit",
            self.inner.endpoint, self.inner.documents_root
        );

        let request = self
            .inner
            .client
            .post(&url)
            .query(&[("key", self.expose_key())])
            .json(&CommitRequest { writes });

        // The commit response (write results, commit time) is not used.
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }

    /// Send a request and parse the JSON response. The body is read as text
    /// first so a non-success status or a parse failure can be logged with
    /// (truncated) payload context.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FirestoreError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body, 500),
                "Firestore returned non-success status"
            );
            return Err(FirestoreError::Status {
                status,
                body: truncate(&body, 200).to_string(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&body, 500),
                    "Failed to parse Firestore response"
                );
                Err(FirestoreError::Parse(e))
            }
        }
    }

    fn expose_key(&self) -> &str {
        self.inner.api_key.expose_secret()
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s.get(..idx).unwrap_or(s),
        None => s,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> FirebaseConfig {
        FirebaseConfig {
            project_id: "ayushyaa-test".to_string(),
            api_key: SecretString::from("test-key"),
            endpoint: endpoint.to_string(),
        }
    }

    #[test]
    fn test_invalid_endpoint_rejected_at_construction() {
        let result = FirestoreClient::new(&config("not a url"), Duration::from_secs(5));
        assert!(matches!(result, Err(FirestoreError::Url(_))));
    }

    #[test]
    fn test_document_name_includes_root() {
        let client =
            FirestoreClient::new(&config("http://localhost:8080/v1"), Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.document_name("orders/o1"),
            "projects/ayushyaa-test/databases/(default)/documents/orders/o1"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 2), "he");
        // Multi-byte characters must not be split
        assert_eq!(truncate("₹₹₹₹", 2), "₹₹");
    }
}
