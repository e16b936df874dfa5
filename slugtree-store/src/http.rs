//! HTTP content repository.
//!
//! Talks to a JSON content API shaped like the common headless CMS
//! delivery/management APIs:
//!
//! | operation | request |
//! |---|---|
//! | get entry | `GET {base}/entries/{id}` |
//! | query | `GET {base}/entries?content_type=a,b&parent=<id>&fields.<f>=<v>&limit=<n>&select=<f,..>` |
//! | write field | `PUT {base}/entries/{id}/fields/{field}` with `{"value": ...}` |
//! | sys | `GET {base}/entries/{id}/sys` |

use crate::{ContentRepository, EntryFilter, FieldUpdate, ParentFilter, StorageError, StorageResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slugtree_model::{Entry, EntrySys, FieldMapping, RawEntry};
use slugtree_types::{EntryField, EntryId};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for [`HttpRepository`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRepositoryConfig {
    /// API root, e.g. `https://cms.example.com/spaces/main`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub access_token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub field_mapping: FieldMapping,
}

impl Default for HttpRepositoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            access_token: None,
            timeout_secs: 30,
            field_mapping: FieldMapping::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntryCollection {
    items: Vec<RawEntry>,
}

/// [`ContentRepository`] backed by a remote JSON API.
pub struct HttpRepository {
    config: HttpRepositoryConfig,
    client: Client,
}

impl HttpRepository {
    /// Creates a new HTTP repository.
    pub fn new(config: HttpRepositoryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    pub fn config(&self) -> &HttpRepositoryConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn entry_url(&self, id: &EntryId) -> String {
        self.url(&format!("/entries/{}", urlencoding::encode(id.as_str())))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> StorageResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StorageError::Network(format!("{what} failed: {e}")))?;
        check_status(response, what).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> StorageResult<T> {
        let body = response
            .text()
            .await
            .map_err(|e| StorageError::Network(format!("{what}: failed to read body: {e}")))?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Query parameters for a filter, in a stable order.
    fn query_params(&self, filter: &EntryFilter) -> Vec<(String, String)> {
        let mapping = &self.config.field_mapping;
        let mut params = Vec::new();

        if !filter.content_types.is_empty() {
            let types: Vec<&str> = filter.content_types.iter().map(|t| t.as_str()).collect();
            params.push(("content_type".to_string(), types.join(",")));
        }
        match &filter.parent {
            ParentFilter::Any => {}
            ParentFilter::Equals(id) => params.push(("parent".to_string(), id.to_string())),
            ParentFilter::Missing => params.push(("parent.exists".to_string(), "false".to_string())),
        }
        if let Some(id) = &filter.exclude {
            params.push(("sys.id[ne]".to_string(), id.to_string()));
        }
        for (field, value) in &filter.field_equals {
            params.push((format!("fields.{}", mapping.field_id(*field)), value.clone()));
        }
        if let Some(limit) = filter.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if !filter.select.is_empty() {
            // Title is required to validate an entry, so it is always projected.
            let mut fields = vec![mapping.field_id(EntryField::Title)];
            for field in &filter.select {
                let id = mapping.field_id(*field);
                if !fields.contains(&id) {
                    fields.push(id);
                }
            }
            params.push(("select".to_string(), fields.join(",")));
        }
        params
    }
}

async fn check_status(response: Response, what: &str) -> StorageResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::NOT_FOUND => StorageError::NotFound(format!("{what}: {body}")),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StorageError::Permission(format!("{what}: {body}"))
        }
        _ => {
            warn!("{what} returned {status}");
            StorageError::Status {
                status: status.as_u16(),
                body,
            }
        }
    })
}

#[async_trait]
impl ContentRepository for HttpRepository {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn get_entry(&self, id: &EntryId) -> StorageResult<Entry> {
        let what = format!("get entry {id}");
        let response = self.send(self.client.get(self.entry_url(id)), &what).await?;
        let raw: RawEntry = Self::read_json(response, &what).await?;
        Ok(Entry::from_raw(&raw, &self.config.field_mapping)?)
    }

    async fn query_entries(&self, filter: &EntryFilter) -> StorageResult<Vec<Entry>> {
        let params = self.query_params(filter);
        debug!("querying entries: {params:?}");

        let request = self.client.get(self.url("/entries")).query(&params);
        let response = self.send(request, "query entries").await?;
        let collection: EntryCollection = Self::read_json(response, "query entries").await?;

        let mut entries = Vec::with_capacity(collection.items.len());
        for raw in &collection.items {
            match Entry::from_raw(raw, &self.config.field_mapping) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("skipping {} in query results: {e}", raw.sys.id),
            }
        }
        Ok(entries)
    }

    async fn set_field(&self, id: &EntryId, update: FieldUpdate) -> StorageResult<()> {
        let field_id = self.config.field_mapping.field_id(update.field());
        let url = format!(
            "{}/fields/{}",
            self.entry_url(id),
            urlencoding::encode(field_id)
        );
        let what = format!("write {id}.{field_id}");
        let body = serde_json::json!({ "value": update.to_value() });

        self.send(self.client.put(url).json(&body), &what).await?;
        debug!("{what} ok");
        Ok(())
    }

    async fn get_sys(&self, id: &EntryId) -> StorageResult<EntrySys> {
        let what = format!("get sys {id}");
        let url = format!("{}/sys", self.entry_url(id));
        let response = self.send(self.client.get(url), &what).await?;
        Self::read_json(response, &what).await
    }
}
