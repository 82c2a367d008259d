//! Elasticsearch-backed contact storage
//!
//! One index, document id = contact id, `_source` = the contact JSON.
//! Searches return only the index's default page (10 hits); there is no
//! pagination.

use std::time::Duration;

use async_trait::async_trait;
use configs::ElasticConfig;
use models::{Contact, EditContact};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{apply_fav_action, ContactStorage, FilterField};
use crate::errors::{InternalError, StoreError};

/// Characters with meaning in Lucene regular expressions.
const REGEXP_RESERVED: &[char] = &[
    '.', '?', '+', '*', '|', '{', '}', '[', ']', '(', ')', '"', '\\', '#', '@', '&', '<', '>', '~',
];

/// Backslash-escape every Lucene regexp metacharacter so `value` matches literally.
pub fn escape_regexp(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if REGEXP_RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: Contact,
}

#[derive(Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<Contact>,
}

pub struct ElasticStorage {
    client: Client,
    base_url: Url,
    index: String,
    username: Option<String>,
    password: Option<String>,
}

impl ElasticStorage {
    pub fn new(cfg: &ElasticConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .danger_accept_invalid_certs(cfg.accept_invalid_certs)
            .build()?;
        let mut storage = Self::with_client(client, &cfg.url, &cfg.index)?;
        storage.username = cfg.username.clone();
        storage.password = cfg.password.clone();
        Ok(storage)
    }

    /// Build on an existing client without authentication.
    pub fn with_client(client: Client, base_url: &str, index: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| InternalError::InvalidEndpoint(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(InternalError::InvalidEndpoint(base_url.to_string()).into());
        }
        Ok(Self { client, base_url, index: index.to_string(), username: None, password: None })
    }

    /// `{base}/{index}/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(&self.index).extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.client.request(method, url);
        match &self.username {
            Some(user) => req.basic_auth(user, self.password.as_ref()),
            None => req,
        }
    }

    async fn ensure_success(resp: Response) -> Result<Response, StoreError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        warn!(status, %body, "search index request failed");
        Err(InternalError::Remote { status, body }.into())
    }

    async fn search(&self, query: Value) -> Result<Vec<Contact>, StoreError> {
        let resp = self
            .request(Method::POST, self.url(&["_search"]))
            .json(&json!({ "query": query }))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            // index not created yet
            debug!(index = %self.index, "search on missing index");
            return Ok(Vec::new());
        }
        let body: SearchResponse = Self::ensure_success(resp).await?.json().await?;
        Ok(body.hits.hits.into_iter().map(|h| h.source).collect())
    }

    async fn get(&self, id: &str) -> Result<Contact, StoreError> {
        let resp = self.request(Method::GET, self.url(&["_doc", id])).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let body: GetResponse = Self::ensure_success(resp).await?.json().await?;
        match body.source {
            Some(contact) if body.found => Ok(contact),
            _ => Err(StoreError::NotFound(id.to_string())),
        }
    }

    /// Full overwrite of the document.
    async fn put(&self, contact: &Contact) -> Result<(), StoreError> {
        let resp = self
            .request(Method::PUT, self.url(&["_doc", &contact.id]))
            .query(&[("refresh", "true")])
            .json(contact)
            .send()
            .await?;
        Self::ensure_success(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactStorage for ElasticStorage {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        self.search(json!({ "match_all": {} })).await
    }

    async fn add(&mut self, contact: Contact) -> Result<(), StoreError> {
        let resp = self
            .request(Method::PUT, self.url(&["_create", &contact.id]))
            .query(&[("refresh", "true")])
            .json(&contact)
            .send()
            .await?;
        if resp.status() == StatusCode::CONFLICT {
            return Err(StoreError::AlreadyExists(contact.id));
        }
        Self::ensure_success(resp).await?;
        debug!(id = %contact.id, "contact indexed");
        Ok(())
    }

    async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let resp = self
            .request(Method::DELETE, self.url(&["_doc", id]))
            .query(&[("refresh", "true")])
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Self::ensure_success(resp).await?;
        Ok(())
    }

    async fn edit(&mut self, patch: EditContact) -> Result<Contact, StoreError> {
        let mut contact = self.get(&patch.id).await?;
        contact.apply_patch(&patch);
        self.put(&contact).await?;
        Ok(contact)
    }

    async fn filter(&self, field: &str, value: &str) -> Result<Vec<Contact>, StoreError> {
        let field = FilterField::parse(field)?;
        // keyword sub-field from dynamic mapping: matches the whole value, not analyzed tokens
        let mut regexp = serde_json::Map::new();
        regexp.insert(
            format!("{}.keyword", field.as_str()),
            json!({ "value": format!(".*{}.*", escape_regexp(value)), "case_insensitive": true }),
        );
        self.search(json!({ "regexp": Value::Object(regexp) })).await
    }

    async fn list_favs(&self) -> Result<Vec<Contact>, StoreError> {
        self.search(json!({ "term": { "favorite": true } })).await
    }

    async fn change_favs(&mut self, id: &str, action: &str) -> Result<(), StoreError> {
        let mut contact = self.get(id).await?;
        apply_fav_action(&mut contact, action)?;
        self.put(&contact).await
    }
}
