//! HTTP request builder and response parser for the CRM API.
//!
//! # Design
//! `CrmClient` holds a `base_url`, the page template used by event creates
//! and the session's correlation-token sequence. Each operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`, so the host decides how the
//! round-trip happens. Both halves are generic over [`Resource`], which
//! gives one build/parse pair per resource type per verb.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::document::{FlatRecord, ListEnvelope, SingleEnvelope};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::mapper::{self, CreateContext, PageTemplate, Resource, TokenSequence};
use crate::schema::ResourceType;

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct CrmClient {
    base_url: String,
    page_template: PageTemplate,
    tokens: Arc<TokenSequence>,
}

impl CrmClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_template: PageTemplate::default(),
            tokens: Arc::new(TokenSequence::default()),
        }
    }

    pub fn with_page_template(mut self, page_template: PageTemplate) -> Self {
        self.page_template = page_template;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list(&self, kind: ResourceType) -> HttpRequest {
        request(HttpMethod::Get, self.collection_url(kind), None)
    }

    pub fn build_get(&self, kind: ResourceType, id: &str) -> HttpRequest {
        request(HttpMethod::Get, self.member_url(kind, id), None)
    }

    pub fn build_create<R: Resource>(&self, record: &R) -> Result<HttpRequest, ApiError> {
        self.build_create_at(record, Utc::now())
    }

    /// Like [`CrmClient::build_create`] with an explicit clock reading for
    /// the correlation token.
    pub fn build_create_at<R: Resource>(&self, record: &R, at: DateTime<Utc>) -> Result<HttpRequest, ApiError> {
        let ctx = CreateContext {
            token: self.tokens.mint(at),
            page_template: &self.page_template,
        };
        let envelope = mapper::encode_create(record, &ctx)?;
        let body = serde_json::to_string(&envelope).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        debug!(kind = %R::KIND, %body, "create payload");
        Ok(request(HttpMethod::Post, self.collection_url(R::KIND), Some(body)))
    }

    pub fn build_update<R: Resource>(&self, id: &str, record: &R) -> Result<HttpRequest, ApiError> {
        let envelope = mapper::encode_update(id, record)?;
        let body = serde_json::to_string(&envelope).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(request(
            R::KIND.update_method(),
            self.member_url(R::KIND, id),
            Some(body),
        ))
    }

    pub fn build_delete(&self, kind: ResourceType, id: &str) -> HttpRequest {
        request(HttpMethod::Delete, self.member_url(kind, id), None)
    }

    /// Surveys whose name equals `name` (`filter[name]`, brackets escaped).
    pub fn build_find_surveys_by_name(&self, name: &str) -> HttpRequest {
        let url = format!(
            "{}?filter%5Bname%5D={}",
            self.collection_url(ResourceType::Surveys),
            urlencoding::encode(name)
        );
        request(HttpMethod::Get, url, None)
    }

    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        let envelope: ListEnvelope = parse_body(&response)?;
        mapper::decode_list(&envelope.data)
    }

    /// Untyped variant of [`CrmClient::parse_list`]: `{ id, ..attributes }`
    /// per document.
    pub fn parse_list_flat(&self, response: HttpResponse) -> Result<Vec<FlatRecord>, ApiError> {
        let envelope: ListEnvelope = parse_body(&response)?;
        Ok(envelope.data.iter().map(|document| document.flatten()).collect())
    }

    pub fn parse_one<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        let envelope: SingleEnvelope = parse_body(&response)?;
        mapper::decode(&envelope.data)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    /// Whether a `build_find_surveys_by_name` response matched anything.
    pub fn parse_name_taken(&self, response: HttpResponse) -> Result<bool, ApiError> {
        let envelope: ListEnvelope = parse_body(&response)?;
        Ok(!envelope.data.is_empty())
    }

    fn collection_url(&self, kind: ResourceType) -> String {
        format!("{}/{}", self.base_url, kind.tag())
    }

    fn member_url(&self, kind: ResourceType, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.tag(), urlencoding::encode(id))
    }
}

fn request(method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
    let mut headers = vec![("accept".to_string(), JSON.to_string())];
    if method.is_mutating() {
        headers.push(("content-type".to_string(), JSON.to_string()));
    }
    HttpRequest {
        method,
        path,
        headers,
        body,
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_body<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
