//! Translation between flat local records and resource documents.
//!
//! # Design
//! Every resource record is a serde struct whose fields are all `Option`,
//! serialized with `skip_serializing_if`. A field is "present" exactly when
//! it is `Some`, so a partial update can carry `0`, `false` or `""`.
//!
//! Outgoing documents are built in one pass: serialize, keep recognized
//! fields, normalize, inject the type's default table (create only), attach
//! relationships, then attach the compound `included` bundle if the type
//! declares one. Nothing here touches the network.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::document::{
    Attributes, Envelope, FlatRecord, Relationship, Relationships, ResourceDocument, ResourceRef,
    SingleEnvelope,
};
use crate::error::ApiError;
use crate::schema::ResourceType;

/// Direction-specific rules for building an outgoing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// A local record that maps onto one CRM resource type.
pub trait Resource: Serialize + DeserializeOwned + fmt::Debug {
    const KIND: ResourceType;

    /// Fixed relationships for an outgoing document.
    fn relationships(&self, _mode: Mode) -> Result<Relationships, ApiError> {
        Ok(Relationships::new())
    }

    /// Rewrite recognized attributes into their wire form.
    fn normalize(_attributes: &mut Attributes) -> Result<(), ApiError> {
        Ok(())
    }

    /// Secondary resource created atomically with this one on create.
    fn bundle(&self, _ctx: &CreateContext<'_>) -> Option<Bundle> {
        None
    }

    /// Copy relationship ids an incoming document carries into the flat
    /// record before it is deserialized.
    fn absorb_relationships(_record: &mut FlatRecord, _document: &ResourceDocument) {}
}

/// A dependent document to be created in the same request. The mapper
/// assigns its `temp-id` and the matching relationship reference.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub relationship: &'static str,
    pub document: ResourceDocument,
}

/// Unique, time-based string shared by a compound create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    pub fn new(at: DateTime<Utc>, sequence: u64) -> Self {
        Self(format!("event-{}-{sequence}", at.format("%Y-%m-%dT%H-%M-%S-%3fZ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-session source of correlation tokens. The sequence keeps tokens
/// minted within the same millisecond distinct.
#[derive(Debug, Default)]
pub struct TokenSequence {
    next: AtomicU64,
}

impl TokenSequence {
    pub fn mint(&self, at: DateTime<Utc>) -> CorrelationToken {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        CorrelationToken::new(at, sequence)
    }
}

/// Attributes of the page created alongside every new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    pub site_id: String,
    pub author_id: String,
    pub status: String,
    pub name: String,
    pub headline: String,
    pub title: String,
    pub excerpt: String,
    pub page_type_name: String,
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self {
            site_id: "1".to_string(),
            author_id: "1".to_string(),
            status: "unlisted".to_string(),
            name: "Page Name".to_string(),
            headline: "Page headline".to_string(),
            title: "Page Title".to_string(),
            excerpt: "Page excerpt...".to_string(),
            page_type_name: "Basic".to_string(),
        }
    }
}

impl PageTemplate {
    /// Page document for `token`; `slug` and `external_id` both carry it.
    pub fn document(&self, token: &CorrelationToken) -> ResourceDocument {
        let mut page = ResourceDocument::new(ResourceType::Pages.tag());
        let attributes = &mut page.attributes;
        attributes.insert("site_id".into(), self.site_id.clone().into());
        attributes.insert("author_id".into(), self.author_id.clone().into());
        attributes.insert("external_id".into(), token.as_str().into());
        attributes.insert("slug".into(), token.as_str().into());
        attributes.insert("status".into(), self.status.clone().into());
        attributes.insert("name".into(), self.name.clone().into());
        attributes.insert("headline".into(), self.headline.clone().into());
        attributes.insert("title".into(), self.title.clone().into());
        attributes.insert("excerpt".into(), self.excerpt.clone().into());
        attributes.insert("page_type_name".into(), self.page_type_name.clone().into());
        page
    }
}

/// Inputs a create needs beyond the record itself.
#[derive(Debug, Clone)]
pub struct CreateContext<'a> {
    pub token: CorrelationToken,
    pub page_template: &'a PageTemplate,
}

/// Build the request body for creating `record`.
pub fn encode_create<R: Resource>(record: &R, ctx: &CreateContext<'_>) -> Result<SingleEnvelope, ApiError> {
    let kind = R::KIND;
    let mut attributes = recognized_attributes(record, kind)?;
    R::normalize(&mut attributes)?;
    for (field, value) in kind.defaults() {
        attributes.entry(field).or_insert(value);
    }

    let mut data = ResourceDocument::new(kind.tag());
    data.attributes = attributes;
    data.relationships = record.relationships(Mode::Create)?;

    let mut envelope = Envelope::new(data);
    if let Some(Bundle {
        relationship,
        mut document,
    }) = record.bundle(ctx)
    {
        let temp_id = ctx.token.as_str().to_string();
        document.temp_id = Some(temp_id.clone());
        envelope.data.relationships.insert(
            relationship.to_string(),
            Relationship::to_one(ResourceRef::pending(document.kind.clone(), temp_id)),
        );
        envelope.included.push(document);
    }

    debug!(kind = %kind, included = envelope.included.len(), "built create document");
    Ok(envelope)
}

/// Build the request body for a partial update of `id`. Only fields that
/// are present on `record` are emitted, and no defaults are injected.
pub fn encode_update<R: Resource>(id: &str, record: &R) -> Result<SingleEnvelope, ApiError> {
    let kind = R::KIND;
    let mut attributes = recognized_attributes(record, kind)?;
    R::normalize(&mut attributes)?;

    let mut data = ResourceDocument::new(kind.tag());
    data.id = Some(id.to_string());
    data.attributes = attributes;
    data.relationships = record.relationships(Mode::Update)?;

    debug!(kind = %kind, id, fields = data.attributes.len(), "built update document");
    Ok(Envelope::new(data))
}

/// Flatten one incoming document into a typed record.
pub fn decode<R: Resource>(document: &ResourceDocument) -> Result<R, ApiError> {
    if document.kind != R::KIND.tag() {
        warn!(expected = %R::KIND, found = %document.kind, "decoding document of unexpected type");
    }
    let mut record = document.flatten();
    R::absorb_relationships(&mut record, document);
    serde_json::from_value(Value::Object(record)).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Flatten a list of documents, keeping server order.
pub fn decode_list<R: Resource>(documents: &[ResourceDocument]) -> Result<Vec<R>, ApiError> {
    documents.iter().map(decode).collect()
}

fn recognized_attributes<R: Serialize>(record: &R, kind: ResourceType) -> Result<Attributes, ApiError> {
    let value = serde_json::to_value(record).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(ApiError::SerializationError(format!(
            "{kind} record did not serialize to an object"
        )));
    };
    Ok(fields.into_iter().filter(|(name, _)| kind.recognizes(name)).collect())
}
