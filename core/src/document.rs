//! Wire shape of the CRM's JSON:API-style resource documents.
//!
//! # Design
//! A request or response body is an `Envelope` whose `data` is either one
//! `ResourceDocument` or a list of them. `included` carries auxiliary
//! documents created in the same request; they are addressed by `temp-id`
//! until the server assigns real ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name to value mapping carried inside a document.
pub type Attributes = Map<String, Value>;

/// A flat local record: `id` plus every attribute, side by side.
pub type FlatRecord = Map<String, Value>;

pub type Relationships = BTreeMap<String, Relationship>;

/// One unit of exchange with the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDocument {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "temp-id", default, skip_serializing_if = "Option::is_none")]
    pub temp_id: Option<String>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: Relationships,
}

impl ResourceDocument {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            temp_id: None,
            attributes: Attributes::new(),
            relationships: Relationships::new(),
        }
    }

    /// Flatten into `{ id, ..attributes }`. The document id wins over an
    /// attribute that happens to be called `id`.
    pub fn flatten(&self) -> FlatRecord {
        let mut record = self.attributes.clone();
        match &self.id {
            Some(id) => {
                record.insert("id".to_string(), Value::String(id.clone()));
            }
            None => {
                record.remove("id");
            }
        }
        record
    }

    /// Id referenced by a to-one relationship, if any.
    pub fn related_id(&self, name: &str) -> Option<&str> {
        match self.relationships.get(name)?.data.as_ref()? {
            RelationshipData::One(reference) => reference.id.as_deref(),
            RelationshipData::Many(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
}

impl Relationship {
    pub fn to_one(reference: ResourceRef) -> Self {
        Self {
            data: Some(RelationshipData::One(reference)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    One(ResourceRef),
    Many(Vec<ResourceRef>),
}

/// Reference to another resource, either by server id or by a temporary
/// id that names an entry of `included` in the same request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "temp-id", default, skip_serializing_if = "Option::is_none")]
    pub temp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<RefMethod>,
}

impl ResourceRef {
    pub fn existing(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
            temp_id: None,
            method: None,
        }
    }

    pub fn pending(kind: impl Into<String>, temp_id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            temp_id: Some(temp_id.into()),
            method: Some(RefMethod::Create),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefMethod {
    Create,
}

/// Top-level body: `{ "data": ..., "included": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<D> {
    pub data: D,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceDocument>,
}

impl<D> Envelope<D> {
    pub fn new(data: D) -> Self {
        Self {
            data,
            included: Vec::new(),
        }
    }
}

pub type SingleEnvelope = Envelope<ResourceDocument>;
pub type ListEnvelope = Envelope<Vec<ResourceDocument>>;
