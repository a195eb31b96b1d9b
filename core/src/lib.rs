//! Client core for a JSON:API-style CRM (people, events, donations,
//! surveys, survey responses).
//!
//! # Overview
//! The resource mapper turns flat local records into resource documents
//! and back. `CrmClient` wraps those documents in `HttpRequest` values and
//! unwraps `HttpResponse` values without touching the network
//! (host-does-IO). `CrmService` adds a `Transport` to run the round-trip.
//!
//! # Design
//! - Records are serde structs with all-`Option` fields; `Some` means
//!   "send this field", which is what partial updates rely on.
//! - Recognized fields and create defaults live in one table per type
//!   (`schema`), consulted once while a document is built.
//! - Event creates bundle a page through `included` + `temp-id`.

pub mod client;
pub mod document;
pub mod error;
pub mod http;
pub mod mapper;
pub mod resources;
pub mod schema;
pub mod service;
pub mod tag_list;
pub mod transport;

pub use client::CrmClient;
pub use document::{Envelope, FlatRecord, ResourceDocument, ResourceRef};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mapper::{CorrelationToken, Mode, PageTemplate, Resource};
pub use resources::{
    Donation, Event, Page, Person, QuestionFormat, QuestionStatus, Sex, Survey, SurveyQuestion,
    SurveyQuestionResponse,
};
pub use schema::ResourceType;
pub use service::CrmService;
pub use transport::{Transport, UreqTransport};
