use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Attributes;
use crate::error::ApiError;
use crate::mapper::{Bundle, CreateContext, Resource};
use crate::schema::ResourceType;

/// An event. Creating one also creates its page in the same request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Sent as UTC with milliseconds (`2025-06-10T19:00:00.000Z`), so only
    /// input already in that form decodes back unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ticket_price_in_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ticket_purchase_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attending_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_response_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_response_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_response_broadcaster_id: Option<i64>,
}

impl Resource for Event {
    const KIND: ResourceType = ResourceType::Events;

    fn normalize(attributes: &mut Attributes) -> Result<(), ApiError> {
        if let Some(Value::String(raw)) = attributes.get("start_at") {
            let normalized = normalize_timestamp(raw)?;
            attributes.insert("start_at".to_string(), Value::String(normalized));
        }
        Ok(())
    }

    fn bundle(&self, ctx: &CreateContext<'_>) -> Option<Bundle> {
        Some(Bundle {
            relationship: "page",
            document: ctx.page_template.document(&ctx.token),
        })
    }
}

/// Render a timestamp as UTC ISO-8601 with milliseconds.
///
/// Accepts RFC 3339, a zone-less `YYYY-MM-DDTHH:MM[:SS]` (read as UTC) or a
/// bare date (midnight UTC).
pub fn normalize_timestamp(raw: &str) -> Result<String, ApiError> {
    let raw = raw.trim();
    let parsed = if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        at.with_timezone(&Utc)
    } else if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        at.and_utc()
    } else if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        at.and_utc()
    } else if let Some(at) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        at.and_utc()
    } else {
        return Err(ApiError::Validation(format!("start_at is not a valid timestamp: {raw:?}")));
    };
    Ok(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}
