use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{Relationship, Relationships, ResourceRef};
use crate::error::ApiError;
use crate::mapper::{Mode, Resource};
use crate::schema::ResourceType;

/// Payment type referenced when the record names none.
pub const DEFAULT_PAYMENT_TYPE_ID: &str = "1";

/// A donation. Also used as a partial update: only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Donation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actblue_order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_in_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_tracking_code_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_corporate_contribution: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pledge_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signup_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_donor_receipt: Option<bool>,
    /// Address object passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address_attributes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_address_attributes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Resource for Donation {
    const KIND: ResourceType = ResourceType::Donations;

    fn relationships(&self, mode: Mode) -> Result<Relationships, ApiError> {
        let mut relationships = Relationships::new();
        if mode == Mode::Create {
            let id = self.payment_type_id.as_deref().unwrap_or(DEFAULT_PAYMENT_TYPE_ID);
            relationships.insert(
                "payment_type".to_string(),
                Relationship::to_one(ResourceRef::existing("payment_types", id)),
            );
        }
        Ok(relationships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{encode_create, encode_update, CreateContext, CorrelationToken, PageTemplate};
    use chrono::Utc;
    use serde_json::json;

    fn create(record: &Donation) -> serde_json::Value {
        let template = PageTemplate::default();
        let ctx = CreateContext {
            token: CorrelationToken::new(Utc::now(), 0),
            page_template: &template,
        };
        serde_json::to_value(encode_create(record, &ctx).unwrap()).unwrap()
    }

    #[test]
    fn create_fills_defaults_and_payment_type() {
        let record = Donation {
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            email: Some("jane@x.com".into()),
            amount_in_cents: Some(500),
            ..Default::default()
        };
        let body = create(&record);
        let data = &body["data"];
        assert_eq!(data["type"], "donations");
        assert!(data.get("id").is_none());
        assert_eq!(data["attributes"]["amount_in_cents"], 500);
        assert_eq!(data["attributes"]["is_private"], false);
        assert_eq!(data["attributes"]["is_corporate_contribution"], false);
        assert_eq!(data["attributes"]["send_donor_receipt"], false);
        assert_eq!(
            data["relationships"]["payment_type"]["data"],
            json!({ "type": "payment_types", "id": "1" })
        );
        assert!(body.get("included").is_none());
    }

    #[test]
    fn empty_create_has_exactly_the_default_flags() {
        let body = create(&Donation::default());
        assert_eq!(
            body["data"]["attributes"],
            json!({ "is_private": false, "is_corporate_contribution": false, "send_donor_receipt": false })
        );
    }

    #[test]
    fn explicit_flags_beat_defaults() {
        let record = Donation {
            send_donor_receipt: Some(true),
            payment_type_id: Some("4".into()),
            ..Default::default()
        };
        let body = create(&record);
        assert_eq!(body["data"]["attributes"]["send_donor_receipt"], true);
        assert_eq!(body["data"]["relationships"]["payment_type"]["data"]["id"], "4");
    }

    #[test]
    fn read_only_fields_are_not_sent() {
        let record = Donation {
            id: Some("9".into()),
            created_at: Some("2025-01-01T00:00:00Z".into()),
            note: Some("thanks".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(encode_update("9", &record).unwrap()).unwrap();
        assert_eq!(body["data"]["attributes"], json!({ "note": "thanks" }));
        assert_eq!(body["data"]["id"], "9");
    }

    #[test]
    fn update_sends_falsy_values_that_were_set() {
        let record = Donation {
            amount_in_cents: Some(0),
            is_private: Some(false),
            note: Some(String::new()),
            ..Default::default()
        };
        let body = serde_json::to_value(encode_update("3", &record).unwrap()).unwrap();
        assert_eq!(
            body["data"]["attributes"],
            json!({ "amount_in_cents": 0, "is_private": false, "note": "" })
        );
        assert!(body["data"].get("relationships").is_none());
    }

    #[test]
    fn decode_restores_encoded_fields() {
        let record = Donation {
            amount_in_cents: Some(2500),
            first_name: Some("Jane".into()),
            is_private: Some(true),
            is_corporate_contribution: Some(false),
            send_donor_receipt: Some(true),
            work_address_attributes: Some(json!({ "city": "Springfield" })),
            ..Default::default()
        };
        let template = PageTemplate::default();
        let ctx = CreateContext {
            token: CorrelationToken::new(Utc::now(), 0),
            page_template: &template,
        };
        let mut document = encode_create(&record, &ctx).unwrap().data;
        document.id = Some("11".into());

        let decoded: Donation = crate::mapper::decode(&document).unwrap();
        assert_eq!(
            decoded,
            Donation {
                id: Some("11".into()),
                ..record
            }
        );
    }

    #[test]
    fn address_objects_pass_through() {
        let address = json!({ "address1": "1 Main St", "city": "Springfield" });
        let record = Donation {
            billing_address_attributes: Some(address.clone()),
            ..Default::default()
        };
        let body = create(&record);
        assert_eq!(body["data"]["attributes"]["billing_address_attributes"], address);
    }
}
