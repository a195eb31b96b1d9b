use serde::{Deserialize, Serialize};

use crate::mapper::Resource;
use crate::schema::ResourceType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
    /// Any other code the CRM returns, kept verbatim.
    #[serde(untagged)]
    Unrecognized(String),
}

/// A person, stored by the CRM as a signup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_volunteer: Option<bool>,
}

impl Resource for Person {
    const KIND: ResourceType = ResourceType::Signups;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ResourceDocument;
    use crate::mapper::{decode, encode_update};
    use serde_json::json;

    #[test]
    fn update_with_only_email_sends_only_email() {
        let person = Person {
            email: Some("a@b.com".into()),
            ..Default::default()
        };
        let envelope = encode_update("17", &person).unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"]["attributes"], json!({ "email": "a@b.com" }));
        assert_eq!(value["data"]["type"], "signups");
        assert_eq!(value["data"]["id"], "17");
    }

    #[test]
    fn decode_reads_sex_codes_and_ignores_unknown_attributes() {
        let document: ResourceDocument = serde_json::from_value(json!({
            "type": "signups",
            "id": "5",
            "attributes": {
                "first_name": "Ada",
                "sex": "F",
                "is_volunteer": true,
                "mobile_opt_in": false
            }
        }))
        .unwrap();
        let person: Person = decode(&document).unwrap();
        assert_eq!(person.id.as_deref(), Some("5"));
        assert_eq!(person.sex, Some(Sex::Female));
        assert_eq!(person.is_volunteer, Some(true));
        assert!(person.email.is_none());
    }

    #[test]
    fn null_attributes_decode_as_absent() {
        let document: ResourceDocument = serde_json::from_value(json!({
            "type": "signups",
            "id": "6",
            "attributes": { "phone_number": null, "sex": null }
        }))
        .unwrap();
        let person: Person = decode(&document).unwrap();
        assert!(person.phone_number.is_none());
        assert!(person.sex.is_none());
    }

    #[test]
    fn unknown_sex_code_is_kept() {
        let document: ResourceDocument = serde_json::from_value(json!({
            "type": "signups",
            "id": "7",
            "attributes": { "sex": "X", "first_name": "Sam" }
        }))
        .unwrap();
        let person: Person = decode(&document).unwrap();
        assert_eq!(person.sex, Some(Sex::Unrecognized("X".into())));
        assert_eq!(person.first_name.as_deref(), Some("Sam"));

        let envelope = encode_update("7", &person).unwrap();
        assert_eq!(envelope.data.attributes["sex"], "X");
    }
}
