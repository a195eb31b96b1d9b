//! Per-type tables: wire tag, recognized attribute set, create defaults.

use std::fmt;

use serde_json::Value;

use crate::http::HttpMethod;

/// Resource kinds the CRM exposes to this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Donations,
    Events,
    Signups,
    Surveys,
    SurveyQuestions,
    SurveyQuestionResponses,
    Pages,
}

impl ResourceType {
    pub const ALL: [ResourceType; 7] = [
        ResourceType::Donations,
        ResourceType::Events,
        ResourceType::Signups,
        ResourceType::Surveys,
        ResourceType::SurveyQuestions,
        ResourceType::SurveyQuestionResponses,
        ResourceType::Pages,
    ];

    /// The `type` tag and URL segment.
    pub fn tag(self) -> &'static str {
        match self {
            ResourceType::Donations => "donations",
            ResourceType::Events => "events",
            ResourceType::Signups => "signups",
            ResourceType::Surveys => "surveys",
            ResourceType::SurveyQuestions => "survey_questions",
            ResourceType::SurveyQuestionResponses => "survey_question_responses",
            ResourceType::Pages => "pages",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Attribute names accepted in outgoing documents.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            ResourceType::Donations => &[
                "actblue_order_number",
                "amount_in_cents",
                "billing_address_attributes",
                "canceled_at",
                "check_number",
                "donation_tracking_code_id",
                "email",
                "employer",
                "failed_at",
                "first_name",
                "is_corporate_contribution",
                "is_private",
                "last_name",
                "mailing_id",
                "membership_id",
                "middle_name",
                "note",
                "occupation",
                "page_id",
                "payment_type_id",
                "payment_type_name",
                "pledge_id",
                "send_donor_receipt",
                "signup_id",
                "work_address_attributes",
            ],
            ResourceType::Events => &[
                "content",
                "start_at",
                "venue_name",
                "contact_email",
                "contact_name",
                "contact_phone_number",
                "user_ticket_price_in_cents",
                "user_ticket_purchase_url",
                "attending_count",
                "capacity_count",
                "private",
                "time_zone",
                "auto_response_subject",
                "auto_response_content",
                "auto_response_broadcaster_id",
            ],
            ResourceType::Signups => &[
                "first_name",
                "last_name",
                "email",
                "phone_number",
                "sex",
                "is_volunteer",
            ],
            ResourceType::Surveys => &["name"],
            ResourceType::SurveyQuestions => &[
                "slug",
                "content",
                "intro",
                "tag_list",
                "is_randomized",
                "status",
                "question_format",
            ],
            ResourceType::SurveyQuestionResponses => &[
                "survey_question_id",
                "survey_question_possible_response_id",
                "signup_id",
                "author_id",
                "content",
                "question_format",
            ],
            ResourceType::Pages => &[
                "site_id",
                "author_id",
                "external_id",
                "slug",
                "status",
                "name",
                "headline",
                "title",
                "excerpt",
                "page_type_name",
            ],
        }
    }

    pub fn recognizes(self, field: &str) -> bool {
        self.fields().contains(&field)
    }

    /// Values injected on create for recognized fields the caller left out.
    pub fn defaults(self) -> Vec<(&'static str, Value)> {
        match self {
            ResourceType::Donations => vec![
                ("is_private", Value::from(false)),
                ("is_corporate_contribution", Value::from(false)),
                ("send_donor_receipt", Value::from(false)),
            ],
            ResourceType::Events => vec![
                ("attending_count", Value::from(0)),
                ("capacity_count", Value::from(100)),
                ("private", Value::from(false)),
                ("time_zone", Value::from("UTC")),
                ("auto_response_subject", Value::from("Thank you for RSVP-ing.")),
                (
                    "auto_response_content",
                    Value::from("We are excited to have you join us!"),
                ),
                ("auto_response_broadcaster_id", Value::from(123)),
            ],
            ResourceType::Signups => vec![("is_volunteer", Value::from(false))],
            ResourceType::SurveyQuestions => vec![
                ("is_randomized", Value::from(true)),
                ("question_format", Value::from("multiple_choice")),
            ],
            ResourceType::Surveys | ResourceType::SurveyQuestionResponses | ResourceType::Pages => {
                Vec::new()
            }
        }
    }

    /// Verb used for partial updates. The people endpoint has always been
    /// updated with PUT; everything else uses PATCH.
    pub fn update_method(self) -> HttpMethod {
        match self {
            ResourceType::Signups => HttpMethod::Put,
            _ => HttpMethod::Patch,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
