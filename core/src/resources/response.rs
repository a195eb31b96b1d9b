use serde::{Deserialize, Serialize};

use crate::mapper::Resource;
use crate::resources::survey::QuestionFormat;
use crate::schema::ResourceType;

/// A person's answer to one survey question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyQuestionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_question_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_question_possible_response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signup_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_format: Option<QuestionFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_skipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Resource for SurveyQuestionResponse {
    const KIND: ResourceType = ResourceType::SurveyQuestionResponses;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{encode_create, CorrelationToken, CreateContext, PageTemplate};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn create_sends_only_answer_fields() {
        let template = PageTemplate::default();
        let ctx = CreateContext {
            token: CorrelationToken::new(Utc::now(), 0),
            page_template: &template,
        };
        let answer = SurveyQuestionResponse {
            survey_question_id: Some("8".into()),
            signup_id: Some("5".into()),
            author_id: Some("5".into()),
            content: Some("Blue".into()),
            question_format: Some(QuestionFormat::MultipleChoice),
            is_skipped: Some(false),
            ..Default::default()
        };
        let envelope = encode_create(&answer, &ctx).unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value["data"]["attributes"],
            json!({
                "survey_question_id": "8",
                "signup_id": "5",
                "author_id": "5",
                "content": "Blue",
                "question_format": "multiple_choice"
            })
        );
        assert!(value["data"].get("relationships").is_none());
    }
}
