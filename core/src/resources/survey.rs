use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{FlatRecord, Relationship, Relationships, ResourceDocument, ResourceRef};
use crate::error::ApiError;
use crate::mapper::{Mode, Resource};
use crate::schema::ResourceType;
use crate::tag_list;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Survey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Survey {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Resource for Survey {
    const KIND: ResourceType = ResourceType::Surveys;
}

/// Question status. Values outside the known set decode into
/// `Unrecognized` and are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Archived,
    Deleted,
    Expired,
    Hidden,
    Published,
    RuleViolated,
    Unlisted,
    #[serde(untagged)]
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionFormat {
    MultipleChoice,
    YesNo,
    Text,
    #[serde(untagged)]
    Unrecognized(String),
}

/// A survey question. `survey_id` travels as the `survey` relationship,
/// never as an attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    /// Answer options, comma-separated. See [`SurveyQuestion::options`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_randomized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuestionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_format: Option<QuestionFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
}

impl SurveyQuestion {
    pub fn options(&self) -> Vec<String> {
        self.tag_list.as_deref().map(tag_list::decode).unwrap_or_default()
    }

    pub fn set_options<S: AsRef<str>>(&mut self, options: &[S]) {
        self.tag_list = Some(tag_list::encode(options));
    }
}

impl Resource for SurveyQuestion {
    const KIND: ResourceType = ResourceType::SurveyQuestions;

    fn relationships(&self, mode: Mode) -> Result<Relationships, ApiError> {
        let mut relationships = Relationships::new();
        match (&self.survey_id, mode) {
            (Some(survey_id), _) => {
                relationships.insert(
                    "survey".to_string(),
                    Relationship::to_one(ResourceRef::existing(ResourceType::Surveys.tag(), survey_id.as_str())),
                );
            }
            (None, Mode::Create) => return Err(ApiError::missing("survey_id")),
            (None, Mode::Update) => {}
        }
        Ok(relationships)
    }

    fn absorb_relationships(record: &mut FlatRecord, document: &ResourceDocument) {
        if let Some(survey_id) = document.related_id("survey") {
            record
                .entry("survey_id")
                .or_insert_with(|| Value::String(survey_id.to_string()));
        }
    }
}
