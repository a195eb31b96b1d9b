//! Build, execute and parse in one call.
//!
//! # Design
//! `CrmService` pairs a `CrmClient` with a `Transport`. Each method runs one
//! build → execute → parse cycle; failures are logged and returned to the
//! caller unchanged. Nothing is retried. The two survey workflows issue a
//! lookup request before the create.

use tracing::{error, info};

use crate::client::CrmClient;
use crate::error::ApiError;
use crate::mapper::Resource;
use crate::resources::{Page, Survey, SurveyQuestion};
use crate::schema::ResourceType;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct CrmService<T> {
    client: CrmClient,
    transport: T,
}

impl<T: Transport> CrmService<T> {
    pub fn new(client: CrmClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CrmClient {
        &self.client
    }

    pub fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        let result = self
            .transport
            .execute(self.client.build_list(R::KIND))
            .and_then(|response| self.client.parse_list(response));
        logged(result, "list", R::KIND, None)
    }

    pub fn get<R: Resource>(&self, id: &str) -> Result<R, ApiError> {
        let result = self
            .transport
            .execute(self.client.build_get(R::KIND, id))
            .and_then(|response| self.client.parse_one(response));
        logged(result, "get", R::KIND, Some(id))
    }

    pub fn create<R: Resource>(&self, record: &R) -> Result<R, ApiError> {
        let result = self
            .client
            .build_create(record)
            .and_then(|request| self.transport.execute(request))
            .and_then(|response| self.client.parse_one(response));
        logged(result, "create", R::KIND, None)
    }

    /// Send the `Some` fields of `record` as a partial update of `id`.
    pub fn update<R: Resource>(&self, id: &str, record: &R) -> Result<R, ApiError> {
        let result = self
            .client
            .build_update(id, record)
            .and_then(|request| self.transport.execute(request))
            .and_then(|response| self.client.parse_one(response));
        logged(result, "update", R::KIND, Some(id))
    }

    pub fn delete<R: Resource>(&self, id: &str) -> Result<(), ApiError> {
        let result = self
            .transport
            .execute(self.client.build_delete(R::KIND, id))
            .and_then(|response| self.client.parse_delete(response));
        logged(result, "delete", R::KIND, Some(id))
    }

    pub fn list_pages(&self) -> Result<Vec<Page>, ApiError> {
        self.list()
    }

    /// Create a survey unless one with the same name already exists.
    pub fn create_survey(&self, name: &str) -> Result<Survey, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::missing("name"));
        }

        let taken = self
            .transport
            .execute(self.client.build_find_surveys_by_name(name))
            .and_then(|response| self.client.parse_name_taken(response));
        if logged(taken, "find by name", ResourceType::Surveys, None)? {
            return Err(ApiError::Conflict(format!(
                "survey name '{name}' already exists"
            )));
        }

        let survey = self.create(&Survey::named(name))?;
        info!(id = survey.id.as_deref().unwrap_or_default(), name, "created survey");
        Ok(survey)
    }

    /// Create a question inside an existing survey.
    pub fn create_survey_question(&self, question: &SurveyQuestion) -> Result<SurveyQuestion, ApiError> {
        let survey_id = question
            .survey_id
            .as_deref()
            .ok_or_else(|| ApiError::missing("survey_id"))?;

        match self.get::<Survey>(survey_id) {
            Ok(_) => {}
            Err(ApiError::NotFound) => {
                return Err(ApiError::Validation(format!("survey {survey_id} not found")));
            }
            Err(e) => return Err(e),
        }

        self.create(question)
    }
}

fn logged<V>(
    result: Result<V, ApiError>,
    operation: &str,
    kind: ResourceType,
    id: Option<&str>,
) -> Result<V, ApiError> {
    if let Err(e) = &result {
        error!(operation, kind = %kind, id, error = %e, "CRM request failed");
    }
    result
}
