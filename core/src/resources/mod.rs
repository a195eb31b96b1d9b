//! Typed local records, one per CRM resource type.

pub mod donation;
pub mod event;
pub mod page;
pub mod person;
pub mod response;
pub mod survey;

pub use donation::Donation;
pub use event::Event;
pub use page::Page;
pub use person::{Person, Sex};
pub use response::SurveyQuestionResponse;
pub use survey::{QuestionFormat, QuestionStatus, Survey, SurveyQuestion};
