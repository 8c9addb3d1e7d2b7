mod contact;
mod experience;
mod hobby;
mod project;
mod resume;
mod skill;
mod testimonial;

pub use contact::{ContactMessage, ContactMessageInput};
pub use experience::{Education, EducationInput, WorkExperience, WorkExperienceInput};
pub use hobby::{Hobby, HobbyInput, HobbyUpdate};
pub use project::{Project, ProjectInput};
pub use resume::{Resume, ResumeInput, ResumeUpdate};
pub use skill::{Skill, SkillInput};
pub use testimonial::{
    Testimonial, TestimonialInput, TestimonialStatus, TestimonialSubmission, TestimonialUpdate,
};

use crate::utils::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A row type backed by a PostgREST table
pub trait Record: DeserializeOwned + Serialize + Send + Sync + 'static {
    const TABLE: &'static str;
    /// Human readable name used in messages, e.g. "Skill not found"
    const NAME: &'static str;
}

/// Content language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            other => Err(ApiError::validation_error(format!(
                "Unsupported language '{other}', expected 'en' or 'fr'"
            ))),
        }
    }
}

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Pagination parameters shared by list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl Pagination {
    pub fn skip(&self) -> usize {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Inclusive row range for a PostgREST `Range` header
    pub fn range(&self) -> (usize, usize) {
        let skip = self.skip();
        (skip, skip.saturating_add(self.limit() - 1))
    }
}

/// Body returned by deletes that answer with content
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn for_record<T: Record>() -> Self {
        Self {
            success: true,
            message: format!("{} deleted successfully", T::NAME),
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}
