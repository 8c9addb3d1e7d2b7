use super::{default_true, Language, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub title_en: String,
    pub title_fr: String,
    pub file_url: String,
    pub file_name: String,
    pub language: Language,
    pub file_size: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Resume {
    const TABLE: &'static str = "resumes";
    const NAME: &'static str = "Resume";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResumeInput {
    #[validate(length(min = 1, max = 200))]
    pub title_en: String,
    #[validate(length(min = 1, max = 200))]
    pub title_fr: String,
    #[validate(url)]
    pub file_url: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    pub language: Language,
    #[validate(range(min = 0))]
    pub file_size: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ResumeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
