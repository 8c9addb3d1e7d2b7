use super::{default_true, Record};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title_en: String,
    pub title_fr: String,
    pub description_en: String,
    pub description_fr: String,
    pub short_description_en: Option<String>,
    pub short_description_fr: Option<String>,
    pub image_url: Option<String>,
    pub gallery_urls: Option<Vec<String>>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Project {
    const TABLE: &'static str = "projects";
    const NAME: &'static str = "Project";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub title_en: String,
    #[validate(length(min = 1, max = 200))]
    pub title_fr: String,
    #[validate(length(min = 1))]
    pub description_en: String,
    #[validate(length(min = 1))]
    pub description_fr: String,
    #[validate(length(max = 500))]
    pub short_description_en: Option<String>,
    #[validate(length(max = 500))]
    pub short_description_fr: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub gallery_urls: Option<Vec<String>>,
    #[validate(url)]
    pub project_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
