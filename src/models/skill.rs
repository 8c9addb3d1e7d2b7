use super::{default_true, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name_en: String,
    pub name_fr: String,
    pub category: String,
    pub proficiency: i32,
    pub icon_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Skill {
    const TABLE: &'static str = "skills";
    const NAME: &'static str = "Skill";
}

/// Create and full-replace payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillInput {
    #[validate(length(min = 1, max = 100))]
    pub name_en: String,
    #[validate(length(min = 1, max = 100))]
    pub name_fr: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(range(min = 0, max = 100))]
    pub proficiency: i32,
    #[validate(url)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
