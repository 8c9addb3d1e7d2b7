use super::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Moderation state of a testimonial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl TestimonialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TestimonialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestimonialStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("Unknown testimonial status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub author_name: String,
    pub author_email: Option<String>,
    pub author_position_en: Option<String>,
    pub author_position_fr: Option<String>,
    pub author_company: Option<String>,
    pub author_image_url: Option<String>,
    pub testimonial_text_en: String,
    pub testimonial_text_fr: Option<String>,
    pub rating: Option<i32>,
    #[serde(default)]
    pub status: TestimonialStatus,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Testimonial {
    const TABLE: &'static str = "testimonials";
    const NAME: &'static str = "Testimonial";
}

/// Public submission; always stored as pending
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TestimonialSubmission {
    #[validate(length(min = 1, max = 100))]
    pub author_name: String,
    #[validate(email)]
    pub author_email: Option<String>,
    pub author_position_en: Option<String>,
    pub author_position_fr: Option<String>,
    pub author_company: Option<String>,
    #[validate(url)]
    pub author_image_url: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub testimonial_text_en: String,
    #[validate(length(max = 2000))]
    pub testimonial_text_fr: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
}

/// Admin create payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TestimonialInput {
    #[serde(flatten)]
    #[validate]
    pub submission: TestimonialSubmission,
    #[serde(default)]
    pub status: TestimonialStatus,
    #[serde(default)]
    pub display_order: i32,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TestimonialUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub author_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_position_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_position_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub author_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 2000))]
    pub testimonial_text_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub testimonial_text_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TestimonialStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl TestimonialUpdate {
    /// Moderation decision, stamped with the review time
    pub fn review(status: TestimonialStatus, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            reviewed_at: Some(at),
            ..Default::default()
        }
    }
}
