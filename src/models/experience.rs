//! Career history: work experience and education.

use super::{default_true, Record};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperience {
    pub id: String,
    pub company_name: String,
    pub position_en: String,
    pub position_fr: String,
    pub description_en: String,
    pub description_fr: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    pub company_logo_url: Option<String>,
    pub company_website: Option<String>,
    pub achievements_en: Option<Vec<String>>,
    pub achievements_fr: Option<Vec<String>>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for WorkExperience {
    const TABLE: &'static str = "work_experience";
    const NAME: &'static str = "Work experience";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_work_dates"))]
pub struct WorkExperienceInput {
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(min = 1, max = 200))]
    pub position_en: String,
    #[validate(length(min = 1, max = 200))]
    pub position_fr: String,
    #[validate(length(min = 1))]
    pub description_en: String,
    #[validate(length(min = 1))]
    pub description_fr: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[validate(url)]
    pub company_logo_url: Option<String>,
    #[validate(url)]
    pub company_website: Option<String>,
    pub achievements_en: Option<Vec<String>>,
    pub achievements_fr: Option<Vec<String>>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub id: String,
    pub institution_name: String,
    pub degree_en: String,
    pub degree_fr: String,
    pub field_of_study_en: String,
    pub field_of_study_fr: String,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    pub grade: Option<String>,
    pub logo_url: Option<String>,
    pub achievements_en: Option<Vec<String>>,
    pub achievements_fr: Option<Vec<String>>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Education {
    const TABLE: &'static str = "education";
    const NAME: &'static str = "Education record";
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_education_dates"))]
pub struct EducationInput {
    #[validate(length(min = 1, max = 200))]
    pub institution_name: String,
    #[validate(length(min = 1, max = 200))]
    pub degree_en: String,
    #[validate(length(min = 1, max = 200))]
    pub degree_fr: String,
    #[validate(length(min = 1, max = 200))]
    pub field_of_study_en: String,
    #[validate(length(min = 1, max = 200))]
    pub field_of_study_fr: String,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[validate(length(max = 50))]
    pub grade: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub achievements_en: Option<Vec<String>>,
    pub achievements_fr: Option<Vec<String>>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn validate_work_dates(input: &WorkExperienceInput) -> Result<(), ValidationError> {
    check_period(input.start_date, input.end_date)
}

fn validate_education_dates(input: &EducationInput) -> Result<(), ValidationError> {
    check_period(input.start_date, input.end_date)
}

fn check_period(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::new("end_date_before_start_date")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn work_input() -> WorkExperienceInput {
        serde_json::from_value(json!({
            "company_name": "Acme",
            "position_en": "Engineer",
            "position_fr": "Ingénieur",
            "description_en": "Built things",
            "description_fr": "Construit des choses",
            "start_date": "2021-03-01",
            "end_date": "2023-06-30"
        }))
        .unwrap()
    }

    #[test]
    fn test_work_experience_input() {
        let input = work_input();
        assert!(input.validate().is_ok());
        assert!(!input.is_current);
        assert!(input.is_active);
    }

    #[test]
    fn test_end_date_before_start_is_rejected() {
        let input = WorkExperienceInput {
            end_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..work_input()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_start_date_is_required() {
        let result = serde_json::from_value::<EducationInput>(json!({
            "institution_name": "Université de Montréal",
            "degree_en": "BSc",
            "degree_fr": "Baccalauréat",
            "field_of_study_en": "Computer Science",
            "field_of_study_fr": "Informatique"
        }));
        assert!(result.is_err());
    }
}
