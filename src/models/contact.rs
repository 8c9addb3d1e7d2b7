use super::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for ContactMessage {
    const TABLE: &'static str = "contact_messages";
    const NAME: &'static str = "Message";
}

/// Message submitted through the public contact form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactMessageInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_validated() {
        let input = ContactMessageInput {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            subject: None,
            message: "Hello".to_string(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
