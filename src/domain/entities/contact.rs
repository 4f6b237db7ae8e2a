use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, max = 5000, message = "Message must be between 1 and 5000 characters"))]
    pub message: String,
}

/// Row written to `contact_submissions`.
#[derive(Debug, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<ContactForm> for ContactSubmission {
    fn from(form: ContactForm) -> Self {
        ContactSubmission {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            message: form.message,
            submitted_at: Utc::now(),
        }
    }
}
