use tracing::{info, warn};
use validator::Validate;

use crate::{
    constants::CONTACT_TABLE,
    entities::{
        contact::{ContactForm, ContactSubmission},
        resource::MessageResponse,
    },
    errors::AppError,
    store::RemoteStoreGateway,
};

pub const CONTACT_RECEIVED: &str = "Message sent successfully! I'll get back to you soon.";

#[derive(Clone)]
pub struct ContactHandler {
    pub gateway: RemoteStoreGateway,
}

impl ContactHandler {
    pub fn new(gateway: RemoteStoreGateway) -> Self {
        ContactHandler { gateway }
    }

    /// Stores a contact form submission.
    ///
    /// Only invalid input is reported back. Storage failures are logged and the visitor
    /// still gets the acknowledgement.
    pub async fn submit(&self, form: ContactForm) -> Result<MessageResponse, AppError> {
        form.validate()?;

        let submission = ContactSubmission::from(form);
        let row = serde_json::to_value(&submission).map_err(|e| AppError::InternalError(e.to_string()))?;

        match self.gateway.insert_row(CONTACT_TABLE, row).await {
            Ok(_) => info!(email = %submission.email, "Contact submission stored"),
            Err(e) => warn!(email = %submission.email, error = %e, "Contact submission not stored"),
        }

        Ok(MessageResponse { message: CONTACT_RECEIVED.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::store::{memory::MemoryBackend, StoreBackend};

    fn form(email: &str) -> ContactForm {
        ContactForm {
            name: " Ada ".into(),
            email: email.into(),
            message: "Hello there".into(),
        }
    }

    #[tokio::test]
    async fn submission_is_stored() {
        let backend = Arc::new(MemoryBackend::new());
        let handler = ContactHandler::new(RemoteStoreGateway::new(backend.clone(), Duration::from_secs(1)));

        let response = handler.submit(form("Ada@Example.com")).await.unwrap();

        assert_eq!(response.message, CONTACT_RECEIVED);
        assert_eq!(backend.len(CONTACT_TABLE), 1);
        let rows = backend
            .select(&crate::store::SelectQuery { table: CONTACT_TABLE, filter: None, order: None })
            .await
            .unwrap();
        assert_eq!(rows[0]["email"], "ada@example.com");
        assert_eq!(rows[0]["name"], "Ada");
    }

    #[tokio::test]
    async fn unconfigured_store_still_acknowledges() {
        let handler = ContactHandler::new(RemoteStoreGateway::unconfigured());
        let response = handler.submit(form("ada@example.com")).await.unwrap();
        assert_eq!(response.message, CONTACT_RECEIVED);
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let handler = ContactHandler::new(RemoteStoreGateway::unconfigured());
        let err = handler.submit(form("not-an-email")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
