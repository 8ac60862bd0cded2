//! New support ticket form

use portal_api::{NewTicket, TicketCategory, TicketPriority};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{derived, FieldErrors, Schema};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TicketForm {
    #[validate(length(min = 5, max = 150, message = "Subject must be between 5 and 150 characters"))]
    pub subject: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    #[validate(length(min = 20, max = 5000, message = "Message must be between 20 and 5000 characters"))]
    pub message: String,
}

impl TicketForm {
    pub fn new(
        subject: impl Into<String>,
        category: TicketCategory,
        priority: TicketPriority,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            category,
            priority,
            message: message.into(),
        }
    }

    pub fn to_new_ticket(&self) -> NewTicket {
        NewTicket {
            subject: self.subject.trim().to_string(),
            category: self.category,
            priority: self.priority,
            message: self.message.trim().to_string(),
        }
    }
}

impl Schema for TicketForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = derived(self);
        // Whitespace padding does not count towards the minimums.
        if self.subject.trim().chars().count() < 5 {
            errors.insert("subject", "Subject must be between 5 and 150 characters");
        }
        if self.message.trim().chars().count() < 20 {
            errors.insert("message", "Message must be between 20 and 5000 characters");
        }
        errors.into_result()
    }
}
