//! Declarative notification rules for lifecycle events.
//!
//! Pure data plus write-time validation; dispatching the actual e-mails is
//! the job of an outer layer.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lifecycle events a rule can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationEvent {
    #[serde(rename = "procedure.started")]
    ProcedureStarted,
    #[serde(rename = "procedure.finished")]
    ProcedureFinished,
    #[serde(rename = "procedure.refused")]
    ProcedureRefused,
    #[serde(rename = "procedure.expired")]
    ProcedureExpired,
    #[serde(rename = "member.finished")]
    MemberFinished,
    #[serde(rename = "comment.created")]
    CommentCreated,
}

impl NotificationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcedureStarted => "procedure.started",
            Self::ProcedureFinished => "procedure.finished",
            Self::ProcedureRefused => "procedure.refused",
            Self::ProcedureExpired => "procedure.expired",
            Self::MemberFinished => "member.finished",
            Self::CommentCreated => "comment.created",
        }
    }
}

/// Who gets notified when `event` fires on a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRule {
    pub event: NotificationEvent,
    pub creator: bool,
    pub members: bool,
    pub subscribers: bool,
    /// E-mail addresses of explicitly listed recipients.
    pub partners: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl NotificationRule {
    pub fn new(event: NotificationEvent, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            event,
            creator: false,
            members: false,
            subscribers: false,
            partners: Vec::new(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// At least one recipient channel must be selected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.creator && !self.members && !self.subscribers && self.partners.is_empty() {
            return Err(ValidationError::NoRecipients);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> NotificationRule {
        NotificationRule::new(NotificationEvent::ProcedureFinished, "Done", "All signed.")
    }

    #[test]
    fn no_recipients_is_rejected() {
        assert_eq!(rule().validate(), Err(ValidationError::NoRecipients));
    }

    #[test]
    fn any_single_channel_is_enough() {
        let mut r = rule();
        r.creator = true;
        assert!(r.validate().is_ok());

        let mut r = rule();
        r.subscribers = true;
        assert!(r.validate().is_ok());

        let mut r = rule();
        r.partners = vec!["legal@example.com".into()];
        assert!(r.validate().is_ok());
    }

    #[test]
    fn event_wire_names() {
        assert_eq!(NotificationEvent::ProcedureStarted.as_str(), "procedure.started");
        assert_eq!(NotificationEvent::MemberFinished.as_str(), "member.finished");
        assert_eq!(NotificationEvent::CommentCreated.as_str(), "comment.created");
    }
}
