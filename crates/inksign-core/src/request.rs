//! The signature request aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::notification::NotificationRule;
use crate::signatory::Signatory;

/// Lifecycle state of a signature request.
///
/// `draft → sent → {signed, refused} → archived`, with `draft → cancelled`
/// and `sent → cancelled` as side exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Draft,
    Sent,
    Signed,
    Refused,
    Archived,
    Cancelled,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Signed => "signed",
            Self::Refused => "refused",
            Self::Archived => "archived",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived | Self::Cancelled | Self::Refused)
    }
}

/// Which preset placement table to use for signature fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignPosition {
    Top,
    Bottom,
}

/// Auto-reminder settings forwarded to the signing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPolicy {
    interval_days: u32,
    max_occurrences: u32,
}

impl ReminderPolicy {
    pub const ALLOWED_INTERVALS: [u32; 4] = [1, 2, 7, 14];

    pub fn new(interval_days: u32, max_occurrences: u32) -> Result<Self, ValidationError> {
        if !Self::ALLOWED_INTERVALS.contains(&interval_days) {
            return Err(ValidationError::BadReminderInterval(interval_days));
        }
        Ok(Self {
            interval_days,
            max_occurrences,
        })
    }

    pub fn interval_days(&self) -> u32 {
        self.interval_days
    }

    pub fn max_occurrences(&self) -> u32 {
        self.max_occurrences
    }
}

/// Reference to the business record a request was raised from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub model: String,
    pub id: i64,
    pub display_name: String,
}

/// A locally stored file: either a document to sign or a signed artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// A signature request: signers, documents, notification rules, and the
/// lifecycle state driven by the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRequest {
    pub name: String,
    /// Identifier assigned by the signing service; set exactly once, when
    /// the remote request is created.
    remote_id: Option<String>,
    /// Signers sign one after the other, in list order.
    pub ordered: bool,
    /// Locale such as `fr_FR`; the first two characters go on the wire.
    pub locale: String,
    pub init_mail_subject: String,
    pub init_mail_body: String,
    pub remind_mail_subject: Option<String>,
    pub remind_mail_body: Option<String>,
    pub sign_position: SignPosition,
    pub reminder: Option<ReminderPolicy>,
    pub signatories: Vec<Signatory>,
    pub documents: Vec<Attachment>,
    pub signed_documents: Vec<Attachment>,
    notifications: Vec<NotificationRule>,
    pub state: RequestState,
    pub last_update: Option<DateTime<Utc>>,
    pub source: Option<SourceRef>,
}

impl SignatureRequest {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_id: None,
            ordered: false,
            locale: locale.into(),
            init_mail_subject: String::new(),
            init_mail_body: String::new(),
            remind_mail_subject: None,
            remind_mail_body: None,
            sign_position: SignPosition::Top,
            reminder: None,
            signatories: Vec::new(),
            documents: Vec::new(),
            signed_documents: Vec::new(),
            notifications: Vec::new(),
            state: RequestState::Draft,
            last_update: None,
            source: None,
        }
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    /// Record the identifier returned by the signing service.
    ///
    /// The identifier is immutable once set; a second call is an error.
    pub fn set_remote_id(&mut self, id: impl Into<String>) -> Result<(), ValidationError> {
        if self.remote_id.is_some() {
            return Err(ValidationError::RemoteIdAlreadySet(self.name.clone()));
        }
        self.remote_id = Some(id.into());
        Ok(())
    }

    pub fn notifications(&self) -> &[NotificationRule] {
        &self.notifications
    }

    /// Attach a notification rule, enforcing the recipient invariant and
    /// at most one rule per event.
    pub fn add_notification(&mut self, rule: NotificationRule) -> Result<(), ValidationError> {
        rule.validate()?;
        if self.notifications.iter().any(|r| r.event == rule.event) {
            return Err(ValidationError::DuplicateNotification(rule.event.as_str()));
        }
        self.notifications.push(rule);
        Ok(())
    }

    /// Two-letter locale sent as `audit_trail_locale` and signer locale.
    pub fn locale_short(&self) -> &str {
        self.locale.get(..2).unwrap_or(&self.locale)
    }

    /// Send preconditions: the request is still a draft, has at least one
    /// signatory and one document, a non-empty initial subject and body,
    /// and every signer is complete for its auth mode. Checked before any
    /// network call.
    pub fn validate_for_send(&self) -> Result<(), ValidationError> {
        if self.state != RequestState::Draft {
            return Err(ValidationError::NotInDraft(self.name.clone()));
        }
        if self.signatories.is_empty() {
            return Err(ValidationError::NoSignatories(self.name.clone()));
        }
        if self.documents.is_empty() {
            return Err(ValidationError::NoDocuments(self.name.clone()));
        }
        if self.init_mail_subject.trim().is_empty() {
            return Err(ValidationError::MissingMailSubject(self.name.clone()));
        }
        if self.init_mail_body.trim().is_empty() {
            return Err(ValidationError::MissingMailBody(self.name.clone()));
        }
        for signatory in &self.signatories {
            signatory.validate_for_send(&self.name)?;
        }
        Ok(())
    }
}
