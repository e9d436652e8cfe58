use thiserror::Error;

/// Write-time and pre-send validation failures.
///
/// Every variant carries enough context to name the offending request or
/// signatory in the message shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request {0} is not in draft state and cannot be sent")]
    NotInDraft(String),

    #[error("there are no signatories on request {0}")]
    NoSignatories(String),

    #[error("there are no documents to sign on request {0}")]
    NoDocuments(String),

    #[error("missing initial mail subject on request {0}")]
    MissingMailSubject(String),

    #[error("missing initial mail body on request {0}")]
    MissingMailBody(String),

    #[error("missing lastname on one of the signatories of request {0}")]
    MissingLastName(String),

    #[error("missing firstname on signatory '{0}'")]
    MissingFirstName(String),

    #[error("missing email on signatory '{0}'")]
    MissingEmail(String),

    #[error("missing mobile phone number on signatory '{0}' (required for SMS OTP)")]
    MissingMobile(String),

    #[error("remote identifier is already set on request {0}")]
    RemoteIdAlreadySet(String),

    #[error("reminder interval must be one of 1, 2, 7 or 14 days, got {0}")]
    BadReminderInterval(u32),

    #[error("a notification rule must select at least one recipient")]
    NoRecipients,

    #[error("a notification rule for event {0} already exists on this request")]
    DuplicateNotification(&'static str),
}
