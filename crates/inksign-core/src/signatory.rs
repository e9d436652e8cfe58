//! Signatories and the mapping of remote signer statuses onto local state.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How a signer proves their identity before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    OtpSms,
    OtpEmail,
    NoOtp,
}

impl AuthMode {
    /// Value sent on the wire (`signature_authentication_mode`).
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::OtpSms => "otp_sms",
            Self::OtpEmail => "otp_email",
            Self::NoOtp => "no_otp",
        }
    }

    /// Parse a stored auth mode.
    ///
    /// Accepts both the current `otp_`-prefixed values and the historical
    /// unprefixed ones (`sms`, `email`, `none`) still found in old records.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "otp_sms" | "sms" => Some(Self::OtpSms),
            "otp_email" | "email" => Some(Self::OtpEmail),
            "no_otp" | "none" => Some(Self::NoOtp),
            _ => None,
        }
    }
}

/// Per-signer signing state, driven by status polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerState {
    Draft,
    Pending,
    Signed,
    Refused,
}

/// Map a remote signer status string onto the local [`SignerState`].
///
/// Returns `None` for unrecognized values; the caller logs and leaves the
/// signer untouched rather than guessing.
pub fn map_remote_status(status: &str) -> Option<SignerState> {
    match status {
        "pending" | "processing" => Some(SignerState::Pending),
        "done" => Some(SignerState::Signed),
        "refused" => Some(SignerState::Refused),
        _ => None,
    }
}

/// One signer on a signature request.
///
/// Owned by its request; insertion order is the signing order when the
/// request is `ordered`. Rank is recomputed from position at send time,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signatory {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub auth_mode: AuthMode,
    /// Free text placed one rectangle-height above the signature.
    pub mention_top: Option<String>,
    /// Free text placed one rectangle-height below the signature.
    pub mention_bottom: Option<String>,
    pub remote_id: Option<String>,
    pub state: SignerState,
}

impl Signatory {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        auth_mode: AuthMode,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            mobile: None,
            auth_mode,
            mention_top: None,
            mention_bottom: None,
            remote_id: None,
            state: SignerState::Draft,
        }
    }

    /// Check the fields required for remote registration.
    ///
    /// Any violation aborts the whole send, before any network call.
    pub fn validate_for_send(&self, request_name: &str) -> Result<(), ValidationError> {
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::MissingLastName(request_name.to_string()));
        }
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::MissingFirstName(self.last_name.clone()));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingEmail(self.last_name.clone()));
        }
        if self.auth_mode == AuthMode::OtpSms
            && self.mobile.as_deref().is_none_or(|m| m.trim().is_empty())
        {
            return Err(ValidationError::MissingMobile(self.last_name.clone()));
        }
        Ok(())
    }

    /// Mobile number as sent on the wire: interior spaces stripped.
    pub fn wire_mobile(&self) -> String {
        self.mobile
            .as_deref()
            .map(|m| m.replace(' ', ""))
            .unwrap_or_default()
    }
}
