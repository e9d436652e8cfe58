//! Serde payload types for the consumed slice of the signing-service API.

use serde::{Deserialize, Serialize};

/// Body of `POST /signature_requests`.
#[derive(Debug, Serialize)]
pub struct CreateRequest {
    pub name: String,
    pub delivery_mode: String,
    pub audit_trail_locale: String,
    pub ordered_signers: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_settings: Option<ReminderSettings>,
}

#[derive(Debug, Serialize)]
pub struct ReminderSettings {
    pub interval_in_days: u32,
    pub max_occurrences: u32,
}

/// A signature request as reported by the service.
#[derive(Debug, Deserialize)]
pub struct RemoteRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub documents: Vec<RemoteDocument>,
}

/// A document attached to a remote request.
///
/// `nature` distinguishes signable documents from ancillary files such as
/// the audit trail.
#[derive(Debug, Deserialize)]
pub struct RemoteDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub nature: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl RemoteDocument {
    pub const SIGNABLE: &'static str = "signable_document";

    pub fn is_signable(&self) -> bool {
        self.nature == Self::SIGNABLE
    }
}

/// Body of `POST /signature_requests/{id}/signers`.
#[derive(Debug, Serialize)]
pub struct CreateSigner {
    pub custom_text: CustomText,
    pub info: SignerInfo,
    pub signature_level: String,
    pub fields: Vec<SignerField>,
    pub signature_authentication_mode: String,
}

#[derive(Debug, Serialize)]
pub struct CustomText {
    pub request_subject: String,
    pub request_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignerInfo {
    pub locale: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

/// A field anchored on an uploaded document's page.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignerField {
    Signature {
        document_id: String,
        page: u32,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    },
    Mention {
        document_id: String,
        page: u32,
        x: i64,
        y: i64,
        mention: String,
    },
}

/// A signer as reported by the service.
#[derive(Debug, Deserialize)]
pub struct RemoteSigner {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
}

/// Body of `POST /signature_requests/{id}/cancel`.
#[derive(Debug, Serialize)]
pub struct CancelRequest {
    pub reason: String,
    pub custom_note: String,
}

/// Error body the service returns on a non-expected status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reminder_settings_are_omitted_when_absent() {
        let payload = CreateRequest {
            name: "SIG/00001".into(),
            delivery_mode: "email".into(),
            audit_trail_locale: "fr".into(),
            ordered_signers: true,
            reminder_settings: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("reminder_settings").is_none());
        assert_eq!(value["ordered_signers"], json!(true));
    }

    #[test]
    fn signer_fields_tag_their_type() {
        let field = SignerField::Signature {
            document_id: "doc-1".into(),
            page: 3,
            x: 70,
            y: 600,
            width: 215,
            height: 90,
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "signature");
        assert_eq!(value["page"], 3);

        let field = SignerField::Mention {
            document_id: "doc-1".into(),
            page: 3,
            x: 70,
            y: 510,
            mention: "Read and approved".into(),
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "mention");
        assert_eq!(value["mention"], "Read and approved");
        assert!(value.get("width").is_none());
    }

    #[test]
    fn remote_request_tolerates_missing_fields() {
        let parsed: RemoteRequest = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.id.is_empty());
        assert!(parsed.status.is_empty());
        assert!(parsed.documents.is_empty());
    }

    #[test]
    fn signable_nature_flag() {
        let doc = RemoteDocument {
            id: "doc-1".into(),
            nature: "signable_document".into(),
            filename: Some("contract.pdf".into()),
        };
        assert!(doc.is_signable());
        let audit = RemoteDocument {
            id: "doc-2".into(),
            nature: "attachment".into(),
            filename: None,
        };
        assert!(!audit.is_signable());
    }
}
