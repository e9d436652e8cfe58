//! Authenticated calls to the signing service.
//!
//! Every endpoint goes through [`Gateway::call`], which enforces the
//! expected-status contract and folds transport problems into
//! [`ClientError`]. Calls carry a fixed 30-second timeout and no retry; a
//! timed-out call is a terminal failure for that call.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::wire::{
    CancelRequest, CreateRequest, CreateSigner, ErrorBody, RemoteDocument, RemoteRequest,
    RemoteSigner,
};

const TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway to the remote signing service.
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Gateway {
    /// Build a gateway from an explicit configuration.
    ///
    /// Fails fast on an empty credential so no half-configured gateway
    /// ever makes a request.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| ClientError::Config(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.resolved_base_url().trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// One call against the service, checked against `expected`.
    ///
    /// `json` and `multipart` are mutually exclusive; a multipart upload
    /// lets reqwest set its own content-type boundary header.
    async fn call(
        &self,
        method: Method,
        path: &str,
        expected: StatusCode,
        json: Option<Value>,
        multipart: Option<Form>,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        info!(%method, %url, expected = expected.as_u16(), "calling signing service");
        debug!(payload = ?json, "json payload");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json");
        if let Some(json) = json {
            request = request.json(&json);
        }
        if let Some(form) = multipart {
            request = request.multipart(form);
        }

        let response = request.send().await.map_err(|source| {
            error!(%method, %url, %source, "request to signing service failed");
            if source.is_connect() {
                ClientError::Connection {
                    url: url.clone(),
                    source,
                }
            } else {
                ClientError::Transport {
                    method: method.to_string(),
                    url: url.clone(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if status != expected {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            error!(
                %method, %url,
                status = status.as_u16(),
                expected = expected.as_u16(),
                title = body.title.as_deref().unwrap_or(""),
                "unexpected status from signing service"
            );
            return Err(ClientError::UnexpectedStatus {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                expected: expected.as_u16(),
                title: body.title.unwrap_or_default(),
                detail: body.detail.unwrap_or_else(|| "no detail".into()),
            });
        }
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        response
            .json()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }

    /// `POST /signature_requests` — create a draft remote request.
    pub async fn create_request(
        &self,
        payload: &CreateRequest,
    ) -> Result<RemoteRequest, ClientError> {
        let path = "/signature_requests";
        let response = self
            .call(
                Method::POST,
                path,
                StatusCode::CREATED,
                Some(serde_json::to_value(payload)?),
                None,
            )
            .await?;
        self.decode(path, response).await
    }

    /// `GET /signature_requests/{id}` — status and document list.
    pub async fn fetch_request(&self, remote_id: &str) -> Result<RemoteRequest, ClientError> {
        let path = format!("/signature_requests/{remote_id}");
        let response = self
            .call(Method::GET, &path, StatusCode::OK, None, None)
            .await?;
        self.decode(&path, response).await
    }

    /// `POST /signature_requests/{id}/cancel`.
    pub async fn cancel_request(
        &self,
        remote_id: &str,
        payload: &CancelRequest,
    ) -> Result<(), ClientError> {
        let path = format!("/signature_requests/{remote_id}/cancel");
        self.call(
            Method::POST,
            &path,
            StatusCode::CREATED,
            Some(serde_json::to_value(payload)?),
            None,
        )
        .await?;
        Ok(())
    }

    /// `POST /signature_requests/{id}/activate` — start the signing flow.
    pub async fn activate_request(&self, remote_id: &str) -> Result<(), ClientError> {
        let path = format!("/signature_requests/{remote_id}/activate");
        self.call(Method::POST, &path, StatusCode::CREATED, None, None)
            .await?;
        Ok(())
    }

    /// `POST /signature_requests/{id}/documents` — multipart PDF upload.
    pub async fn upload_document(
        &self,
        remote_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<RemoteDocument, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ClientError::Config(format!("invalid upload content type: {e}")))?;
        let form = Form::new()
            .text("nature", RemoteDocument::SIGNABLE)
            .part("file", part);
        let path = format!("/signature_requests/{remote_id}/documents");
        let response = self
            .call(Method::POST, &path, StatusCode::CREATED, None, Some(form))
            .await?;
        self.decode(&path, response).await
    }

    /// `GET /signature_requests/{id}/documents/{doc}` — metadata only.
    pub async fn fetch_document(
        &self,
        remote_id: &str,
        document_id: &str,
    ) -> Result<RemoteDocument, ClientError> {
        let path = format!("/signature_requests/{remote_id}/documents/{document_id}");
        let response = self
            .call(Method::GET, &path, StatusCode::OK, None, None)
            .await?;
        self.decode(&path, response).await
    }

    /// `GET /signature_requests/{id}/documents/{doc}/download` — raw bytes.
    pub async fn download_document(
        &self,
        remote_id: &str,
        document_id: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let path = format!("/signature_requests/{remote_id}/documents/{document_id}/download");
        let response = self
            .call(Method::GET, &path, StatusCode::OK, None, None)
            .await?;
        let url = format!("{}{}", self.base_url, path);
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Decode { url, source })?;
        Ok(bytes.to_vec())
    }

    /// `POST /signature_requests/{id}/signers`.
    pub async fn create_signer(
        &self,
        remote_id: &str,
        payload: &CreateSigner,
    ) -> Result<RemoteSigner, ClientError> {
        let path = format!("/signature_requests/{remote_id}/signers");
        let response = self
            .call(
                Method::POST,
                &path,
                StatusCode::CREATED,
                Some(serde_json::to_value(payload)?),
                None,
            )
            .await?;
        self.decode(&path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use httpmock::prelude::*;
    use serde_json::json;

    fn gateway_for(server: &MockServer) -> Gateway {
        let config =
            ClientConfig::new("test-key", Environment::Demo).with_base_url(server.base_url());
        Gateway::new(config).unwrap()
    }

    #[test]
    fn empty_credential_is_rejected_before_any_request() {
        let config = ClientConfig::new("", Environment::Demo);
        assert!(matches!(Gateway::new(config), Err(ClientError::Config(_))));
    }

    #[tokio::test]
    async fn create_request_sends_bearer_token_and_parses_reply() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/signature_requests")
                .header("authorization", "Bearer test-key")
                .header("content-type", "application/json");
            then.status(201)
                .json_body(json!({"id": "ys-1", "status": "draft"}));
        });

        let gateway = gateway_for(&server);
        let payload = CreateRequest {
            name: "SIG/00001".into(),
            delivery_mode: "email".into(),
            audit_trail_locale: "fr".into(),
            ordered_signers: false,
            reminder_settings: None,
        };
        let reply = gateway.create_request(&payload).await.unwrap();
        mock.assert();
        assert_eq!(reply.id, "ys-1");
        assert_eq!(reply.status, "draft");
    }

    #[tokio::test]
    async fn unexpected_status_surfaces_title_and_detail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/signature_requests/ys-1");
            then.status(404)
                .json_body(json!({"title": "Not Found", "detail": "unknown request"}));
        });

        let gateway = gateway_for(&server);
        let err = gateway.fetch_request("ys-1").await.unwrap_err();
        match err {
            ClientError::UnexpectedStatus {
                status,
                expected,
                title,
                detail,
                ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(expected, 200);
                assert_eq!(title, "Not Found");
                assert_eq!(detail, "unknown request");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_status_with_unparseable_body_still_reports() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/signature_requests/ys-1/activate");
            then.status(500).body("gateway exploded");
        });

        let gateway = gateway_for(&server);
        let err = gateway.activate_request("ys-1").await.unwrap_err();
        match err {
            ClientError::UnexpectedStatus { status, detail, .. } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "no detail");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_document_posts_to_documents_endpoint() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/signature_requests/ys-1/documents");
            then.status(201).json_body(
                json!({"id": "doc-1", "nature": "signable_document", "filename": "contract.pdf"}),
            );
        });

        let gateway = gateway_for(&server);
        let doc = gateway
            .upload_document("ys-1", "contract.pdf", b"%PDF-1.4 fake".to_vec())
            .await
            .unwrap();
        mock.assert();
        assert_eq!(doc.id, "doc-1");
        assert!(doc.is_signable());
    }

    #[tokio::test]
    async fn download_returns_raw_bytes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/signature_requests/ys-1/documents/doc-1/download");
            then.status(200).body("%PDF-1.4 signed bytes");
        });

        let gateway = gateway_for(&server);
        let bytes = gateway.download_document("ys-1", "doc-1").await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 signed bytes");
    }

    #[tokio::test]
    async fn cancel_posts_reason_and_note() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/signature_requests/ys-1/cancel")
                .json_body(json!({
                    "reason": "other",
                    "custom_note": "cancelled by Jane Doe"
                }));
            then.status(201).json_body(json!({"id": "ys-1"}));
        });

        let gateway = gateway_for(&server);
        let payload = CancelRequest {
            reason: "other".into(),
            custom_note: "cancelled by Jane Doe".into(),
        };
        gateway.cancel_request("ys-1", &payload).await.unwrap();
        mock.assert();
    }
}
