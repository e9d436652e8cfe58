//! The signature-request lifecycle state machine.
//!
//! `draft → sent → {signed, refused} → archived`, with cancellation as a
//! side exit. Remote calls run strictly in sequence: the service's
//! document and signer identifiers must be known before the next
//! dependent call, and interleaved registration would scramble ranks.
//!
//! There is no compensating rollback: when step N of `send` fails, the
//! remote side keeps whatever steps 1..N-1 created. Local state only
//! advances after the matching remote call succeeded, so the two can
//! diverge only in the direction of "remote knows more than local".

use chrono::Utc;
use tracing::{debug, error, info, warn};

use inksign_client::wire::{
    CancelRequest, CreateRequest, CreateSigner, CustomText, ReminderSettings, SignerField,
    SignerInfo,
};
use inksign_client::Gateway;
use inksign_core::{
    signature_position, map_remote_status, Attachment, RequestState, SignatureRequest,
    SignerState,
};

use crate::error::FlowError;
use crate::packager;
use crate::store::{ActivityNotes, NoopHook, SignatureStore, SignedHook};

/// Outcome of one scheduled sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub polled: usize,
    pub archived: usize,
}

/// Drives signature requests through their lifecycle against the remote
/// service.
pub struct Lifecycle {
    gateway: Gateway,
    hook: Box<dyn SignedHook + Send + Sync>,
}

impl Lifecycle {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            hook: Box::new(NoopHook),
        }
    }

    /// Replace the no-op signed-hook with a custom strategy.
    pub fn with_hook(mut self, hook: Box<dyn SignedHook + Send + Sync>) -> Self {
        self.hook = hook;
        self
    }

    /// `draft → sent`: create the remote request, upload every document,
    /// register every signer, activate.
    ///
    /// All preconditions are checked before the first network call. Steps
    /// are strictly ordered and non-resumable: a failure aborts the whole
    /// operation, leaving already-created remote state in place.
    pub async fn send(
        &self,
        request: &mut SignatureRequest,
        notes: &mut dyn ActivityNotes,
    ) -> Result<(), FlowError> {
        info!(name = %request.name, "sending signature request");
        request.validate_for_send()?;

        let payload = CreateRequest {
            name: request.name.clone(),
            delivery_mode: "email".into(),
            audit_trail_locale: request.locale_short().to_string(),
            ordered_signers: request.ordered,
            reminder_settings: request.reminder.map(|r| ReminderSettings {
                interval_in_days: r.interval_days(),
                max_occurrences: r.max_occurrences(),
            }),
        };
        let remote = self.gateway.create_request(&payload).await?;
        if remote.status != "draft" {
            return Err(FlowError::BadRemoteStatus {
                name: request.name.clone(),
                status: remote.status,
            });
        }
        if remote.id.is_empty() {
            return Err(FlowError::NoRemoteIdentifier(request.name.clone()));
        }
        request.set_remote_id(remote.id.clone())?;
        let remote_id = remote.id;

        let mut documents: Vec<(String, u32)> = Vec::with_capacity(request.documents.len());
        for attachment in &request.documents {
            let prepared = packager::prepare_document(attachment)?;
            let uploaded = self
                .gateway
                .upload_document(&remote_id, &prepared.filename, prepared.bytes)
                .await?;
            documents.push((uploaded.id, prepared.page_count));
        }

        let subject = request.init_mail_subject.clone();
        let body = request.init_mail_body.clone();
        let remind_subject = request.remind_mail_subject.clone();
        let remind_body = request.remind_mail_body.clone();
        let locale = request.locale_short().to_string();
        let sign_position = request.sign_position;
        let signer_count = request.signatories.len();

        for (index, signatory) in request.signatories.iter_mut().enumerate() {
            let rank = index + 1;
            let rect = signature_position(sign_position, rank);
            let mut fields = Vec::new();
            for (document_id, page_count) in &documents {
                fields.push(SignerField::Signature {
                    document_id: document_id.clone(),
                    page: *page_count,
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                });
                if let Some(mention) = &signatory.mention_top {
                    let (x, y) = rect.above();
                    fields.push(SignerField::Mention {
                        document_id: document_id.clone(),
                        page: *page_count,
                        x,
                        y,
                        mention: mention.clone(),
                    });
                }
                if let Some(mention) = &signatory.mention_bottom {
                    let (x, y) = rect.below();
                    fields.push(SignerField::Mention {
                        document_id: document_id.clone(),
                        page: *page_count,
                        x,
                        y,
                        mention: mention.clone(),
                    });
                }
            }
            let payload = CreateSigner {
                custom_text: CustomText {
                    request_subject: subject.clone(),
                    request_body: body.clone(),
                    reminder_subject: remind_subject.clone(),
                    reminder_body: remind_body.clone(),
                },
                info: SignerInfo {
                    locale: locale.clone(),
                    first_name: signatory.first_name.trim().to_string(),
                    last_name: signatory.last_name.trim().to_string(),
                    email: signatory.email.trim().to_string(),
                    phone_number: signatory.wire_mobile(),
                },
                signature_level: "electronic_signature".into(),
                fields,
                signature_authentication_mode: signatory.auth_mode.wire_value().into(),
            };
            let created = self.gateway.create_signer(&remote_id, &payload).await?;
            signatory.remote_id = Some(created.id);
            signatory.state = SignerState::Pending;
            debug!(rank, last_name = %signatory.last_name, "signer registered");
        }

        if let Err(e) = self.gateway.activate_request(&remote_id).await {
            error!(name = %request.name, error = %e, "activation failed");
            return Err(FlowError::ActivationFailed {
                name: request.name.clone(),
                message: e.to_string(),
            });
        }

        request.state = RequestState::Sent;
        info!(name = %request.name, signers = signer_count, "signature request sent");
        if let Some(source) = &request.source {
            notes.post_note(
                source,
                &format!(
                    "Signature request {} generated with {} signatories",
                    request.name, signer_count
                ),
            );
        }
        Ok(())
    }

    /// Poll remote signing progress for a request in `sent`.
    ///
    /// Each signer's result comes from the pure status mapping; the
    /// request folds to `signed` only when every result is signed. The
    /// `last_update` stamp is refreshed on every poll attempt. In
    /// tolerant mode a failed fetch skips the signer instead of aborting.
    pub async fn update_status(
        &self,
        request: &mut SignatureRequest,
        notes: &mut dyn ActivityNotes,
        tolerant: bool,
    ) -> Result<(), FlowError> {
        if request.state != RequestState::Sent {
            return Ok(());
        }
        let Some(remote_id) = request.remote_id().map(str::to_string) else {
            warn!(name = %request.name, "sent request without remote identifier, skipping poll");
            return Ok(());
        };
        info!(name = %request.name, "polling remote signer status");

        let mut results: Vec<SignerState> = Vec::with_capacity(request.signatories.len());
        for signatory in request.signatories.iter_mut() {
            if signatory.remote_id.is_none() {
                warn!(last_name = %signatory.last_name, "signer has no remote identifier");
                results.push(SignerState::Draft);
                continue;
            }
            let remote = match self.gateway.fetch_request(&remote_id).await {
                Ok(remote) => remote,
                Err(e) if tolerant => {
                    warn!(name = %request.name, error = %e, "status fetch failed, skipping");
                    results.push(SignerState::Draft);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            match map_remote_status(&remote.status) {
                Some(state) => {
                    signatory.state = state;
                    results.push(state);
                }
                None => {
                    warn!(
                        last_name = %signatory.last_name,
                        status = %remote.status,
                        "unrecognized remote status, leaving signer unchanged"
                    );
                    results.push(SignerState::Draft);
                }
            }
        }

        request.last_update = Some(Utc::now());
        if !results.is_empty() && results.iter().all(|s| *s == SignerState::Signed) {
            request.state = RequestState::Signed;
            info!(name = %request.name, "request signed by all signatories");
            if let Some(source) = &request.source {
                notes.post_note(
                    source,
                    &format!(
                        "Signature request {} has been signed by all signatories",
                        request.name
                    ),
                );
            }
            self.hook.on_signed(request);
        }
        Ok(())
    }

    /// `signed → archived`: download every signable document and attach
    /// it under its `_signed.pdf` name.
    ///
    /// Re-running is harmless: attachment is deduplicated on the derived
    /// filename. The request archives once the distinct signed files
    /// match the originally submitted document count.
    pub async fn archive(
        &self,
        request: &mut SignatureRequest,
        notes: &mut dyn ActivityNotes,
        tolerant: bool,
    ) -> Result<(), FlowError> {
        if request.state != RequestState::Signed {
            return Ok(());
        }
        let Some(remote_id) = request.remote_id().map(str::to_string) else {
            warn!(name = %request.name, "signed request without remote identifier, skipping");
            return Ok(());
        };
        info!(name = %request.name, "retrieving signed files");
        let docs_to_sign = request.documents.len();
        if docs_to_sign == 0 {
            warn!(name = %request.name, "no documents to sign, nothing to archive");
        }

        let remote = match self.gateway.fetch_request(&remote_id).await {
            Ok(remote) => remote,
            Err(e) if tolerant => {
                warn!(name = %request.name, error = %e, "request fetch failed, skipping");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        if remote.documents.is_empty() {
            return Ok(());
        }

        let mut signed_filenames: Vec<String> = request
            .signed_documents
            .iter()
            .map(|a| a.filename.clone())
            .collect();
        for document in &remote.documents {
            if !document.is_signable() {
                continue;
            }
            let downloaded = match self.download_signed(&remote_id, &document.id).await {
                Ok(pair) => pair,
                Err(e) if tolerant => {
                    warn!(
                        name = %request.name,
                        document = %document.id,
                        error = %e,
                        "download failed, skipping document"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };
            let (original_filename, bytes) = downloaded;
            let original_filename =
                original_filename.unwrap_or_else(|| document.filename.clone().unwrap_or_else(|| document.id.clone()));
            let signed_name = packager::signed_filename(&original_filename);
            if signed_filenames.contains(&signed_name) {
                debug!(filename = %signed_name, "signed file already attached");
                continue;
            }
            request
                .signed_documents
                .push(Attachment::new(signed_name.clone(), bytes));
            info!(name = %request.name, filename = %signed_name, "signed file attached");
            signed_filenames.push(signed_name);
        }

        if signed_filenames.len() == docs_to_sign {
            request.state = RequestState::Archived;
            info!(name = %request.name, files = signed_filenames.len(), "request archived");
            if let Some(source) = &request.source {
                notes.post_note(
                    source,
                    &format!(
                        "{} signed document(s) are now attached; request {} is archived",
                        signed_filenames.len(),
                        request.name
                    ),
                );
            }
        }
        Ok(())
    }

    async fn download_signed(
        &self,
        remote_id: &str,
        document_id: &str,
    ) -> Result<(Option<String>, Vec<u8>), FlowError> {
        let metadata = self.gateway.fetch_document(remote_id, document_id).await?;
        let bytes = self
            .gateway
            .download_document(remote_id, document_id)
            .await?;
        Ok((metadata.filename, bytes))
    }

    /// Cancel a batch of requests.
    ///
    /// Requests in `sent` with a remote identifier get a remote cancel
    /// call first; a failure there aborts the batch with nothing marked.
    /// Every targeted request is then marked cancelled locally, including
    /// those the remote call preconditions did not hold for.
    pub async fn cancel(
        &self,
        requests: &mut [SignatureRequest],
        cancelled_by: &str,
        notes: &mut dyn ActivityNotes,
    ) -> Result<(), FlowError> {
        for request in requests.iter_mut() {
            if request.state == RequestState::Sent {
                if let Some(remote_id) = request.remote_id().map(str::to_string) {
                    let payload = CancelRequest {
                        reason: "other".into(),
                        custom_note: format!("cancelled by {cancelled_by}"),
                    };
                    self.gateway.cancel_request(&remote_id, &payload).await?;
                    info!(name = %request.name, "remote request cancelled");
                    if let Some(source) = &request.source {
                        notes.post_note(
                            source,
                            &format!(
                                "Signature request {} cancelled on the signing service",
                                request.name
                            ),
                        );
                    }
                }
            }
        }
        for request in requests.iter_mut() {
            request.state = RequestState::Cancelled;
        }
        Ok(())
    }

    /// Periodic entry point: tolerantly poll every `sent` request with a
    /// remote identifier, then tolerantly archive every `signed` one.
    ///
    /// The only place poll and archive chain automatically; one request's
    /// failure never blocks the next.
    pub async fn sweep(
        &self,
        store: &mut dyn SignatureStore,
        notes: &mut dyn ActivityNotes,
    ) -> Result<SweepReport, FlowError> {
        let mut report = SweepReport::default();
        for mut request in store.load_by_state(RequestState::Sent)? {
            if request.remote_id().is_none() {
                continue;
            }
            self.update_status(&mut request, notes, true).await?;
            report.polled += 1;
            store.save(request)?;
        }
        for mut request in store.load_by_state(RequestState::Signed)? {
            if request.remote_id().is_none() {
                continue;
            }
            self.archive(&mut request, notes, true).await?;
            if request.state == RequestState::Archived {
                report.archived += 1;
            }
            store.save(request)?;
        }
        Ok(report)
    }
}
