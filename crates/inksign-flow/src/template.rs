//! Request templates: per-model boilerplate used to pre-populate a draft
//! request from a business record.

use inksign_core::{
    AuthMode, NotificationRule, ReminderPolicy, SignPosition, SignatureRequest, Signatory,
    SourceRef,
};
use tracing::debug;

use crate::error::FlowError;
use crate::store::TemplateRenderer;

/// A signer slot on a template; copied onto each instantiated request.
#[derive(Debug, Clone)]
pub struct TemplateSignatory {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub auth_mode: AuthMode,
    pub mention_top: Option<String>,
    pub mention_bottom: Option<String>,
}

impl TemplateSignatory {
    fn to_signatory(&self) -> Signatory {
        let mut signatory = Signatory::new(
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.auth_mode,
        );
        signatory.mobile = self.mobile.clone();
        signatory.mention_top = self.mention_top.clone();
        signatory.mention_bottom = self.mention_bottom.clone();
        signatory
    }
}

/// Boilerplate for signature requests raised from records of one model.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    pub name: String,
    /// Model the template applies to (`sale.order` style).
    pub model: String,
    pub locale: String,
    pub ordered: bool,
    pub sign_position: SignPosition,
    /// Template strings, rendered against the source record.
    pub init_mail_subject: String,
    pub init_mail_body: String,
    pub remind_mail_subject: Option<String>,
    pub remind_mail_body: Option<String>,
    pub reminder: Option<ReminderPolicy>,
    pub signatories: Vec<TemplateSignatory>,
    pub notifications: Vec<NotificationRule>,
}

impl RequestTemplate {
    /// Build a draft request for `source`, copying the template's signers
    /// and notification rules and rendering its mail text.
    pub fn instantiate(
        &self,
        source: &SourceRef,
        renderer: &dyn TemplateRenderer,
    ) -> Result<SignatureRequest, FlowError> {
        debug!(template = %self.name, source = %source.display_name, "instantiating request template");
        let mut request = SignatureRequest::new(source.display_name.clone(), self.locale.clone());
        request.ordered = self.ordered;
        request.sign_position = self.sign_position;
        request.reminder = self.reminder;
        request.init_mail_subject = renderer.render(&self.init_mail_subject, source);
        request.init_mail_body = renderer.render(&self.init_mail_body, source);
        request.remind_mail_subject = self
            .remind_mail_subject
            .as_deref()
            .map(|t| renderer.render(t, source));
        request.remind_mail_body = self
            .remind_mail_body
            .as_deref()
            .map(|t| renderer.render(t, source));
        request.signatories = self.signatories.iter().map(|s| s.to_signatory()).collect();
        for rule in &self.notifications {
            request.add_notification(rule.clone())?;
        }
        request.source = Some(source.clone());
        Ok(request)
    }
}
