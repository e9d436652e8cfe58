//! Collaborator seams around the lifecycle controller.
//!
//! The controller never talks to a concrete record system: it goes
//! through these traits, so the surrounding application (or a test)
//! decides where requests live and where activity notes land.

use inksign_core::{RequestState, SignatureRequest, SourceRef};

use crate::error::FlowError;

/// Persistence for signature requests, keyed by request name.
pub trait SignatureStore {
    fn load_by_state(&self, state: RequestState) -> Result<Vec<SignatureRequest>, FlowError>;
    fn save(&mut self, request: SignatureRequest) -> Result<(), FlowError>;
    /// Next name in the local sequence, for requests created without one.
    fn next_name(&mut self) -> String;
}

/// Opportunistic activity notes on the originating business record.
///
/// Implementations that cannot post notes simply drop them.
pub trait ActivityNotes {
    fn post_note(&mut self, source: &SourceRef, text: &str);
}

/// Sink for callers without a linked record system.
pub struct NoNotes;

impl ActivityNotes for NoNotes {
    fn post_note(&mut self, _source: &SourceRef, _text: &str) {}
}

/// Renders a subject/body template string against a source record.
pub trait TemplateRenderer {
    fn render(&self, template: &str, source: &SourceRef) -> String;
}

/// Extension point invoked once every signatory has signed, before the
/// request is persisted. Replaces ad-hoc subclassing: inject a strategy
/// into [`crate::Lifecycle::with_hook`].
pub trait SignedHook {
    fn on_signed(&self, request: &SignatureRequest);
}

/// Default hook: does nothing.
pub struct NoopHook;

impl SignedHook for NoopHook {
    fn on_signed(&self, _request: &SignatureRequest) {}
}

/// In-memory store, used by tests and the demo paths.
#[derive(Default)]
pub struct MemoryStore {
    requests: Vec<SignatureRequest>,
    seq: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, request: SignatureRequest) {
        self.requests.push(request);
    }

    pub fn get(&self, name: &str) -> Option<&SignatureRequest> {
        self.requests.iter().find(|r| r.name == name)
    }
}

impl SignatureStore for MemoryStore {
    fn load_by_state(&self, state: RequestState) -> Result<Vec<SignatureRequest>, FlowError> {
        Ok(self
            .requests
            .iter()
            .filter(|r| r.state == state)
            .cloned()
            .collect())
    }

    fn save(&mut self, request: SignatureRequest) -> Result<(), FlowError> {
        match self.requests.iter_mut().find(|r| r.name == request.name) {
            Some(slot) => *slot = request,
            None => self.requests.push(request),
        }
        Ok(())
    }

    fn next_name(&mut self) -> String {
        self.seq += 1;
        format!("SIG/{:05}", self.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_names_are_monotonic() {
        let mut store = MemoryStore::new();
        assert_eq!(store.next_name(), "SIG/00001");
        assert_eq!(store.next_name(), "SIG/00002");
    }

    #[test]
    fn save_replaces_by_name() {
        let mut store = MemoryStore::new();
        store.insert(SignatureRequest::new("SIG/00001", "en_US"));

        let mut updated = SignatureRequest::new("SIG/00001", "en_US");
        updated.state = RequestState::Sent;
        store.save(updated).unwrap();

        assert_eq!(store.get("SIG/00001").unwrap().state, RequestState::Sent);
        assert_eq!(store.load_by_state(RequestState::Sent).unwrap().len(), 1);
        assert!(store.load_by_state(RequestState::Draft).unwrap().is_empty());
    }
}
