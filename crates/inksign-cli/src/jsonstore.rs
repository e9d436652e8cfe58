//! JSON-file persistence for signature requests.
//!
//! One file holds the whole store: the name sequence counter and every
//! request. Mutations stay in memory until [`JsonStore::persist`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use inksign_core::{RequestState, SignatureRequest};
use inksign_flow::{FlowError, SignatureStore};

#[derive(Default, Serialize, Deserialize)]
struct StoreFile {
    seq: u32,
    requests: Vec<SignatureRequest>,
}

pub struct JsonStore {
    path: PathBuf,
    file: StoreFile,
}

impl JsonStore {
    /// Open an existing store or start an empty one at `path`.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = if path.exists() {
            let reader = BufReader::new(
                File::open(path).with_context(|| format!("opening store {}", path.display()))?,
            );
            serde_json::from_reader(reader)
                .with_context(|| format!("parsing store {}", path.display()))?
        } else {
            StoreFile::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn all(&self) -> &[SignatureRequest] {
        &self.file.requests
    }

    pub fn load(&self, name: &str) -> anyhow::Result<SignatureRequest> {
        self.file
            .requests
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .with_context(|| format!("no request named {name} in the store"))
    }

    /// Write the store back to disk.
    pub fn persist(&self) -> anyhow::Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("writing store {}", self.path.display()))?;
        serde_json::to_writer_pretty(file, &self.file)
            .with_context(|| format!("serializing store {}", self.path.display()))?;
        Ok(())
    }
}

impl SignatureStore for JsonStore {
    fn load_by_state(&self, state: RequestState) -> Result<Vec<SignatureRequest>, FlowError> {
        Ok(self
            .file
            .requests
            .iter()
            .filter(|r| r.state == state)
            .cloned()
            .collect())
    }

    fn save(&mut self, request: SignatureRequest) -> Result<(), FlowError> {
        match self
            .file
            .requests
            .iter_mut()
            .find(|r| r.name == request.name)
        {
            Some(slot) => *slot = request,
            None => self.file.requests.push(request),
        }
        Ok(())
    }

    fn next_name(&mut self) -> String {
        self.file.seq += 1;
        format!("SIG/{:05}", self.file.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inksign_core::Attachment;

    #[test]
    fn roundtrips_requests_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.json");

        let mut store = JsonStore::open(&path).unwrap();
        let name = store.next_name();
        assert_eq!(name, "SIG/00001");

        let mut request = SignatureRequest::new(name.clone(), "fr_FR");
        request
            .documents
            .push(Attachment::new("contract.pdf", vec![1, 2, 3]));
        store.save(request).unwrap();
        store.persist().unwrap();

        let mut reopened = JsonStore::open(&path).unwrap();
        let loaded = reopened.load(&name).unwrap();
        assert_eq!(loaded.state, RequestState::Draft);
        assert_eq!(loaded.documents[0].bytes, vec![1, 2, 3]);
        // Sequence continues where it left off.
        assert_eq!(reopened.next_name(), "SIG/00002");
    }

    #[test]
    fn missing_request_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(&dir.path().join("requests.json")).unwrap();
        assert!(store.load("SIG/99999").is_err());
    }
}
