//! Request lifecycle controller, document packager, and the collaborator
//! seams (record store, activity notes, template renderer, signed-hook)
//! around them.

pub mod error;
pub mod lifecycle;
pub mod packager;
pub mod store;
pub mod template;

pub use error::FlowError;
pub use lifecycle::{Lifecycle, SweepReport};
pub use store::{
    ActivityNotes, MemoryStore, NoNotes, NoopHook, SignatureStore, SignedHook, TemplateRenderer,
};
pub use template::{RequestTemplate, TemplateSignatory};
