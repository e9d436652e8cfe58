pub mod error;
pub mod notification;
pub mod placement;
pub mod request;
pub mod signatory;

pub use error::ValidationError;
pub use notification::{NotificationEvent, NotificationRule};
pub use placement::{Rect, signature_position};
pub use request::{
    Attachment, ReminderPolicy, RequestState, SignPosition, SignatureRequest, SourceRef,
};
pub use signatory::{AuthMode, Signatory, SignerState, map_remote_status};
