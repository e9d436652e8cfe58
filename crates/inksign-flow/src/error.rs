use thiserror::Error;

/// Failures of the lifecycle controller and document packager.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] inksign_core::ValidationError),

    #[error(transparent)]
    Client(#[from] inksign_client::ClientError),

    #[error(
        "file to sign '{0}' is not a valid PDF file; convert it to PDF before including it in a signature request"
    )]
    InvalidPdf(String),

    #[error("remote request for {name} was created with status '{status}' instead of draft")]
    BadRemoteStatus { name: String, status: String },

    #[error("remote request for {0} was created without an identifier")]
    NoRemoteIdentifier(String),

    #[error("failure when sending the signing request {name}: {message}")]
    ActivationFailed { name: String, message: String },

    #[error("store error: {0}")]
    Store(String),
}
