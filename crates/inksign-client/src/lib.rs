//! HTTP gateway to the remote signing service: configuration, one error
//! channel, wire payload types, and typed endpoint calls.

pub mod config;
pub mod error;
pub mod gateway;
pub mod wire;

pub use config::{ClientConfig, Environment};
pub use error::ClientError;
pub use gateway::Gateway;
