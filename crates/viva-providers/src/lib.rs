//! Outbound clients for the services an interview depends on.
//!
//! - [`WorkflowClient`]: the workflow engine that issues questions and
//!   receives answers through per-session resume URLs.
//! - [`GladiaClient`]: the live transcription provider.
//! - [`HeyGenClient`]: the avatar streaming provider.
//!
//! Every call carries its own timeout and reports failures as a
//! [`ProviderError`]; retry policy is left to the caller.

pub mod config;
pub mod error;
pub mod gladia;
pub mod heygen;
mod http;
pub mod workflow;

pub use config::{GladiaConfig, HeyGenConfig, WorkflowConfig};
pub use error::ProviderError;
pub use gladia::GladiaClient;
pub use heygen::HeyGenClient;
pub use workflow::{WorkflowClient, WorkflowSession};
