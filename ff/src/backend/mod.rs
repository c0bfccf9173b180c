//! Completion backends for remote decomposition
//!
//! A backend moves prompt text to some higher-fidelity model and returns
//! its raw reply. Prompting and validation live in
//! [`crate::decompose::RemoteDecomposer`].

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod command;
mod error;

pub use client::CompletionClient;
pub use command::CommandClient;
pub use error::BackendError;

use crate::config::RemoteConfig;

/// Create a completion client from config
///
/// Returns `Ok(None)` when no remote command is configured.
pub fn create_client(config: &RemoteConfig) -> Result<Option<Arc<dyn CompletionClient>>, BackendError> {
    debug!(command = ?config.command, "create_client: called");
    match &config.command {
        Some(argv) => {
            let client = CommandClient::new(argv, config.model.clone())?;
            Ok(Some(Arc::new(client)))
        }
        None => {
            debug!("create_client: no remote command configured");
            Ok(None)
        }
    }
}
