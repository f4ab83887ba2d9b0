use crate::adapters::infoblox::FetchError;
use crate::adapters::mailer::MailError;
use crate::config::ConfigError;

/// Errors that end a run. Missing telemetry fields are not in here:
/// the normalizer absorbs them as empty strings.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error("delivery: {0}")]
    Delivery(#[from] MailError),
}

impl RunError {
    pub fn stage(&self) -> &'static str {
        match self {
            RunError::Config(_) => "config",
            RunError::Fetch(_) => "fetch",
            RunError::Delivery(_) => "delivery",
        }
    }
}
