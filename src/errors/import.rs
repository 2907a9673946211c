use thiserror::Error;

use super::StoreError;
use crate::models::ProfileFragment;

/// Errors from importing a foreign profile document or restoring an export
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("The file could not be read as a connection profile")]
    Unparseable,

    #[error("The profile has no hostname, so no server URL could be built")]
    MissingHostname { fragment: ProfileFragment },

    #[error("The synthesized URL '{url}' is not valid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Not a valid export file: {reason}")]
    InvalidExport { reason: String },

    #[error("Unsupported export version '{version}'")]
    UnsupportedVersion { version: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ImportError {
    /// Message shown to the user; parse failures stay generic.
    pub fn user_message(&self) -> String {
        match self {
            ImportError::Unparseable => {
                "Could not read the selected file. Make sure it is a valid connection profile."
                    .to_string()
            }
            ImportError::MissingHostname { .. } => {
                "The profile was only partially imported: it does not contain a hostname."
                    .to_string()
            }
            ImportError::Store(_) => "The imported profile could not be saved.".to_string(),
            other => other.to_string(),
        }
    }
}
