use reqwest::Client;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::models::{ConnectionProfile, ProbeResult, VerificationRequest, VerificationResponse};

/// Asks the verification endpoint to check a profile against its WebDAV server.
///
/// One request per call, no retry. The client carries a timeout so a hung
/// verification server cannot stall the caller indefinitely.
#[derive(Clone)]
pub struct ConnectivityProber {
    client: Client,
    endpoint: String,
}

impl ConnectivityProber {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one verification round trip. Always resolves to a [`ProbeResult`].
    ///
    /// Callers must check [`ConnectionProfile::missing_probe_fields`] first.
    pub async fn probe(&self, profile: &ConnectionProfile) -> ProbeResult {
        info!("🔍 Testing WebDAV connection to: {}", profile.url);

        let request = VerificationRequest {
            url: profile.url.clone(),
            username: profile.username.clone(),
            password: profile.password.clone(),
            path: profile.path.clone(),
        };

        let response = match self.client.post(&self.endpoint).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("❌ Verification request failed: {}", e);
                return ProbeResult::Error {
                    message: e.to_string(),
                };
            }
        };

        let status = response.status();
        // The verification server answers failures with a JSON body too, so
        // the status code alone does not decide the outcome.
        match response.json::<VerificationResponse>().await {
            Ok(body) => {
                let result = ProbeResult::from(body);
                match &result {
                    ProbeResult::Success { item_count } => {
                        info!("✅ WebDAV connection successful, {} items", item_count)
                    }
                    other => warn!("WebDAV connection test failed: {}", other),
                }
                result
            }
            Err(e) => {
                error!("❌ Unreadable verification response (status {}): {}", status, e);
                ProbeResult::Error {
                    message: format!("Invalid response from verification server ({}): {}", status, e),
                }
            }
        }
    }
}
