use anyhow::{anyhow, Result};
use reqwest::{Client, Method};
use tracing::{debug, error, info};

use super::config::WebDAVConfig;
use crate::models::VerificationResponse;
use crate::webdav_xml_parser::count_collection_entries;

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
            <D:propfind xmlns:D="DAV:">
                <D:prop>
                    <D:displayname/>
                    <D:resourcetype/>
                </D:prop>
            </D:propfind>"#;

pub struct WebDAVConnection {
    client: Client,
    config: WebDAVConfig,
}

impl WebDAVConnection {
    pub fn new(config: WebDAVConfig) -> Result<Self> {
        // Validate configuration first
        config.validate()?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { client, config })
    }

    /// Verifies credentials by listing the configured collection once.
    pub async fn test_connection(&self) -> VerificationResponse {
        info!("🔍 Testing WebDAV connection to: {}", self.config.server_url);

        match self.count_entries().await {
            Ok(items) => {
                info!("✅ WebDAV connection successful, {} entries", items);
                VerificationResponse::ok(items)
            }
            Err(e) => {
                error!("❌ WebDAV connection failed: {}", e);
                VerificationResponse::failed(e.to_string())
            }
        }
    }

    /// Performs a Depth 1 PROPFIND and counts the collection's direct entries
    pub async fn count_entries(&self) -> Result<u64> {
        let url = self.config.collection_url()?;

        let response = self
            .client
            .request(Method::from_bytes(b"PROPFIND")?, url.clone())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Depth", "1")
            .header("Content-Type", "application/xml")
            .body(PROPFIND_BODY)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 207 {
            return Err(anyhow!(
                "PROPFIND failed for '{}' with status: {}",
                url.path(),
                status
            ));
        }

        let body = response.text().await?;
        let entries = count_collection_entries(&body, url.path())?;
        debug!("PROPFIND successful for path: {}", url.path());
        Ok(entries as u64)
    }
}
