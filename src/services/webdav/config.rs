use anyhow::{anyhow, Result};
use url::Url;

use crate::models::VerificationRequest;

/// WebDAV server configuration for a single verification
#[derive(Debug, Clone)]
pub struct WebDAVConfig {
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub base_path: String,
    pub timeout_seconds: u64,
}

impl WebDAVConfig {
    pub fn from_request(request: &VerificationRequest, timeout_seconds: u64) -> Self {
        Self {
            server_url: request.url.trim().to_string(),
            username: request.username.clone(),
            password: request.password.clone(),
            base_path: request.path.trim().to_string(),
            timeout_seconds,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_empty() {
            return Err(anyhow!("Server URL cannot be empty"));
        }

        if self.username.is_empty() {
            return Err(anyhow!("Username cannot be empty"));
        }

        if self.password.is_empty() {
            return Err(anyhow!("Password cannot be empty"));
        }

        // Validate URL format
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(anyhow!("Server URL must start with http:// or https://"));
        }

        Url::parse(&self.server_url).map_err(|e| anyhow!("Invalid server URL: {}", e))?;
        Ok(())
    }

    /// URL of the collection to list.
    ///
    /// Imported profiles already carry the base path inside the URL, so the
    /// path is only appended when the URL does not end with it.
    pub fn collection_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.server_url)?;
        let base = self.base_path.trim_matches('/');

        let current = url.path().trim_end_matches('/').to_string();
        if !base.is_empty() && !current.ends_with(&format!("/{}", base)) {
            url.set_path(&format!("{}/{}", current, base));
        }

        if !url.path().ends_with('/') {
            let with_slash = format!("{}/", url.path());
            url.set_path(&with_slash);
        }
        Ok(url)
    }

    /// Gets the timeout duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(server_url: &str, base_path: &str) -> WebDAVConfig {
        WebDAVConfig {
            server_url: server_url.to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
            base_path: base_path.to_string(),
            timeout_seconds: 30,
        }
    }

    #[test]
    fn test_path_is_appended_to_server_root() {
        let url = config("https://dav.example.com", "/product_images").collection_url().unwrap();
        assert_eq!(url.as_str(), "https://dav.example.com/product_images/");
    }

    #[test]
    fn test_path_already_in_url_is_not_repeated() {
        let url = config("https://h:8443/dav", "/dav").collection_url().unwrap();
        assert_eq!(url.as_str(), "https://h:8443/dav/");

        let url = config("https://h/remote/dav/", "dav").collection_url().unwrap();
        assert_eq!(url.as_str(), "https://h/remote/dav/");
    }

    #[test]
    fn test_path_is_nested_under_url_path() {
        let url = config("https://h/remote.php/webdav", "/photos").collection_url().unwrap();
        assert_eq!(url.as_str(), "https://h/remote.php/webdav/photos/");
    }

    #[test]
    fn test_empty_path_lists_url_itself() {
        let url = config("http://h/files", "").collection_url().unwrap();
        assert_eq!(url.as_str(), "http://h/files/");
    }

    #[test]
    fn test_validate_rejects_incomplete_config() {
        assert!(config("", "/").validate().is_err());
        assert!(config("ftp://h", "/").validate().is_err());

        let mut no_password = config("https://h", "/");
        no_password.password.clear();
        assert!(no_password.validate().is_err());

        assert!(config("https://h", "/").validate().is_ok());
    }
}
