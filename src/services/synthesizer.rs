use crate::models::{ProfileFragment, DEFAULT_PORT, IMPORT_DEFAULT_PATH};
use crate::services::foreign_profile::ForeignFields;

/// Protocol value that selects HTTPS; anything else means plain HTTP.
pub const SECURE_PROTOCOL: &str = "davs";

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Builds `scheme://host[:port]path` from imported fields.
///
/// Returns `None` without a hostname. Port 443 is never spelled out, even for
/// plain HTTP, and the path falls back to [`IMPORT_DEFAULT_PATH`].
pub fn synthesize_url(fields: &ForeignFields) -> Option<String> {
    let hostname = present(&fields.hostname)?;

    let scheme = if present(&fields.protocol) == Some(SECURE_PROTOCOL) {
        "https"
    } else {
        "http"
    };

    let port_suffix = match present(&fields.port) {
        Some(port) if port != DEFAULT_PORT => format!(":{}", port),
        _ => String::new(),
    };

    let path_suffix = present(&fields.path).unwrap_or(IMPORT_DEFAULT_PATH);

    Some(format!("{}://{}{}{}", scheme, hostname, port_suffix, path_suffix))
}

/// Derives the profile fragment an import contributes.
pub fn synthesize_profile(fields: &ForeignFields) -> ProfileFragment {
    ProfileFragment {
        url: synthesize_url(fields),
        username: present(&fields.username).map(str::to_string),
        path: present(&fields.path).map(str::to_string),
        port: present(&fields.port).map(str::to_string),
        ..Default::default()
    }
}
