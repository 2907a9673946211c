// WebDAV access used by the verification endpoint

pub mod config;
pub mod connection;

pub use config::WebDAVConfig;
pub use connection::WebDAVConnection;
