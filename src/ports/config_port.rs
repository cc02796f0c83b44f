//! Deployment configuration port trait.

/// Read-only access to sectioned key/value settings. Values come back as raw
/// strings; parsing and range checks belong to `domain::settings`.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
