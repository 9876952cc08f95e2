//! Base URL resolution.
//!
//! The base URL is read once at startup and handed to `TrackerClient::new`;
//! nothing else in the crate reads the environment.

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "TOOL_TRACKER_API_URL";

/// Used when neither a flag nor the environment supplies a base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    /// An explicit value wins over the environment value, which wins over
    /// `DEFAULT_BASE_URL`. Blank values count as unset.
    pub fn resolve(explicit: Option<String>, from_env: Option<String>) -> Self {
        let base_url = explicit
            .into_iter()
            .chain(from_env)
            .map(|url| url.trim().to_string())
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default() {
        assert_eq!(ClientConfig::resolve(None, None), ClientConfig::default());
    }

    #[test]
    fn environment_value_is_used() {
        let config = ClientConfig::resolve(None, Some("http://tracker:9000/api".into()));
        assert_eq!(config.base_url, "http://tracker:9000/api");
    }

    #[test]
    fn explicit_value_beats_environment() {
        let config = ClientConfig::resolve(
            Some("http://flag/api".into()),
            Some("http://env/api".into()),
        );
        assert_eq!(config.base_url, "http://flag/api");
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = ClientConfig::resolve(Some("  ".into()), Some(String::new()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
