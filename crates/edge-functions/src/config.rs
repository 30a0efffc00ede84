//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind the HTTP listener to
    pub host: String,

    /// Port for incoming function requests
    pub port: u16,

    /// Function every request is dispatched to
    pub function: String,

    /// Handler request timeout in seconds
    pub handler_timeout_secs: u64,

    /// Largest request body read before the request is rejected
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Missing or unparsable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::defaults();

        Self {
            host: lookup("EDGE_FUNCTIONS_HOST").unwrap_or(defaults.host),

            port: lookup("EDGE_FUNCTIONS_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),

            function: lookup("EDGE_FUNCTIONS_FUNCTION").unwrap_or(defaults.function),

            handler_timeout_secs: lookup("EDGE_FUNCTIONS_HANDLER_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.handler_timeout_secs),

            max_body_bytes: lookup("EDGE_FUNCTIONS_MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }

    /// Built-in defaults, ignoring the environment
    pub fn defaults() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            function: handle_signup::NAME.to_string(),
            handler_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }

    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);

        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.function, "handle_signup");
        assert_eq!(config.handler_timeout_secs, 30);
        assert_eq!(config.max_body_bytes, 1_048_576);
    }

    #[test]
    fn test_default_ignores_environment() {
        std::env::set_var("EDGE_FUNCTIONS_PORT", "9999");
        let config = AppConfig::default();
        std::env::remove_var("EDGE_FUNCTIONS_PORT");

        assert_eq!(config.port, 8000);
        assert_eq!(config.function, AppConfig::defaults().function);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EDGE_FUNCTIONS_HOST", "127.0.0.1"),
            ("EDGE_FUNCTIONS_PORT", "9000"),
            ("EDGE_FUNCTIONS_FUNCTION", "other"),
            ("EDGE_FUNCTIONS_HANDLER_TIMEOUT_SECS", "5"),
            ("EDGE_FUNCTIONS_MAX_BODY_BYTES", "64"),
        ]));

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.function, "other");
        assert_eq!(config.handler_timeout_secs, 5);
        assert_eq!(config.max_body_bytes, 64);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EDGE_FUNCTIONS_PORT", "not-a-port"),
            ("EDGE_FUNCTIONS_HANDLER_TIMEOUT_SECS", "-1"),
        ]));

        assert_eq!(config.port, 8000);
        assert_eq!(config.handler_timeout_secs, 30);
    }
}
