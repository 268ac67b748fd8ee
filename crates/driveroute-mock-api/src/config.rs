//! Mock API configuration.
//!
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `MOCK_PENDING_POLLS` - "in progress" answers before a job settles (default: 3)

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PENDING_POLLS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockConfig {
    pub port: u16,
    pub pending_polls: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            pending_polls: DEFAULT_PENDING_POLLS,
        }
    }
}

impl MockConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("SERVICE_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let pending_polls = lookup("MOCK_PENDING_POLLS")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PENDING_POLLS);
        Self {
            port,
            pending_polls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(MockConfig::from_lookup(|_| None), MockConfig::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = MockConfig::from_lookup(|name| match name {
            "SERVICE_PORT" => Some("9090".to_string()),
            "MOCK_PENDING_POLLS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 9090);
        assert_eq!(config.pending_polls, 0);
    }

    #[test]
    fn test_ignores_garbage() {
        let config = MockConfig::from_lookup(|_| Some("lots".to_string()));
        assert_eq!(config, MockConfig::default());
    }
}
