use reqwest::Url;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Where the MediLink API lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for an API path given as raw segments, such as
    /// `["api", "payment", "billing", hospital_id]`. Each segment is
    /// percent-encoded, so IDs containing `/`, `?` or spaces stay in one
    /// segment.
    pub fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Setup(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Setup(format!("base URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::new("http://api.medilink.lk/");
        assert_eq!(
            config.url(&["api", "payment", "billing"]).unwrap().as_str(),
            "http://api.medilink.lk/api/payment/billing"
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_url_segments_are_percent_encoded() {
        let config = ClientConfig::new("http://api.medilink.lk/v1");
        let url = config
            .url(&["api", "payment", "billing", "hospital", "H 001/x?y#z"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.medilink.lk/v1/api/payment/billing/hospital/H%20001%2Fx%3Fy%23z"
        );
        assert_eq!(url.path_segments().unwrap().count(), 5);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_base_url_is_setup_error() {
        let config = ClientConfig::new("not a url");
        assert!(matches!(config.url(&["api"]), Err(ClientError::Setup(_))));
    }
}
