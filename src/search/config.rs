//! Search configuration

use crate::search::error::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Backend the executor talks to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchBackend {
    #[default]
    Elasticsearch,
    InMemory,
}

/// Search service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchConfig {
    /// Executor backend
    #[serde(default)]
    pub backend: SearchBackend,

    /// Cluster node URLs; requests go to the first one
    #[serde(default = "default_nodes")]
    pub nodes: Vec<String>,

    /// Basic auth user (required when security is enabled)
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password (required when security is enabled)
    #[serde(default)]
    pub password: Option<String>,

    /// Send basic auth credentials
    #[serde(default)]
    pub security_enabled: bool,

    /// Index used when the caller does not name one
    #[serde(default = "default_index")]
    #[validate(length(min = 1))]
    pub default_index: String,

    /// Page size of searches that do not ask for one
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1))]
    pub default_page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

impl SearchConfig {
    /// Validate field constraints
    pub fn check(&self) -> SearchResult<()> {
        self.validate()
            .map_err(|e| SearchError::Configuration(e.to_string()))
    }

    /// Basic auth credentials, if security is enabled
    pub fn credentials(&self) -> SearchResult<Option<(String, String)>> {
        if !self.security_enabled {
            return Ok(None);
        }

        match (&self.username, &self.password) {
            (Some(user), Some(password)) if !user.trim().is_empty() && !password.trim().is_empty() => {
                Ok(Some((user.clone(), password.clone())))
            }
            _ => Err(SearchError::Configuration(
                "search cluster user or password not found".to_string(),
            )),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: SearchBackend::default(),
            nodes: default_nodes(),
            username: None,
            password: None,
            security_enabled: false,
            default_index: default_index(),
            default_page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_nodes() -> Vec<String> {
    vec!["http://localhost:9200".to_string()]
}

fn default_index() -> String {
    "documents".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn backend(mut self, backend: SearchBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn nodes(mut self, nodes: Vec<String>) -> Self {
        self.config.nodes = nodes;
        self
    }

    pub fn node(mut self, node: impl Into<String>) -> Self {
        self.config.nodes = vec![node.into()];
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self.config.security_enabled = true;
        self
    }

    pub fn default_index(mut self, index: impl Into<String>) -> Self {
        self.config.default_index = index.into();
        self
    }

    pub fn default_page_size(mut self, size: u32) -> Self {
        self.config.default_page_size = size;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
