//! Connection settings for the GridDB Web API.

use loader_populate::StoreError;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:8080";
pub const DEFAULT_CLUSTER: &str = "myCluster";
pub const DEFAULT_DATABASE: &str = "public";
pub const DEFAULT_USER: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the Web API lives and how to authenticate against it.
#[derive(Clone, PartialEq, Eq)]
pub struct WebApiConfig {
    /// Scheme, host and port of the Web API, e.g. `http://localhost:8080`
    pub url: String,
    pub cluster: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for WebApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            cluster: DEFAULT_CLUSTER.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for WebApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebApiConfig")
            .field("url", &self.url)
            .field("cluster", &self.cluster)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"****")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Mask the password in a URL carrying `user:password@` credentials, for
/// safe logging. Strings that do not parse as URLs are returned unchanged.
pub fn mask_password(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            // Only fails for cannot-be-a-base URLs, which have no password.
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => url.to_string(),
    }
}

impl WebApiConfig {
    /// Credentials and target in one line, with the password hidden.
    pub fn describe(&self) -> String {
        format!(
            "{} (cluster: {}, database: {}, user: {}, password: ***)",
            mask_password(&self.url),
            self.cluster,
            self.database,
            self.user
        )
    }

    /// Build the URL of an endpoint below
    /// `{url}/griddb/v2/{cluster}/dbs/{database}`.
    ///
    /// Every segment is percent-encoded, so cluster, database and container
    /// names may contain characters that are not valid in a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| StoreError::Connection(format!("Invalid URL '{}': {e}", self.url)))?;

        url.path_segments_mut()
            .map_err(|_| StoreError::Connection(format!("URL '{}' cannot be a base", self.url)))?
            .pop_if_empty()
            .extend(["griddb", "v2", self.cluster.as_str(), "dbs", self.database.as_str()])
            .extend(segments);

        Ok(url)
    }
}
