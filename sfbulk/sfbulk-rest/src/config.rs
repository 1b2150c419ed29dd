use std::time::Duration;

use sfbulk_core::Credentials;

pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";
pub const DEFAULT_API_VERSION: &str = "59.0";

/// Settings for [`RestClient`](crate::RestClient).
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub credentials: Credentials,
    /// Connected-app consumer key used for the OAuth2 password flow.
    pub client_id: String,
    pub client_secret: String,
    pub login_url: String,
    pub api_version: String,
    /// Requested page size for queries; the server default applies when `None`.
    pub batch_size: Option<u32>,
    pub timeout: Duration,
}

impl RestConfig {
    pub fn new(
        credentials: Credentials,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            batch_size: None,
            timeout: Duration::from_secs(60),
        }
    }
}
