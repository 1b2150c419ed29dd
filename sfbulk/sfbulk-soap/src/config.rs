use std::{path::PathBuf, time::Duration};

use sfbulk_core::Credentials;

pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";
pub const DEFAULT_API_VERSION: &str = "59.0";
pub const DEFAULT_BATCH_SIZE: u32 = 2000;

/// Settings for [`SoapClient`](crate::SoapClient).
#[derive(Debug, Clone)]
pub struct SoapConfig {
    pub credentials: Credentials,
    pub login_url: String,
    pub api_version: String,
    /// Enterprise WSDL; its `soap:address` overrides the login endpoint.
    pub wsdl_file: Option<PathBuf>,
    /// Page size sent in the `QueryOptions` header.
    pub batch_size: u32,
    pub timeout: Duration,
}

impl SoapConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            login_url: DEFAULT_LOGIN_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            wsdl_file: None,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: Duration::from_secs(60),
        }
    }

    /// Login endpoint used when no WSDL is configured.
    pub fn default_endpoint(&self) -> String {
        format!(
            "{}/services/Soap/c/{}",
            self.login_url.trim_end_matches('/'),
            self.api_version
        )
    }
}
