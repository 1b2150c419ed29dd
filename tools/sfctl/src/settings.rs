//! Layered configuration: optional TOML file under `SFBULK_` environment variables.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use sfbulk::{
    RetryPolicy, Session,
    core::{CrmClient, Credentials},
    rest::{RestClient, RestConfig},
    soap::{SoapClient, SoapConfig},
};

const DEFAULT_CONFIG_FILE: &str = "sfbulk.toml";
const ENV_PREFIX: &str = "SFBULK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Rest,
    #[default]
    Soap,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: Backend,
    pub log_level: String,
    /// Directory for success and failure artifacts.
    pub output_dir: PathBuf,
    pub salesforce: SalesforceSettings,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SalesforceSettings {
    pub user: String,
    pub password: String,
    pub token: String,
    pub login_url: String,
    pub api_version: String,
    /// OAuth consumer key, REST only.
    pub client_id: String,
    pub client_secret: String,
    /// Enterprise WSDL, SOAP only.
    pub wsdl_file: Option<PathBuf>,
    pub batch_size: Option<u32>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            log_level: "warn".to_string(),
            output_dir: PathBuf::from("."),
            salesforce: SalesforceSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl Default for SalesforceSettings {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            token: String::new(),
            login_url: sfbulk::soap::DEFAULT_LOGIN_URL.to_string(),
            api_version: sfbulk::soap::DEFAULT_API_VERSION.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            wsdl_file: None,
            batch_size: None,
            timeout_secs: 60,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            base_delay_ms: policy.base_delay.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Load `file` (or `sfbulk.toml` when present) and overlay `SFBULK_*`
    /// variables, e.g. `SFBULK_SALESFORCE__USER`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(settings)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_retries,
            Duration::from_millis(self.retry.base_delay_ms),
        )
    }

    /// Construct the configured client. No network call happens until the
    /// first request.
    pub fn client(&self) -> Result<Box<dyn CrmClient>> {
        let sf = &self.salesforce;
        let credentials = Credentials::new(&sf.user, &sf.password, &sf.token);
        let timeout = Duration::from_secs(sf.timeout_secs);
        let client: Box<dyn CrmClient> = match self.backend {
            Backend::Rest => {
                let mut config = RestConfig::new(credentials, &sf.client_id, &sf.client_secret);
                config.login_url = sf.login_url.clone();
                config.api_version = sf.api_version.clone();
                config.batch_size = sf.batch_size;
                config.timeout = timeout;
                Box::new(RestClient::new(config)?)
            }
            Backend::Soap => {
                let mut config = SoapConfig::new(credentials);
                config.login_url = sf.login_url.clone();
                config.api_version = sf.api_version.clone();
                config.wsdl_file = sf.wsdl_file.clone();
                if let Some(size) = sf.batch_size {
                    config.batch_size = size;
                }
                config.timeout = timeout;
                Box::new(SoapClient::new(config)?)
            }
        };
        tracing::debug!(backend = %client.kind(), "client configured");
        Ok(client)
    }

    pub fn session(&self) -> Result<Session> {
        Ok(Session::builder_boxed(self.client()?)
            .with_retry(self.retry_policy())
            .with_output_dir(&self.output_dir)
            .build())
    }
}
