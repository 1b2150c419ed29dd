//! REST/JSON [`CrmClient`] implementation for `sfbulk`.
//!
//! [`RestClient`] logs in with the OAuth2 username/password flow on first
//! use and talks to the versioned data API afterwards:
//!
//! ```text
//! describe        GET    /sobjects/{type}/describe
//! list_objects    GET    /sobjects
//! run_query       GET    /query?q=...      (/queryAll for deleted records)
//! continue_query  GET    {nextRecordsUrl}
//! create_record   POST   /sobjects/{type}
//! update_record   PATCH  /sobjects/{type}/{id}
//! delete_record   DELETE /sobjects/{type}/{id}
//! ```

mod config;
mod wire;

use once_cell::unsync::OnceCell;
use reqwest::blocking::{Client, RequestBuilder};
use sfbulk_core::{
    ClientError, ClientKind, CrmClient, FieldValues, MutationReceipt, ObjectSchema, ObjectSummary,
    QueryCursor, QueryPage, QueryScope,
};

pub use config::{DEFAULT_API_VERSION, DEFAULT_LOGIN_URL, RestConfig};
pub use wire::{
    login_error, parse_describe, parse_mutation_response, parse_objects, parse_query_page,
    request_error,
};

const QUERY_OPTIONS_HEADER: &str = "Sforce-Query-Options";

struct RestSession {
    access_token: String,
    instance_url: String,
}

/// [`CrmClient`] speaking the REST data API.
pub struct RestClient {
    config: RestConfig,
    http: Client,
    session: OnceCell<RestSession>,
}

impl RestClient {
    pub fn new(config: RestConfig) -> Result<Self, ClientError> {
        if config.client_id.is_empty() {
            return Err(ClientError::Config(
                "the REST client requires a client_id".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::transport)?;
        Ok(Self {
            config,
            http,
            session: OnceCell::new(),
        })
    }

    fn session(&self) -> Result<&RestSession, ClientError> {
        self.session.get_or_try_init(|| self.login())
    }

    fn login(&self) -> Result<RestSession, ClientError> {
        let url = format!("{}/services/oauth2/token", self.login_base());
        let password = self.config.credentials.password_with_token();
        tracing::debug!(user = %self.config.credentials.user, %url, "requesting REST session");

        let request = self.http.post(&url).form(&[
            ("grant_type", "password"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("username", self.config.credentials.user.as_str()),
            ("password", password.as_str()),
        ]);
        let (status, body) = send(request)?;
        if !(200..300).contains(&status) {
            return Err(login_error(status, &body));
        }

        let token = wire::parse_token(&body)?;
        tracing::info!(instance = %token.instance_url, "REST session established");
        Ok(RestSession {
            access_token: token.access_token,
            instance_url: token.instance_url.trim_end_matches('/').to_string(),
        })
    }

    fn login_base(&self) -> &str {
        self.config.login_url.trim_end_matches('/')
    }

    fn data_url(&self, session: &RestSession, path: &str) -> String {
        format!(
            "{}/services/data/v{}{}",
            session.instance_url, self.config.api_version, path
        )
    }

    fn get(&self, url: &str) -> Result<String, ClientError> {
        let session = self.session()?;
        let mut request = self.http.get(url).bearer_auth(&session.access_token);
        if let Some(size) = self.config.batch_size {
            request = request.header(QUERY_OPTIONS_HEADER, format!("batchSize={size}"));
        }
        let (status, body) = send(request)?;
        if !(200..300).contains(&status) {
            return Err(request_error(status, &body));
        }
        Ok(body)
    }

    fn get_parsed<T>(
        &self,
        path: &str,
        parse: impl FnOnce(&str) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let url = self.data_url(self.session()?, path);
        parse(&self.get(&url)?)
    }

    fn mutate(&self, request: RequestBuilder) -> Result<MutationReceipt, ClientError> {
        let session = self.session()?;
        let (status, body) = send(request.bearer_auth(&session.access_token))?;
        parse_mutation_response(status, &body)
    }
}

impl CrmClient for RestClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Rest
    }

    fn meta_keys(&self) -> &'static [&'static str] {
        &["attributes"]
    }

    fn describe(&self, object_type: &str) -> Result<ObjectSchema, ClientError> {
        self.get_parsed(&format!("/sobjects/{object_type}/describe"), parse_describe)
    }

    fn list_objects(&self) -> Result<Vec<ObjectSummary>, ClientError> {
        self.get_parsed("/sobjects", parse_objects)
    }

    fn run_query(&self, query: &str, scope: QueryScope) -> Result<QueryPage, ClientError> {
        let endpoint = match scope {
            QueryScope::Live => "/query",
            QueryScope::IncludeDeleted => "/queryAll",
        };
        let session = self.session()?;
        let url = reqwest::Url::parse_with_params(
            &self.data_url(session, endpoint),
            &[("q", query)],
        )
        .map_err(|e| ClientError::Config(format!("invalid instance url: {e}")))?;
        parse_query_page(&self.get(url.as_str())?)
    }

    fn continue_query(&self, cursor: &QueryCursor) -> Result<QueryPage, ClientError> {
        let session = self.session()?;
        let url = format!("{}{}", session.instance_url, cursor.as_str());
        parse_query_page(&self.get(&url)?)
    }

    fn create_record(
        &self,
        object_type: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        let url = self.data_url(self.session()?, &format!("/sobjects/{object_type}"));
        self.mutate(self.http.post(url).json(&wire::payload(fields)))
    }

    fn update_record(
        &self,
        object_type: &str,
        id: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        let url = self.data_url(self.session()?, &format!("/sobjects/{object_type}/{id}"));
        self.mutate(self.http.patch(url).json(&wire::payload(fields)))
    }

    fn delete_record(&self, object_type: &str, id: &str) -> Result<MutationReceipt, ClientError> {
        let url = self.data_url(self.session()?, &format!("/sobjects/{object_type}/{id}"));
        self.mutate(self.http.delete(url))
    }

    fn close(&mut self) -> Result<(), ClientError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let url = format!("{}/services/oauth2/revoke", self.login_base());
        let request = self
            .http
            .post(&url)
            .form(&[("token", session.access_token.as_str())]);
        let (status, body) = send(request)?;
        if !(200..300).contains(&status) {
            return Err(ClientError::Http { status, body });
        }
        tracing::debug!("REST session revoked");
        Ok(())
    }
}

fn send(request: RequestBuilder) -> Result<(u16, String), ClientError> {
    let response = request.send().map_err(ClientError::transport)?;
    let status = response.status().as_u16();
    let body = response.text().map_err(ClientError::transport)?;
    Ok((status, body))
}
