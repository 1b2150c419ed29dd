//! Enterprise SOAP/XML [`CrmClient`] implementation for `sfbulk`.
//!
//! [`SoapClient`] posts hand-built envelopes to the endpoint named by
//! the enterprise WSDL (or the default login endpoint) and parses the replies
//! with `quick-xml`. Query records come back with the sObject type in an
//! `xsi:type` attribute and a `type` child element, which the engine treats
//! as bookkeeping.

mod config;
mod envelope;
mod response;
mod wsdl;
mod xml;

use once_cell::unsync::OnceCell;
use reqwest::blocking::Client;
use sfbulk_core::{
    ClientError, ClientKind, CrmClient, FieldValues, MutationReceipt, ObjectSchema, ObjectSummary,
    QueryCursor, QueryPage, QueryScope,
};

pub use config::{DEFAULT_API_VERSION, DEFAULT_BATCH_SIZE, DEFAULT_LOGIN_URL, SoapConfig};
pub use envelope::Headers;
pub use response::{
    LoginResult, parse_describe, parse_login, parse_objects, parse_query_page, parse_save_result,
};
pub use wsdl::{endpoint_from_wsdl, endpoint_from_wsdl_str};
pub use xml::{XmlElement, parse_document};

/// Request envelope builders, exposed for inspection and testing.
pub mod request {
    pub use crate::envelope::{
        create, delete, describe_global, describe_sobject, envelope, login, logout, query,
        query_more, update,
    };
}

struct SoapSession {
    session_id: String,
    server_url: String,
}

/// [`CrmClient`] speaking the enterprise SOAP API.
pub struct SoapClient {
    config: SoapConfig,
    endpoint: String,
    http: Client,
    session: OnceCell<SoapSession>,
}

impl SoapClient {
    pub fn new(config: SoapConfig) -> Result<Self, ClientError> {
        let endpoint = match &config.wsdl_file {
            Some(path) => endpoint_from_wsdl(path)?,
            None => config.default_endpoint(),
        };
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::transport)?;
        Ok(Self {
            config,
            endpoint,
            http,
            session: OnceCell::new(),
        })
    }

    /// Endpoint the login request is sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn session(&self) -> Result<&SoapSession, ClientError> {
        self.session.get_or_try_init(|| self.login())
    }

    fn login(&self) -> Result<SoapSession, ClientError> {
        let credentials = &self.config.credentials;
        tracing::debug!(
            user = %credentials.user,
            endpoint = %self.endpoint,
            "requesting SOAP session"
        );
        let body = envelope::login(&credentials.user, &credentials.password_with_token());
        let xml = self.post(
            &self.endpoint,
            "login",
            &envelope::envelope(Headers::default(), &body),
        )?;
        let result = parse_login(&xml)?;
        tracing::info!(server = %result.server_url, "SOAP session established");
        Ok(SoapSession {
            session_id: result.session_id,
            server_url: result.server_url,
        })
    }

    /// Send an authenticated call to the session's server URL.
    fn call(
        &self,
        action: &str,
        body: &str,
        batch_size: Option<u32>,
    ) -> Result<String, ClientError> {
        let session = self.session()?;
        let headers = Headers {
            session_id: Some(&session.session_id),
            batch_size,
        };
        self.post(&session.server_url, action, &envelope::envelope(headers, body))
    }

    fn post(&self, url: &str, action: &str, envelope: &str) -> Result<String, ClientError> {
        let reply = self
            .http
            .post(url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", action)
            .body(envelope.to_string())
            .send()
            .map_err(ClientError::transport)?;
        let status = reply.status().as_u16();
        let body = reply.text().map_err(ClientError::transport)?;
        if (200..300).contains(&status) {
            return Ok(body);
        }
        // Faults arrive with a 500 status and a structured body.
        match response::body_results(&body) {
            Err(fault @ ClientError::Fault { .. }) => Err(fault),
            _ => Err(ClientError::Http { status, body }),
        }
    }
}

impl CrmClient for SoapClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Soap
    }

    fn meta_keys(&self) -> &'static [&'static str] {
        &["type"]
    }

    fn describe(&self, object_type: &str) -> Result<ObjectSchema, ClientError> {
        let xml = self.call(
            "describeSObject",
            &envelope::describe_sobject(object_type),
            None,
        )?;
        parse_describe(&xml)
    }

    fn list_objects(&self) -> Result<Vec<ObjectSummary>, ClientError> {
        let xml = self.call("describeGlobal", &envelope::describe_global(), None)?;
        parse_objects(&xml)
    }

    fn run_query(&self, query: &str, scope: QueryScope) -> Result<QueryPage, ClientError> {
        let operation = match scope {
            QueryScope::Live => "query",
            QueryScope::IncludeDeleted => "queryAll",
        };
        let xml = self.call(
            operation,
            &envelope::query(operation, query),
            Some(self.config.batch_size),
        )?;
        parse_query_page(&xml)
    }

    fn continue_query(&self, cursor: &QueryCursor) -> Result<QueryPage, ClientError> {
        let xml = self.call(
            "queryMore",
            &envelope::query_more(cursor.as_str()),
            Some(self.config.batch_size),
        )?;
        parse_query_page(&xml)
    }

    fn create_record(
        &self,
        object_type: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        let xml = self.call("create", &envelope::create(object_type, fields), None)?;
        parse_save_result(&xml)
    }

    fn update_record(
        &self,
        object_type: &str,
        id: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        let xml = self.call("update", &envelope::update(object_type, id, fields), None)?;
        parse_save_result(&xml)
    }

    fn delete_record(&self, _object_type: &str, id: &str) -> Result<MutationReceipt, ClientError> {
        let xml = self.call("delete", &envelope::delete(id), None)?;
        parse_save_result(&xml)
    }

    fn close(&mut self) -> Result<(), ClientError> {
        if self.session.get().is_none() {
            return Ok(());
        }
        self.call("logout", &envelope::logout(), None)?;
        self.session.take();
        tracing::debug!("SOAP session closed");
        Ok(())
    }
}
