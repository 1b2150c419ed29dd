//! Remote client contract implemented by the REST and SOAP variants.

use std::fmt;

use crate::{
    error::ClientError,
    mutation::{FieldValues, MutationReceipt},
    record::{QueryCursor, QueryPage},
    schema::{ObjectSchema, ObjectSummary},
};

/// Identifies which underlying client library a [`CrmClient`] speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    /// Lightweight REST/JSON client.
    Rest,
    /// Enterprise SOAP/XML client.
    Soap,
}

impl ClientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Soap => "soap",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which records a query sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryScope {
    /// Live records only.
    #[default]
    Live,
    /// Live records plus logically deleted ones (`isDeleted = true`).
    IncludeDeleted,
}

/// Network-level interface to the CRM.
///
/// One implementation is chosen when a session is constructed; callers never
/// inspect response shapes to tell the variants apart. Implementations log in
/// lazily on the first call that needs a session and release that session in
/// [`close`](CrmClient::close).
pub trait CrmClient {
    /// Returns the variant this client speaks.
    fn kind(&self) -> ClientKind;

    /// Bookkeeping keys this variant places inside query records.
    fn meta_keys(&self) -> &'static [&'static str] {
        &[]
    }

    /// Fetch the field definitions of one object type.
    fn describe(&self, object_type: &str) -> Result<ObjectSchema, ClientError>;

    /// List every object type visible to the logged-in user.
    fn list_objects(&self) -> Result<Vec<ObjectSummary>, ClientError>;

    /// Run a query and return its first page.
    fn run_query(&self, query: &str, scope: QueryScope) -> Result<QueryPage, ClientError>;

    /// Fetch the page following `cursor`.
    fn continue_query(&self, cursor: &QueryCursor) -> Result<QueryPage, ClientError>;

    fn create_record(
        &self,
        object_type: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError>;

    fn update_record(
        &self,
        object_type: &str,
        id: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError>;

    fn delete_record(&self, object_type: &str, id: &str) -> Result<MutationReceipt, ClientError>;

    /// Tear down the remote session, if one was opened.
    fn close(&mut self) -> Result<(), ClientError> {
        Ok(())
    }
}

impl<C: CrmClient + ?Sized> CrmClient for Box<C> {
    fn kind(&self) -> ClientKind {
        (**self).kind()
    }

    fn meta_keys(&self) -> &'static [&'static str] {
        (**self).meta_keys()
    }

    fn describe(&self, object_type: &str) -> Result<ObjectSchema, ClientError> {
        (**self).describe(object_type)
    }

    fn list_objects(&self) -> Result<Vec<ObjectSummary>, ClientError> {
        (**self).list_objects()
    }

    fn run_query(&self, query: &str, scope: QueryScope) -> Result<QueryPage, ClientError> {
        (**self).run_query(query, scope)
    }

    fn continue_query(&self, cursor: &QueryCursor) -> Result<QueryPage, ClientError> {
        (**self).continue_query(cursor)
    }

    fn create_record(
        &self,
        object_type: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        (**self).create_record(object_type, fields)
    }

    fn update_record(
        &self,
        object_type: &str,
        id: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        (**self).update_record(object_type, id, fields)
    }

    fn delete_record(&self, object_type: &str, id: &str) -> Result<MutationReceipt, ClientError> {
        (**self).delete_record(object_type, id)
    }

    fn close(&mut self) -> Result<(), ClientError> {
        (**self).close()
    }
}
