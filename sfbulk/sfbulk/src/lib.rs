//! Bulk CSV maintenance for a remote CRM.
//!
//! A [`Session`] wraps one [`CrmClient`](sfbulk_core::CrmClient) (REST or
//! SOAP) and offers describe, query and row-by-row create/update/delete of
//! [`Table`]s loaded from CSV files.

mod error;
mod mutate;
mod query;
mod retry;
mod schema_cache;
mod session;
mod table;

pub use error::SfBulkError;
pub use mutate::{
    Action, BatchEvent, BatchResult, PROGRESS_INTERVAL, artifact_id, past_tense_label,
};
pub use query::{QueryFormat, QueryNormalizer, QueryOutput, convert_value, validate_query};
pub use retry::{RetryPolicy, Retrying};
pub use schema_cache::SchemaCache;
pub use session::{Session, SessionBuilder};
pub use sfbulk_core as core;
#[cfg(feature = "rest")]
pub use sfbulk_rest as rest;
#[cfg(feature = "soap")]
pub use sfbulk_soap as soap;
pub use table::{Table, load_table, read_table};
