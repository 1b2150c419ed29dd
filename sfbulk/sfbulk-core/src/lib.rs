//! Client-agnostic core types and the remote client contract for `sfbulk`.
//!
//! This crate provides the normalized representations both client variants
//! produce ([`ObjectSchema`], [`QueryPage`], [`MutationReceipt`], [`Value`])
//! and the [`CrmClient`] trait the bulk engine is written against.

mod client;
mod credentials;
mod error;
mod mutation;
mod record;
mod schema;
mod value;

pub use client::{ClientKind, CrmClient, QueryScope};
pub use credentials::Credentials;
pub use error::ClientError;
pub use mutation::{FieldValues, MutationReceipt, ReceiptOutcome};
pub use record::{QueryCursor, QueryPage, Record};
pub use schema::{
    FieldDescriptor, FieldKind, ObjectSchema, ObjectSummary, format_field_lines,
    format_object_lines,
};
pub use value::Value;
