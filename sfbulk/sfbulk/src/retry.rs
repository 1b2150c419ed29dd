//! Bounded retry of mutation calls on transient remote errors.

use std::{thread, time::Duration};

use sfbulk_core::{
    ClientError, ClientKind, CrmClient, FieldValues, MutationReceipt, ObjectSchema, ObjectSummary,
    QueryCursor, QueryPage, QueryScope,
};

/// How often and how patiently a mutation call is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; grows linearly with each attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Never retry.
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Run `call`, repeating it while it fails with a transient error and
    /// attempts remain. Schema faults are never transient.
    pub fn run<T>(
        &self,
        what: &str,
        mut call: impl FnMut() -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut attempt = 0;
        loop {
            match call() {
                Err(err) if attempt < self.max_retries && err.is_transient() => {
                    attempt += 1;
                    tracing::warn!(%err, attempt, max = self.max_retries, "retrying {what}");
                    let delay = self.base_delay * attempt;
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                }
                result => return result,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// [`CrmClient`] adapter applying a [`RetryPolicy`] to create, update and
/// delete calls. Reads pass straight through.
pub struct Retrying<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: CrmClient> Retrying<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: CrmClient> CrmClient for Retrying<C> {
    fn kind(&self) -> ClientKind {
        self.inner.kind()
    }

    fn meta_keys(&self) -> &'static [&'static str] {
        self.inner.meta_keys()
    }

    fn describe(&self, object_type: &str) -> Result<ObjectSchema, ClientError> {
        self.inner.describe(object_type)
    }

    fn list_objects(&self) -> Result<Vec<ObjectSummary>, ClientError> {
        self.inner.list_objects()
    }

    fn run_query(&self, query: &str, scope: QueryScope) -> Result<QueryPage, ClientError> {
        self.inner.run_query(query, scope)
    }

    fn continue_query(&self, cursor: &QueryCursor) -> Result<QueryPage, ClientError> {
        self.inner.continue_query(cursor)
    }

    fn create_record(
        &self,
        object_type: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        self.policy
            .run("create", || self.inner.create_record(object_type, fields))
    }

    fn update_record(
        &self,
        object_type: &str,
        id: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        self.policy
            .run("update", || self.inner.update_record(object_type, id, fields))
    }

    fn delete_record(&self, object_type: &str, id: &str) -> Result<MutationReceipt, ClientError> {
        self.policy
            .run("delete", || self.inner.delete_record(object_type, id))
    }

    fn close(&mut self) -> Result<(), ClientError> {
        self.inner.close()
    }
}
