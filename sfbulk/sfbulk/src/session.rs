//! Session facade over one [`CrmClient`].

use std::{collections::BTreeMap, path::PathBuf};

use sfbulk_core::{
    ClientKind, CrmClient, FieldDescriptor, ObjectSchema, QueryScope, format_field_lines,
    format_object_lines,
};

use crate::{
    error::SfBulkError,
    mutate::{Action, BatchEvent, BatchResult, check_id_column, run_batch},
    query::{QueryFormat, QueryNormalizer, QueryOutput, validate_query},
    retry::{RetryPolicy, Retrying},
    schema_cache::SchemaCache,
    table::Table,
};

/// Owns a client, its schema cache and the cursor of the last query.
///
/// Nothing is shared between sessions; run one batch per session.
pub struct Session {
    client: Box<dyn CrmClient>,
    schemas: SchemaCache,
    normalizer: QueryNormalizer,
    output_dir: PathBuf,
}

/// Builder for configuring [`Session`].
pub struct SessionBuilder {
    client: Box<dyn CrmClient>,
    retry: Option<RetryPolicy>,
    output_dir: PathBuf,
}

impl SessionBuilder {
    /// Retry create, update and delete calls on transient errors.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Directory the success and failure artifacts are written to.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn build(self) -> Session {
        let client: Box<dyn CrmClient> = match self.retry {
            Some(policy) if policy.max_retries > 0 => Box::new(Retrying::new(self.client, policy)),
            _ => self.client,
        };
        Session {
            normalizer: QueryNormalizer::new(client.meta_keys()),
            client,
            schemas: SchemaCache::new(),
            output_dir: self.output_dir,
        }
    }
}

impl Session {
    pub fn builder(client: impl CrmClient + 'static) -> SessionBuilder {
        Self::builder_boxed(Box::new(client))
    }

    pub fn builder_boxed(client: Box<dyn CrmClient>) -> SessionBuilder {
        SessionBuilder {
            client,
            retry: None,
            output_dir: PathBuf::from("."),
        }
    }

    /// Session with no retries writing artifacts to the working directory.
    pub fn new(client: impl CrmClient + 'static) -> Self {
        Self::builder(client).build()
    }

    pub fn client_kind(&self) -> ClientKind {
        self.client.kind()
    }

    pub fn fields_for(&mut self, object_type: &str) -> Result<&ObjectSchema, SfBulkError> {
        Ok(self.schemas.fields_for(&*self.client, object_type)?)
    }

    /// `N. name, type, length` per field.
    pub fn desc(&mut self, object_type: &str) -> Result<Vec<String>, SfBulkError> {
        Ok(format_field_lines(self.fields_for(object_type)?))
    }

    /// Lower-cased field name to descriptor.
    pub fn fields(
        &mut self,
        object_type: &str,
    ) -> Result<BTreeMap<String, FieldDescriptor>, SfBulkError> {
        Ok(self
            .fields_for(object_type)?
            .field_map()
            .into_iter()
            .map(|(name, field)| (name, field.clone()))
            .collect())
    }

    /// `N. Label` per object type, N starting at 0.
    pub fn show_objects(&self) -> Result<Vec<String>, SfBulkError> {
        Ok(format_object_lines(&self.client.list_objects()?))
    }

    /// Run a query and normalize its first page. The continuation cursor is
    /// kept for [`query_more`](Self::query_more).
    pub fn query(
        &mut self,
        query: &str,
        format: QueryFormat,
        scope: QueryScope,
    ) -> Result<QueryOutput, SfBulkError> {
        validate_query(query)?;
        self.normalizer.reset();
        let page = self.client.run_query(query, scope)?;
        tracing::debug!(
            total = page.total_size,
            done = page.done,
            records = page.records.len(),
            "query page"
        );
        Ok(self.normalizer.normalize(page, format))
    }

    /// Fetch and normalize the page after the last one.
    pub fn query_more(&mut self, format: QueryFormat) -> Result<QueryOutput, SfBulkError> {
        let cursor = self
            .normalizer
            .cursor()
            .cloned()
            .ok_or_else(|| SfBulkError::State("no query results left to fetch".to_string()))?;
        let page = self.client.continue_query(&cursor)?;
        Ok(self.normalizer.normalize(page, format))
    }

    /// Whether the last query left a cursor to continue from.
    pub fn has_more(&self) -> bool {
        self.normalizer.cursor().is_some()
    }

    /// Apply `action` to every row of `table`.
    ///
    /// The action and the `Id` column rule are checked before any remote call.
    pub fn mutate(
        &mut self,
        object_type: &str,
        table: &Table,
        action: &str,
        mut observer: impl FnMut(BatchEvent<'_>),
    ) -> Result<BatchResult, SfBulkError> {
        let action: Action = action.parse()?;
        check_id_column(table.header(), action)?;
        let schema = self.schemas.fields_for(&*self.client, object_type)?;
        let result = run_batch(
            &*self.client,
            schema,
            table,
            action,
            &self.output_dir,
            &mut observer,
        )?;
        tracing::info!(
            %action,
            successes = result.success_count,
            failures = result.failure_count,
            "batch finished"
        );
        Ok(result)
    }

    /// Tear down the remote session.
    pub fn close(mut self) -> Result<(), SfBulkError> {
        Ok(self.client.close()?)
    }

    /// Run `work`, then close the session whether or not it failed.
    ///
    /// An error from `work` wins over one from closing; the latter is only
    /// logged in that case.
    pub fn close_after<T, E>(
        mut self,
        work: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<SfBulkError>,
    {
        let result = work(&mut self);
        match (result, self.close()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(%close_err, "failed to close session after error");
                Err(err)
            }
        }
    }
}
