//! In-memory `CrmClient` used by the session tests.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use sfbulk_core::{
    ClientError, ClientKind, CrmClient, FieldKind, FieldValues, MutationReceipt, ObjectSchema,
    ObjectSummary, QueryCursor, QueryPage, QueryScope,
};

/// One remote call observed by [`StubClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Describe(String),
    ListObjects,
    Query(String, QueryScope),
    Continue(String),
    Create(String, FieldValues),
    Update(String, String, FieldValues),
    Delete(String, String),
    Close,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Answers describe with a fixed Contact schema, mutations with queued
/// responses (success once the queue is empty) and queries with queued pages.
pub struct StubClient {
    pub log: CallLog,
    pub meta_keys: &'static [&'static str],
    pub mutations: RefCell<VecDeque<Result<MutationReceipt, ClientError>>>,
    pub pages: RefCell<VecDeque<QueryPage>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            meta_keys: &["attributes"],
            mutations: RefCell::new(VecDeque::new()),
            pages: RefCell::new(VecDeque::new()),
        }
    }

    pub fn log(&self) -> CallLog {
        Rc::clone(&self.log)
    }

    /// Queue the response of the next mutation call.
    pub fn then_mutation(self, response: Result<MutationReceipt, ClientError>) -> Self {
        self.mutations.borrow_mut().push_back(response);
        self
    }

    pub fn then_page(self, page: QueryPage) -> Self {
        self.pages.borrow_mut().push_back(page);
        self
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn next_mutation(&self) -> Result<MutationReceipt, ClientError> {
        self.mutations
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(MutationReceipt::succeeded("001000000000001")))
    }
}

pub fn contact_schema() -> ObjectSchema {
    ObjectSchema::from_describe(
        "Contact",
        [
            ("Id", FieldKind::Id, 18),
            ("LastName", FieldKind::String, 80),
            ("Email", FieldKind::String, 80),
            ("Birthdate", FieldKind::Date, 0),
            ("Score__c", FieldKind::Double, 0),
            ("AccountId", FieldKind::Reference, 18),
        ],
    )
}

impl CrmClient for StubClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Rest
    }

    fn meta_keys(&self) -> &'static [&'static str] {
        self.meta_keys
    }

    fn describe(&self, object_type: &str) -> Result<ObjectSchema, ClientError> {
        self.record(Call::Describe(object_type.to_string()));
        if object_type.eq_ignore_ascii_case("contact") {
            Ok(contact_schema())
        } else {
            Err(ClientError::Fault {
                code: "NOT_FOUND".to_string(),
                message: format!("The requested resource does not exist: {object_type}"),
            })
        }
    }

    fn list_objects(&self) -> Result<Vec<ObjectSummary>, ClientError> {
        self.record(Call::ListObjects);
        Ok(vec![
            ObjectSummary {
                name: "Account".to_string(),
                label: "Account".to_string(),
            },
            ObjectSummary {
                name: "Contact".to_string(),
                label: "Contact".to_string(),
            },
        ])
    }

    fn run_query(&self, query: &str, scope: QueryScope) -> Result<QueryPage, ClientError> {
        self.record(Call::Query(query.to_string(), scope));
        Ok(self.pages.borrow_mut().pop_front().unwrap_or_default())
    }

    fn continue_query(&self, cursor: &QueryCursor) -> Result<QueryPage, ClientError> {
        self.record(Call::Continue(cursor.as_str().to_string()));
        self.pages.borrow_mut().pop_front().ok_or_else(|| ClientError::Fault {
            code: "INVALID_QUERY_LOCATOR".to_string(),
            message: "invalid query locator".to_string(),
        })
    }

    fn create_record(
        &self,
        object_type: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        self.record(Call::Create(object_type.to_string(), fields.clone()));
        self.next_mutation()
    }

    fn update_record(
        &self,
        object_type: &str,
        id: &str,
        fields: &FieldValues,
    ) -> Result<MutationReceipt, ClientError> {
        self.record(Call::Update(
            object_type.to_string(),
            id.to_string(),
            fields.clone(),
        ));
        self.next_mutation()
    }

    fn delete_record(&self, object_type: &str, id: &str) -> Result<MutationReceipt, ClientError> {
        self.record(Call::Delete(object_type.to_string(), id.to_string()));
        self.next_mutation()
    }

    fn close(&mut self) -> Result<(), ClientError> {
        self.record(Call::Close);
        Ok(())
    }
}

pub fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Read an artifact back as rows of cells, header included.
pub fn read_artifact(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
