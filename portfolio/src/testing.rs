//! In-memory store and relay doubles shared by the unit tests.

use crate::contact::{ContactError, ContactMessage, ContactRelay};
use crate::models::{Collection, Document, Project, Record};
use crate::store::{DocumentStore, StoreError};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeStore {
    projects: Vec<Document>,
    certificates: Vec<Document>,
    failing: HashSet<Collection>,
    calls: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn with_projects(count: usize) -> Self {
        FakeStore {
            projects: project_documents(count),
            ..Default::default()
        }
    }

    pub(crate) fn and_certificates(mut self, count: usize) -> Self {
        self.certificates = (0..count)
            .map(|i| Document::new(format!("c{i}"), json!({ "Img": format!("/certs/{i}.png") })))
            .collect();
        self
    }

    pub(crate) fn failing(mut self, collection: Collection) -> Self {
        self.failing.insert(collection);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The typed projects `with_projects(count)` serves.
    pub(crate) fn projects(count: usize) -> Vec<Project> {
        project_documents(count)
            .into_iter()
            .map(Project::from_document)
            .collect()
    }
}

fn project_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            Document::new(
                format!("p{i}"),
                json!({
                    "Title": format!("Project {i}"),
                    "TechStack": ["Rust"],
                }),
            )
        })
        .collect()
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&collection) {
            return Err(StoreError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(match collection {
            Collection::Projects => self.projects.clone(),
            Collection::Certificates => self.certificates.clone(),
        })
    }
}

pub(crate) struct FakeRelay {
    fail: bool,
    delivered: Mutex<Vec<ContactMessage>>,
}

impl FakeRelay {
    pub(crate) fn succeeding() -> Self {
        FakeRelay {
            fail: false,
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        FakeRelay {
            fail: true,
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn delivered(&self) -> Vec<ContactMessage> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactRelay for FakeRelay {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), ContactError> {
        if self.fail {
            return Err(ContactError::Status(500));
        }
        self.delivered.lock().unwrap().push(message.clone());
        Ok(())
    }
}
