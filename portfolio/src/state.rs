use crate::config::Config;
use crate::contact::{ContactRelay, FormSubmitRelay, SubmissionGate};
use crate::database::{CacheError, CacheMirror};
use crate::store::{DocumentStore, FirestoreStore};
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub mirror: Arc<CacheMirror>,
    pub relay: Arc<dyn ContactRelay>,
    pub contact_gate: Arc<SubmissionGate>,
    pub start_year: i32,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mirror: Arc<CacheMirror>,
        relay: Arc<dyn ContactRelay>,
        start_year: i32,
    ) -> Self {
        AppState {
            store,
            mirror,
            relay,
            contact_gate: Arc::default(),
            start_year,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;

        let store = FirestoreStore::new(
            client.clone(),
            config.firestore_base_url.clone(),
            config.firestore_project.clone(),
            config.firestore_api_key.clone(),
        );
        let relay = FormSubmitRelay::new(client, config.contact_endpoint.clone());
        let mirror = CacheMirror::open(&config.cache_path)?;

        Ok(Self::new(
            Arc::new(store),
            Arc::new(mirror),
            Arc::new(relay),
            config.start_year,
        ))
    }
}
