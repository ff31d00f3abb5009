use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use tagpick_app::OutputSink;
use tagpick_core::store::{StoreError, TagRecord, TagStore};

pub fn record(text: &str) -> TagRecord {
    TagRecord {
        text: text.to_string(),
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

pub fn missing_table(source: &str) -> StoreError {
    StoreError::MissingTable {
        table: source.to_string(),
        path: PathBuf::from("scripted"),
    }
}

#[derive(Debug, Clone)]
pub struct CreateCall {
    pub source: String,
    pub text: String,
}

#[derive(Default)]
pub struct ScriptedStore {
    fetch_results: Mutex<VecDeque<Result<Vec<TagRecord>, StoreError>>>,
    create_results: Mutex<VecDeque<Result<(), StoreError>>>,
    creates: Mutex<Vec<CreateCall>>,
}

impl ScriptedStore {
    pub fn new(
        fetch_results: Vec<Result<Vec<TagRecord>, StoreError>>,
        create_results: Vec<Result<(), StoreError>>,
    ) -> Self {
        Self {
            fetch_results: Mutex::new(fetch_results.into()),
            create_results: Mutex::new(create_results.into()),
            creates: Mutex::new(Vec::new()),
        }
    }

    pub fn creates(&self) -> Vec<CreateCall> {
        self.creates.lock().expect("creates lock").clone()
    }
}

impl TagStore for ScriptedStore {
    fn fetch_vocabulary(&self, source: &str) -> Result<Vec<TagRecord>, StoreError> {
        self.fetch_results
            .lock()
            .expect("fetch lock")
            .pop_front()
            .unwrap_or_else(|| Err(missing_table(source)))
    }

    fn create_record(&self, source: &str, text: &str) -> Result<(), StoreError> {
        self.creates.lock().expect("creates lock").push(CreateCall {
            source: source.to_string(),
            text: text.to_string(),
        });

        self.create_results
            .lock()
            .expect("create lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    published: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn published(&self) -> Vec<String> {
        self.published.lock().expect("published lock").clone()
    }
}

impl OutputSink for RecordingSink {
    fn publish(&self, value: &str) {
        self.published
            .lock()
            .expect("published lock")
            .push(value.to_string());
    }
}
