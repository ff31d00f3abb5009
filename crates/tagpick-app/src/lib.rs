use tagpick_core::serialize::dedup_preserving_order;
use tagpick_core::store::{TagStore, fallback_vocabulary};
use tracing::{debug, info, warn};

pub mod controller;
pub mod filter;

pub use controller::{OutputSink, Phase, TagController};

pub struct App<'a> {
    pub store: &'a dyn TagStore,
}

/// What happened to the session-created tags on a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing was pending, so nothing was written.
    NothingPending,
    /// No vocabulary source is configured; pending tags are kept for a
    /// later attempt.
    NoSource,
    /// Each pending tag was submitted once. Failures are reported per tag
    /// and are not retried.
    Saved {
        created: Vec<String>,
        failed: Vec<String>,
    },
}

impl<'a> App<'a> {
    pub fn new(store: &'a dyn TagStore) -> Self {
        Self { store }
    }

    /// Fetches the option universe for `source`. Never fails: a missing
    /// source or a failed fetch degrades to the fallback vocabulary so the
    /// widget always reaches a usable state.
    pub fn load_vocabulary(&self, source: Option<&str>) -> Vec<String> {
        let Some(source) = source else {
            info!("no vocabulary source configured, using fallback vocabulary");
            return fallback_vocabulary();
        };

        match self.store.fetch_vocabulary(source) {
            Ok(records) => {
                let tags = dedup_preserving_order(
                    records.into_iter().map(|record| record.text).collect(),
                );
                info!(source, count = tags.len(), "loaded vocabulary");
                tags
            }
            Err(error) => {
                warn!(source, %error, "vocabulary fetch failed, using fallback vocabulary");
                fallback_vocabulary()
            }
        }
    }

    /// Persists the controller's session-created tags, one create per tag.
    /// Pending tags are consumed up front; a failed create is logged and
    /// skipped, never re-queued or rolled back.
    pub fn save_pending(
        &self,
        source: Option<&str>,
        controller: &mut TagController,
    ) -> SaveOutcome {
        if controller.pending().is_empty() {
            debug!("save requested with no pending tags");
            return SaveOutcome::NothingPending;
        }

        let Some(source) = source else {
            warn!("cannot save new tags without a configured vocabulary source");
            return SaveOutcome::NoSource;
        };

        self.persist_tags(source, controller.consume_pending())
    }

    /// Submits each tag as one create against the store. Used directly by
    /// hosts that drain the pending set themselves before handing it off.
    pub fn persist_tags(&self, source: &str, tags: Vec<String>) -> SaveOutcome {
        let mut created = Vec::new();
        let mut failed = Vec::new();
        for tag in tags {
            match self.store.create_record(source, &tag) {
                Ok(()) => created.push(tag),
                Err(error) => {
                    warn!(source, tag, %error, "failed to persist new tag");
                    failed.push(tag);
                }
            }
        }

        info!(source, created = created.len(), failed = failed.len(), "saved new tags");
        SaveOutcome::Saved { created, failed }
    }
}
