use tagpick_core::serialize::{dedup_preserving_order, join_tags, split_tags};

use crate::filter::{VisibleOption, visible_options};

/// Receives the serialized selection whenever it changes. The host record
/// field sits behind this seam in production; tests substitute a recorder.
pub trait OutputSink {
    fn publish(&self, value: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

/// Selection state for one widget instance. Mutations are only honored in
/// `Ready`; the seed is the exception because the host may hand over its
/// stored value before the vocabulary fetch settles.
#[derive(Debug)]
pub struct TagController {
    phase: Phase,
    vocabulary: Vec<String>,
    selected: Vec<String>,
    pending: Vec<String>,
    filter: String,
    last_published: Option<String>,
}

impl Default for TagController {
    fn default() -> Self {
        Self::new()
    }
}

impl TagController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            vocabulary: Vec::new(),
            selected: Vec::new(),
            pending: Vec::new(),
            filter: String::new(),
            last_published: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_selected(&self, text: &str) -> bool {
        self.selected.iter().any(|tag| tag == text)
    }

    pub fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
    }

    pub fn finish_loading(&mut self, vocabulary: Vec<String>) {
        self.vocabulary = dedup_preserving_order(vocabulary);
        self.phase = Phase::Ready;
    }

    /// Ingests the host's stored selection string. Parsing normalizes it,
    /// so reseeding with an equivalent raw value is a no-op.
    pub fn seed_initial(&mut self, raw: &str) {
        self.selected = split_tags(raw);
        self.pending.retain(|tag| self.selected.contains(tag));
    }

    /// Replaces the selection wholesale with the picker's current choice.
    /// Entries are trimmed and deduped like the seed; pending tags dropped
    /// from the selection stop being pending.
    pub fn select(&mut self, texts: Vec<String>) {
        if self.phase != Phase::Ready {
            return;
        }
        let texts = texts
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        self.selected = dedup_preserving_order(texts);
        self.pending.retain(|tag| self.selected.contains(tag));
    }

    /// Adds a user-typed tag to the selection and marks it pending. Blank
    /// input and tags already selected are ignored. A successful add
    /// clears the filter, matching the picker resetting its search box.
    pub fn add_new(&mut self, text: &str) {
        if self.phase != Phase::Ready {
            return;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() || self.is_selected(trimmed) {
            return;
        }

        self.selected.push(trimmed.to_string());
        if !self.vocabulary.iter().any(|tag| tag == trimmed) {
            self.pending.push(trimmed.to_string());
        }
        self.filter.clear();
    }

    pub fn deselect(&mut self, text: &str) {
        if self.phase != Phase::Ready {
            return;
        }
        self.selected.retain(|tag| tag != text);
        self.pending.retain(|tag| tag != text);
    }

    pub fn toggle(&mut self, text: &str) {
        if self.is_selected(text) {
            self.deselect(text);
        } else if self.phase == Phase::Ready {
            self.selected.push(text.to_string());
        }
    }

    /// Hands the session-created tags to the caller for persistence. They
    /// stay selected but are no longer pending, so a second call returns
    /// nothing.
    pub fn consume_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    pub fn set_filter(&mut self, filter: &str) {
        if self.phase != Phase::Ready {
            return;
        }
        self.filter = filter.to_string();
    }

    /// Leaving the picker discards the in-progress search.
    pub fn on_blur(&mut self) {
        self.filter.clear();
    }

    pub fn visible_options(&self) -> Vec<VisibleOption> {
        visible_options(&self.vocabulary, &self.pending, &self.filter)
    }

    /// Publishes the serialized selection if it differs from the last
    /// published value. The first call always publishes, even when the
    /// selection is empty, so the host sees the seeded state. Suppressed
    /// while the vocabulary is loading.
    pub fn sync_output(&mut self, sink: &dyn OutputSink) {
        if self.phase == Phase::Loading {
            return;
        }
        let value = join_tags(&self.selected);
        if self.last_published.as_deref() == Some(value.as_str()) {
            return;
        }
        sink.publish(&value);
        self.last_published = Some(value);
    }
}
