//! In-memory page source and outbox for bridge tests

use composable_bridge::{OutboundMessage, Outbox};
use composable_html::{ConvertError, MapLoader, Page, PageSource};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use url::Url;

/// Page source replaying a sequence of markup frames
///
/// Each snapshot returns the current frame and advances to the next one;
/// the last frame repeats. This mimics a host page that finishes rendering
/// after a few polls.
pub struct MemoryPageSource {
    frames: Vec<String>,
    location: Url,
    loader: MapLoader,
    snapshots: Cell<usize>,
    failing: Cell<bool>,
}

impl MemoryPageSource {
    pub fn new(html: impl Into<String>, location: Url) -> Self {
        Self::with_frames(vec![html.into()], location)
    }

    pub fn with_frames(frames: Vec<String>, location: Url) -> Self {
        Self {
            frames,
            location,
            loader: MapLoader::new(),
            snapshots: Cell::new(0),
            failing: Cell::new(false),
        }
    }

    pub fn with_loader(mut self, loader: MapLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Number of snapshots taken so far
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.get()
    }

    /// Makes every following snapshot fail with `PAGE_UNAVAILABLE`
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl PageSource for MemoryPageSource {
    fn snapshot(&self) -> Result<Page, ConvertError> {
        let taken = self.snapshots.get();
        self.snapshots.set(taken + 1);
        if self.failing.get() {
            return Err(ConvertError::PageUnavailable("page detached".to_string()));
        }
        let index = taken.min(self.frames.len().saturating_sub(1));
        let html = self.frames.get(index).map(String::as_str).unwrap_or("");
        Page::parse(html, self.location.clone(), &self.loader)
    }
}

/// Outbox recording every posted message as JSON
#[derive(Default)]
pub struct RecordingOutbox {
    sent: RefCell<Vec<(String, Value)>>,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posted messages as `(target_origin, message)` pairs
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.borrow().clone()
    }

    pub fn last(&self) -> Option<(String, Value)> {
        self.sent.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.borrow().is_empty()
    }
}

impl Outbox for RecordingOutbox {
    fn post(&self, message: &OutboundMessage<'_>, target_origin: &str) {
        let value = serde_json::to_value(message).expect("outbound message serializes");
        self.sent
            .borrow_mut()
            .push((target_origin.to_string(), value));
    }
}
