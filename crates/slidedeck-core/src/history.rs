//! Undo/redo history of immutable document snapshots.

use crate::config::MAX_HISTORY;
use crate::document::{Document, ParagraphStyles, Slide};
use crate::element::Element;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A fully realized document state plus the selection at that moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub slides: Vec<Slide>,
    pub paragraph_styles: ParagraphStyles,
    pub current_slide_index: usize,
    pub current_element_index: Option<usize>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::from_document(Document::new())
    }
}

impl Snapshot {
    /// Initial snapshot for a loaded document: first slide selected, no element.
    pub fn from_document(document: Document) -> Self {
        Self {
            slides: document.slides,
            paragraph_styles: document.paragraph_styles,
            current_slide_index: 0,
            current_element_index: None,
        }
    }

    /// The persisted part of the snapshot.
    pub fn to_document(&self) -> Document {
        Document {
            slides: self.slides.clone(),
            paragraph_styles: self.paragraph_styles.clone(),
        }
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current_slide_index)
    }

    pub fn current_slide_mut(&mut self) -> Option<&mut Slide> {
        self.slides.get_mut(self.current_slide_index)
    }

    pub fn current_element(&self) -> Option<&Element> {
        let index = self.current_element_index?;
        self.current_slide()?.children.get(index)
    }

    pub fn current_element_mut(&mut self) -> Option<&mut Element> {
        let index = self.current_element_index?;
        self.current_slide_mut()?.children.get_mut(index)
    }
}

/// Bounded, linear history of snapshots with a cursor.
///
/// Entries after the cursor are the redo branch; committing discards them.
/// Stored entries are never mutated: changes are made on a [`draft`](Self::draft)
/// and handed back through [`commit`](Self::commit).
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: Vec<Arc<Snapshot>>,
    index: usize,
    capacity: usize,
    dirty: bool,
    /// Bumped on every change of the current entry.
    revision: u64,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl HistoryStore {
    /// Create a history holding only `initial`.
    pub fn new(initial: Snapshot) -> Self {
        Self::with_capacity(initial, MAX_HISTORY)
    }

    /// Create a history with a custom cap (at least one entry).
    pub fn with_capacity(initial: Snapshot, capacity: usize) -> Self {
        Self {
            entries: vec![Arc::new(initial)],
            index: 0,
            capacity: capacity.max(1),
            dirty: false,
            revision: 0,
        }
    }

    /// Append a new snapshot after the cursor, discarding any redo branch.
    pub fn commit(&mut self, draft: Snapshot) {
        if self.index + 1 < self.entries.len() {
            let discarded = self.entries.len() - self.index - 1;
            self.entries.truncate(self.index + 1);
            log::debug!("Discarded {} redo entries", discarded);
        }

        self.entries.push(Arc::new(draft));
        self.index += 1;

        if self.entries.len() > self.capacity {
            self.entries.remove(0);
            self.index -= 1;
            log::debug!("History cap {} reached, dropped oldest entry", self.capacity);
        }

        self.dirty = true;
        self.revision += 1;
        log::debug!("Committed history entry {}/{}", self.index + 1, self.entries.len());
    }

    /// Step back one entry.
    /// Returns true if undo was performed, false if already at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }

        self.index -= 1;
        // Back at the first entry: assume it matches what was loaded or saved.
        if self.index == 0 {
            self.dirty = false;
        }
        self.revision += 1;
        log::debug!("Undo to history entry {}", self.index);
        true
    }

    /// Step forward one entry.
    /// Returns true if redo was performed, false if already at the newest entry.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }

        self.index += 1;
        self.dirty = true;
        self.revision += 1;
        log::debug!("Redo to history entry {}", self.index);
        true
    }

    /// Replace the current entry without creating an undo step.
    ///
    /// Used for selection changes; the redo branch and dirty flag are kept.
    pub fn replace_current(&mut self, snapshot: Snapshot) {
        self.entries[self.index] = Arc::new(snapshot);
        self.revision += 1;
    }

    /// Drop all history and start over from `initial` (e.g. after loading a file).
    pub fn reset(&mut self, initial: Snapshot) {
        self.entries = vec![Arc::new(initial)];
        self.index = 0;
        self.dirty = false;
        self.revision += 1;
        log::debug!("History reset");
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.index]
    }

    /// A shared handle to the current snapshot.
    pub fn current_shared(&self) -> Arc<Snapshot> {
        Arc::clone(&self.entries[self.index])
    }

    /// A private copy of the current snapshot to build the next commit from.
    pub fn draft(&self) -> Snapshot {
        Snapshot::clone(&self.entries[self.index])
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.current().current_slide()
    }

    pub fn current_element(&self) -> Option<&Element> {
        self.current().current_element()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether there are changes the persistence layer has not saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current state has been saved.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Monotonic counter identifying the current state.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
