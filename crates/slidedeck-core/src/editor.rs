//! The editing surface: a presentation document behind its undo history.

use crate::config::EditorConfig;
use crate::constraints::ResizeMode;
use crate::document::{Document, DocumentResult, ParagraphStyle, Slide, SlideId, SlideStyle, Transition};
use crate::element::{Element, ElementContent, ElementId, ElementStyle};
use crate::geometry::Frame;
use crate::history::{HistoryStore, Snapshot};
use std::collections::BTreeSet;

/// A presentation being edited.
///
/// Every editing operation turns into exactly one history commit; selection
/// changes rewrite the current entry instead. Operations that do not apply
/// (no current element, index out of range) return `false` and leave the
/// history untouched.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    history: HistoryStore,
    config: EditorConfig,
}

impl Presentation {
    /// A new presentation with the default slides and paragraph styles.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::from_document(Document::new(), config)
    }

    /// Start editing an existing document.
    pub fn from_document(document: Document, config: EditorConfig) -> Self {
        let history = HistoryStore::with_capacity(initial_snapshot(document), config.max_history);
        Self { history, config }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The snapshot under the history cursor.
    pub fn snapshot(&self) -> &Snapshot {
        self.history.current()
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.history.current_slide()
    }

    pub fn current_element(&self) -> Option<&Element> {
        self.history.current_element()
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// Replace the whole document, dropping all history.
    pub fn load(&mut self, document: Document) {
        log::info!("Loaded presentation with {} slides", document.slides.len());
        self.history.reset(initial_snapshot(document));
    }

    /// Parse, verify and load a saved file. On error nothing changes.
    pub fn load_json(&mut self, json: &str) -> DocumentResult<()> {
        let document = Document::from_json(json)?;
        self.load(document);
        Ok(())
    }

    /// The persisted part of the current state.
    pub fn document(&self) -> Document {
        self.history.current().to_document()
    }

    /// Serialize the current state to the saved-file format.
    pub fn save_json(&self) -> DocumentResult<String> {
        self.document().to_json()
    }

    /// Draft the current snapshot, let `edit` change it and commit the
    /// result if `edit` reports a change.
    fn edit(&mut self, edit: impl FnOnce(&mut Snapshot) -> bool) -> bool {
        let mut draft = self.history.draft();
        if !edit(&mut draft) {
            return false;
        }
        self.history.commit(draft);
        true
    }

    /// Like [`edit`](Self::edit) for the current element.
    fn edit_current_element(&mut self, edit: impl FnOnce(&mut Element)) -> bool {
        self.edit(|draft| match draft.current_element_mut() {
            Some(element) => {
                edit(element);
                true
            }
            None => false,
        })
    }

    // --- Selection ---

    /// Select a slide and clear the element selection. Not an undo step.
    pub fn select_slide(&mut self, index: usize) -> bool {
        if index >= self.snapshot().slides.len() {
            return false;
        }
        let mut snapshot = self.history.draft();
        snapshot.current_slide_index = index;
        snapshot.current_element_index = None;
        self.history.replace_current(snapshot);
        true
    }

    /// Select an element of the current slide, or clear the selection with
    /// `None`. Not an undo step.
    pub fn select_element(&mut self, index: Option<usize>) -> bool {
        if let Some(index) = index {
            let in_range = self
                .current_slide()
                .is_some_and(|slide| index < slide.children.len());
            if !in_range {
                return false;
            }
        }
        let mut snapshot = self.history.draft();
        snapshot.current_element_index = index;
        self.history.replace_current(snapshot);
        true
    }

    // --- Elements ---

    /// Add an element to the current slide and select it.
    pub fn drop_element(&mut self, content: ElementContent, style: ElementStyle) -> Option<ElementId> {
        let element = Element::new(content, style);
        let id = element.id.clone();
        let added = self.edit(|draft| {
            let Some(slide) = draft.current_slide_mut() else {
                return false;
            };
            slide.children.push(element);
            let index = slide.children.len() - 1;
            draft.current_element_index = Some(index);
            true
        });
        if added {
            log::debug!("Dropped element {}", id);
        }
        added.then_some(id)
    }

    pub fn delete_current_element(&mut self) -> bool {
        self.edit(|draft| {
            let Some(index) = draft.current_element_index else {
                return false;
            };
            let Some(slide) = draft.current_slide_mut() else {
                return false;
            };
            if index >= slide.children.len() {
                return false;
            }
            slide.children.remove(index);
            draft.current_element_index = None;
            true
        })
    }

    /// Move the current element to the top of the paint order.
    pub fn bring_to_front(&mut self) -> bool {
        self.reorder_current(|children, index| {
            let element = children.remove(index);
            children.push(element);
            children.len() - 1
        })
    }

    /// Move the current element to the bottom of the paint order.
    pub fn send_to_back(&mut self) -> bool {
        self.reorder_current(|children, index| {
            let element = children.remove(index);
            children.insert(0, element);
            0
        })
    }

    /// Swap the current element with the sibling `by` positions away.
    pub fn shift_current_element(&mut self, by: isize) -> bool {
        let Some(len) = self.current_slide().map(|slide| slide.children.len()) else {
            return false;
        };
        if by == 0 {
            return false;
        }
        let target = self
            .snapshot()
            .current_element_index
            .and_then(|index| index.checked_add_signed(by))
            .filter(|target| *target < len);
        let Some(target) = target else {
            return false;
        };
        self.reorder_current(|children, index| {
            children.swap(index, target);
            target
        })
    }

    fn reorder_current(&mut self, reorder: impl FnOnce(&mut Vec<Element>, usize) -> usize) -> bool {
        self.edit(|draft| {
            let Some(index) = draft.current_element_index else {
                return false;
            };
            let Some(slide) = draft.current_slide_mut() else {
                return false;
            };
            if index >= slide.children.len() {
                return false;
            }
            let new_index = reorder(&mut slide.children, index);
            draft.current_element_index = Some(new_index);
            true
        })
    }

    /// Persist the settled rectangle of a move or resize on the current element.
    pub fn set_element_frame(&mut self, frame: Frame, mode: ResizeMode) -> bool {
        self.edit_current_element(|element| element.style.apply_frame(frame, !mode.is_move()))
    }

    pub fn update_element_opacity(&mut self, opacity: f64) -> bool {
        self.edit_current_element(|element| element.style.opacity = opacity.clamp(0.0, 1.0))
    }

    /// Replace the payload of the current element.
    pub fn update_element_content(&mut self, content: ElementContent) -> bool {
        self.edit_current_element(|element| element.content = content)
    }

    // --- Slides ---

    /// Insert an empty slide after the current one and select it.
    pub fn add_slide(&mut self) -> SlideId {
        let slide = Slide::new();
        let id = slide.id.clone();
        self.edit(|draft| {
            let index = (draft.current_slide_index + 1).min(draft.slides.len());
            draft.slides.insert(index, slide);
            draft.current_slide_index = index;
            draft.current_element_index = None;
            true
        });
        id
    }

    /// Remove the current slide and select the one before it.
    ///
    /// The last remaining slide cannot be deleted.
    pub fn delete_slide(&mut self) -> bool {
        self.edit(|draft| {
            let index = draft.current_slide_index;
            if draft.slides.len() <= 1 || index >= draft.slides.len() {
                return false;
            }
            draft.slides.remove(index);
            draft.current_slide_index = index.saturating_sub(1);
            draft.current_element_index = None;
            true
        })
    }

    /// Move the slide at `from` to position `to` and select it.
    pub fn move_slide(&mut self, from: usize, to: usize) -> bool {
        self.edit(|draft| {
            let len = draft.slides.len();
            if from >= len || to >= len || from == to {
                return false;
            }
            let slide = draft.slides.remove(from);
            draft.slides.insert(to, slide);
            draft.current_slide_index = to;
            draft.current_element_index = None;
            true
        })
    }

    /// Merge a style update into the current slide.
    pub fn update_slide_style(&mut self, style: SlideStyle) -> bool {
        self.edit(|draft| match draft.current_slide_mut() {
            Some(slide) => {
                slide.props.style.merge(style);
                true
            }
            None => false,
        })
    }

    pub fn set_slide_transitions(&mut self, transitions: BTreeSet<Transition>) -> bool {
        self.edit(|draft| match draft.current_slide_mut() {
            Some(slide) => {
                slide.props.transition = transitions;
                true
            }
            None => false,
        })
    }

    /// Replace a named paragraph style.
    ///
    /// The current text element's overrides are cleared so it shows the
    /// updated style.
    pub fn update_paragraph_style(&mut self, name: &str, style: ParagraphStyle) -> bool {
        self.edit(|draft| {
            let Some(entry) = draft.paragraph_styles.get_mut(name) else {
                return false;
            };
            *entry = style;
            if let Some(text) = draft.current_element_mut().and_then(Element::as_text_mut) {
                text.overrides = Default::default();
            }
            true
        })
    }
}

/// First history entry for `document`. An editor always has a slide to select.
fn initial_snapshot(mut document: Document) -> Snapshot {
    if document.slides.is_empty() {
        log::warn!("Document has no slides, adding an empty one");
        document.slides.push(Slide::new());
    }
    Snapshot::from_document(document)
}
