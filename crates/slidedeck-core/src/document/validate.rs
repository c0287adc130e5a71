//! Structural checks applied to presentation files before they are loaded.

use super::Document;
use crate::element::{ElementId, ElementKind};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Document load errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Empty file")]
    Empty,
    #[error("presentation.slides must be an array")]
    SlidesNotArray,
    #[error("Presentation has no slides")]
    NoSlides,
    #[error("Invalid slide at index {0}")]
    InvalidSlide(usize),
    #[error("Children of slide {0} must be an array")]
    ChildrenNotArray(usize),
    #[error("Child {element} of slide {slide} must have a valid type (found {found:?})")]
    InvalidElementType {
        slide: usize,
        element: usize,
        found: Option<String>,
    },
    #[error("Invalid child {element} of slide {slide}")]
    InvalidElement { slide: usize, element: usize },
    #[error("Duplicate element id {0}")]
    DuplicateId(ElementId),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for document loading.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Check the raw file and return the `presentation` value.
pub(super) fn verify_file(file: &Value) -> DocumentResult<&Value> {
    let presentation = file
        .get("presentation")
        .filter(|p| p.get("slides").is_some_and(|s| !s.is_null()))
        .ok_or(DocumentError::Empty)?;

    let slides = presentation["slides"]
        .as_array()
        .ok_or(DocumentError::SlidesNotArray)?;
    if slides.is_empty() {
        return Err(DocumentError::NoSlides);
    }

    for (slide_index, slide) in slides.iter().enumerate() {
        if !has_id(slide)
            || ["props", "children"]
                .iter()
                .any(|key| slide.get(key).is_none_or(Value::is_null))
        {
            return Err(DocumentError::InvalidSlide(slide_index));
        }

        let children = slide["children"]
            .as_array()
            .ok_or(DocumentError::ChildrenNotArray(slide_index))?;

        for (element_index, child) in children.iter().enumerate() {
            let tag = child.get("type").and_then(Value::as_str);
            if tag.and_then(ElementKind::from_tag).is_none() {
                return Err(DocumentError::InvalidElementType {
                    slide: slide_index,
                    element: element_index,
                    found: tag.map(str::to_string),
                });
            }

            if !has_id(child) || !child.get("props").is_some_and(Value::is_object) {
                return Err(DocumentError::InvalidElement {
                    slide: slide_index,
                    element: element_index,
                });
            }
        }
    }

    Ok(presentation)
}

fn has_id(value: &Value) -> bool {
    value
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty())
}

/// Element ids must be unique across the whole document.
pub(super) fn verify_unique_ids(document: &Document) -> DocumentResult<()> {
    let mut seen = HashSet::new();
    for element in document.slides.iter().flat_map(|slide| &slide.children) {
        if !seen.insert(&element.id) {
            return Err(DocumentError::DuplicateId(element.id.clone()));
        }
    }
    Ok(())
}
