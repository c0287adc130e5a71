//! Presentation document: slides, their elements and the paragraph style table.

mod paragraph;
mod validate;

pub use paragraph::{
    DEFAULT_PARAGRAPH_STYLE, FontStyle, PARAGRAPH_STYLE_NAMES, ParagraphStyle, ParagraphStyles,
    TextAlign, TextDecoration, default_paragraph_styles,
};
pub use validate::{DocumentError, DocumentResult};

use crate::element::{Element, ElementId};
use crate::id::Id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of empty slides in a new presentation.
pub const DEFAULT_SLIDE_COUNT: usize = 5;

/// Unique identifier for slides.
pub type SlideId = Id;

/// Slide transition effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Slide,
    Zoom,
    Fade,
    Spin,
}

/// Background of a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl SlideStyle {
    /// Overwrite the fields that are set in `update`.
    pub fn merge(&mut self, update: SlideStyle) {
        if update.background_color.is_some() {
            self.background_color = update.background_color;
        }
        if update.opacity.is_some() {
            self.opacity = update.opacity;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideProps {
    #[serde(default)]
    pub style: SlideStyle,
    #[serde(default)]
    pub transition: BTreeSet<Transition>,
}

impl Default for SlideProps {
    fn default() -> Self {
        Self {
            style: SlideStyle::default(),
            transition: BTreeSet::from([Transition::Slide]),
        }
    }
}

/// A slide and its elements in paint order (back to front).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub props: SlideProps,
    pub children: Vec<Element>,
}

impl Default for Slide {
    fn default() -> Self {
        Self::new()
    }
}

impl Slide {
    /// Create an empty slide with the default transition.
    pub fn new() -> Self {
        Self {
            id: SlideId::new(),
            props: SlideProps::default(),
            children: Vec::new(),
        }
    }
}

/// The persisted presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub slides: Vec<Slide>,
    #[serde(default = "default_paragraph_styles")]
    pub paragraph_styles: ParagraphStyles,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk wrapper around the document.
#[derive(Serialize, Deserialize)]
struct SavedFile<T> {
    presentation: T,
}

impl Document {
    /// A new presentation with empty slides and the default paragraph styles.
    pub fn new() -> Self {
        Self {
            slides: (0..DEFAULT_SLIDE_COUNT).map(|_| Slide::new()).collect(),
            paragraph_styles: default_paragraph_styles(),
        }
    }

    /// Find an element anywhere in the document.
    pub fn find_element(&self, id: &ElementId) -> Option<&Element> {
        self.slides
            .iter()
            .flat_map(|slide| slide.children.iter())
            .find(|element| element.id == *id)
    }

    /// Serialize to the saved-file JSON shape.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(&SavedFile { presentation: self })?)
    }

    /// Parse and verify a saved file.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let presentation = validate::verify_file(&value).inspect_err(|e| {
            log::warn!("Rejected presentation file: {}", e);
        })?;
        let document: Document = serde_json::from_value(presentation.clone())?;
        validate::verify_unique_ids(&document)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementContent, ElementKind, ElementStyle};

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert_eq!(doc.slides.len(), DEFAULT_SLIDE_COUNT);
        for slide in &doc.slides {
            assert!(slide.children.is_empty());
            assert!(slide.props.transition.contains(&Transition::Slide));
        }
        assert_eq!(doc.paragraph_styles, default_paragraph_styles());
    }

    #[test]
    fn test_json_roundtrip_preserves_elements() {
        let mut doc = Document::new();
        let element = Element::new(ElementContent::text(["One", "Two"]), ElementStyle::at(10.0, 20.0, 30.0, 40.0));
        let id = element.id.clone();
        doc.slides[1].children.push(element);
        doc.slides[1].props.style.background_color = Some("#ffffff".to_string());

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"presentation\""));

        let loaded = Document::from_json(&json).unwrap();
        assert_eq!(loaded, doc);
        assert!(loaded.find_element(&id).is_some());
    }

    #[test]
    fn test_missing_paragraph_styles_get_defaults() {
        let json = r#"{ "presentation": { "slides": [{ "id": "s1", "props": {}, "children": [] }] } }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.slides.len(), 1);
        assert_eq!(doc.slides[0].id.as_str(), "s1");
        assert_eq!(doc.paragraph_styles, default_paragraph_styles());
    }

    #[test]
    fn test_loads_legacy_file() {
        let json = r##"{
            "presentation": {
                "slides": [{
                    "id": "BkQ0nl1dZ",
                    "props": { "style": { "backgroundColor": "#fafafa" }, "transition": ["fade"] },
                    "children": [
                        {
                            "id": "SyeQ0ne1_W",
                            "type": "Text",
                            "props": {
                                "paragraphStyle": "Heading 1",
                                "style": { "left": 40, "top": 60, "color": "#333333", "fontSize": 48 }
                            },
                            "children": ["Quarterly results", "2017"]
                        },
                        {
                            "id": "rJ-X03e1_b",
                            "type": "Image",
                            "props": {
                                "src": "https://example.com/chart.png",
                                "style": { "left": 300, "top": 200, "width": 320, "height": 180, "opacity": 0.8 }
                            }
                        },
                        {
                            "id": "HkfXA3lyO-",
                            "type": "Plotly",
                            "props": {
                                "src": "https://plot.ly/~user/7.embed",
                                "style": { "left": 0, "top": 400, "width": 600, "height": 300 }
                            }
                        }
                    ]
                }]
            }
        }"##;
        let doc = Document::from_json(json).unwrap();
        let slide = &doc.slides[0];
        assert_eq!(slide.id.as_str(), "BkQ0nl1dZ");
        assert_eq!(slide.props.style.background_color.as_deref(), Some("#fafafa"));
        assert_eq!(slide.props.transition, BTreeSet::from([Transition::Fade]));

        let heading = doc.find_element(&ElementId::from("SyeQ0ne1_W")).unwrap();
        let text = heading.as_text().unwrap();
        assert_eq!(text.paragraph_style, "Heading 1");
        assert_eq!(text.lines, vec!["Quarterly results", "2017"]);
        assert_eq!(text.overrides.color.as_deref(), Some("#333333"));
        assert_eq!(text.overrides.font_size, Some(48.0));
        assert_eq!(heading.style.frame(), None);

        let kinds: Vec<ElementKind> = slide.children.iter().map(Element::kind).collect();
        assert_eq!(kinds, vec![ElementKind::Text, ElementKind::Image, ElementKind::Chart]);
        assert_eq!(slide.children[1].style.opacity, 0.8);

        let reloaded = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_slide_style_merge() {
        let mut style = SlideStyle {
            background_color: Some("#000".to_string()),
            opacity: Some(0.5),
        };
        style.merge(SlideStyle {
            background_color: None,
            opacity: Some(1.0),
        });
        assert_eq!(style.background_color.as_deref(), Some("#000"));
        assert_eq!(style.opacity, Some(1.0));
    }

    #[test]
    fn test_transitions_serialize_as_array() {
        let props = SlideProps::default();
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["transition"], serde_json::json!(["slide"]));
    }
}
