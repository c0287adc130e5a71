//! Slide elements: text boxes, images and embedded charts.
//!
//! In saved files an element is `{"id", "type", "props": {"style", ...}}`,
//! with text lines under `"children"` and text overrides inside the style.

use crate::config::EditorConfig;
use crate::document::{DEFAULT_PARAGRAPH_STYLE, FontStyle, TextAlign};
use crate::geometry::Frame;
use crate::id::Id;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier for elements.
pub type ElementId = Id;

/// Element type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Text,
    Image,
    /// Embedded plot, saved under the `Plotly` tag.
    #[serde(rename = "Plotly", alias = "Chart")]
    Chart,
}

impl ElementKind {
    /// Tag used in saved documents.
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Text => "Text",
            ElementKind::Image => "Image",
            ElementKind::Chart => "Plotly",
        }
    }

    /// Parse a saved-document tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Text" => Some(ElementKind::Text),
            "Image" => Some(ElementKind::Image),
            "Plotly" | "Chart" => Some(ElementKind::Chart),
            _ => None,
        }
    }

    /// Resize floor for this kind of element.
    pub fn min_size(&self, config: &EditorConfig) -> Size {
        match self {
            ElementKind::Text => config.min_text_size,
            ElementKind::Image | ElementKind::Chart => config.min_media_size,
        }
    }
}

/// Position, size and opacity of an element on its slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    /// Explicit width; `None` until the element is first resized (text sizes to content).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: None,
            height: None,
            opacity: 1.0,
        }
    }
}

impl ElementStyle {
    /// Style placed at `(left, top)` with an explicit size.
    pub fn at(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: Some(width),
            height: Some(height),
            opacity: 1.0,
        }
    }

    /// The stored frame, if both dimensions are explicit.
    pub fn frame(&self) -> Option<Frame> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(Frame::new(self.left, self.top, width, height)),
            _ => None,
        }
    }

    /// Persist a manipulated frame. Size is written only when `resized`.
    pub fn apply_frame(&mut self, frame: Frame, resized: bool) {
        self.left = frame.left;
        self.top = frame.top;
        if resized {
            self.width = Some(frame.width);
            self.height = Some(frame.height);
        }
    }
}

/// Per-element typography overriding the paragraph style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl TextOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    /// Name of an entry in the paragraph style table.
    pub paragraph_style: String,
    pub lines: Vec<String>,
    pub overrides: TextOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    /// Resolved image source (URL or data URI).
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_size: Option<Size>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartContent {
    /// Embed URL of the chart.
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Type-specific element payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    Text(TextContent),
    Image(ImageContent),
    Chart(ChartContent),
}

impl ElementContent {
    /// Text in the default paragraph style.
    pub fn text(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ElementContent::Text(TextContent {
            paragraph_style: DEFAULT_PARAGRAPH_STYLE.to_string(),
            lines: lines.into_iter().map(Into::into).collect(),
            overrides: TextOverrides::default(),
        })
    }

    pub fn image(src: impl Into<String>) -> Self {
        ElementContent::Image(ImageContent {
            src: src.into(),
            natural_size: None,
        })
    }

    pub fn chart(src: impl Into<String>) -> Self {
        ElementContent::Chart(ChartContent {
            src: src.into(),
            title: None,
        })
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::Text(_) => ElementKind::Text,
            ElementContent::Image(_) => ElementKind::Image,
            ElementContent::Chart(_) => ElementKind::Chart,
        }
    }
}

/// A single item on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SavedElement<Value>", into = "SavedElement<SavedProps>")]
pub struct Element {
    pub id: ElementId,
    pub style: ElementStyle,
    pub content: ElementContent,
}

impl Element {
    /// Create an element with a fresh id.
    pub fn new(content: ElementContent, style: ElementStyle) -> Self {
        Self {
            id: ElementId::new(),
            style,
            content,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    pub fn min_size(&self, config: &EditorConfig) -> Size {
        self.kind().min_size(config)
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.content {
            ElementContent::Text(text) => Some(text),
            ElementContent::Image(_) | ElementContent::Chart(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.content {
            ElementContent::Text(text) => Some(text),
            ElementContent::Image(_) | ElementContent::Chart(_) => None,
        }
    }
}

// Saved-file representation.

#[derive(Serialize, Deserialize)]
struct SavedElement<P> {
    id: ElementId,
    #[serde(rename = "type")]
    kind: ElementKind,
    props: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<String>>,
}

/// `props` of one element: the style plus the type-specific fields.
#[derive(Serialize, Deserialize)]
struct Props<S, P> {
    #[serde(default)]
    style: S,
    #[serde(flatten)]
    payload: P,
}

/// Text overrides live beside the geometry in the saved style.
#[derive(Default, Serialize, Deserialize)]
struct TextStyle {
    #[serde(flatten)]
    style: ElementStyle,
    #[serde(flatten)]
    overrides: TextOverrides,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextProps {
    #[serde(default = "default_paragraph_style")]
    paragraph_style: String,
}

fn default_paragraph_style() -> String {
    DEFAULT_PARAGRAPH_STYLE.to_string()
}

#[derive(Serialize)]
#[serde(untagged)]
enum SavedProps {
    Text(Props<TextStyle, TextProps>),
    Image(Props<ElementStyle, ImageContent>),
    Chart(Props<ElementStyle, ChartContent>),
}

impl TryFrom<SavedElement<Value>> for Element {
    type Error = serde_json::Error;

    fn try_from(saved: SavedElement<Value>) -> Result<Self, Self::Error> {
        let (style, content) = match saved.kind {
            ElementKind::Text => {
                let props: Props<TextStyle, TextProps> = serde_json::from_value(saved.props)?;
                let text = TextContent {
                    paragraph_style: props.payload.paragraph_style,
                    lines: saved.children.unwrap_or_default(),
                    overrides: props.style.overrides,
                };
                (props.style.style, ElementContent::Text(text))
            }
            ElementKind::Image => {
                let props: Props<ElementStyle, ImageContent> = serde_json::from_value(saved.props)?;
                (props.style, ElementContent::Image(props.payload))
            }
            ElementKind::Chart => {
                let props: Props<ElementStyle, ChartContent> = serde_json::from_value(saved.props)?;
                (props.style, ElementContent::Chart(props.payload))
            }
        };
        Ok(Self {
            id: saved.id,
            style,
            content,
        })
    }
}

impl From<Element> for SavedElement<SavedProps> {
    fn from(element: Element) -> Self {
        let kind = element.kind();
        let style = element.style;
        let (props, children) = match element.content {
            ElementContent::Text(text) => {
                let props = Props {
                    style: TextStyle {
                        style,
                        overrides: text.overrides,
                    },
                    payload: TextProps {
                        paragraph_style: text.paragraph_style,
                    },
                };
                (SavedProps::Text(props), Some(text.lines))
            }
            ElementContent::Image(payload) => (SavedProps::Image(Props { style, payload }), None),
            ElementContent::Chart(payload) => (SavedProps::Chart(Props { style, payload }), None),
        };
        Self {
            id: element.id,
            kind,
            props,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_min_size_differs_for_text() {
        let config = EditorConfig::default();
        let text = Element::new(ElementContent::text(["hi"]), ElementStyle::default());
        let chart = Element::new(ElementContent::chart("https://plot.ly/~a/1.embed"), ElementStyle::default());
        assert_eq!(text.min_size(&config), config.min_text_size);
        assert_eq!(chart.min_size(&config), config.min_media_size);
        assert_ne!(config.min_text_size, config.min_media_size);
    }

    #[test]
    fn test_fresh_ids() {
        let a = Element::new(ElementContent::image("a.png"), ElementStyle::default());
        let b = Element::new(ElementContent::image("a.png"), ElementStyle::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_frame_move_keeps_size() {
        let mut style = ElementStyle::default();
        style.apply_frame(Frame::new(10.0, 20.0, 300.0, 40.0), false);
        assert_eq!(style.left, 10.0);
        assert_eq!(style.top, 20.0);
        assert_eq!(style.frame(), None);

        style.apply_frame(Frame::new(10.0, 20.0, 300.0, 40.0), true);
        assert_eq!(style.frame(), Some(Frame::new(10.0, 20.0, 300.0, 40.0)));
    }

    #[test]
    fn test_serialized_shape() {
        let element = Element::new(ElementContent::text(["Hello"]), ElementStyle::at(1.0, 2.0, 3.0, 4.0));
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "Text");
        assert_eq!(json["id"], element.id.as_str());
        assert_eq!(json["props"]["paragraphStyle"], "Body");
        assert_eq!(json["props"]["style"]["width"], 3.0);
        assert_eq!(json["children"], json!(["Hello"]));
        assert!(json["props"]["style"].get("color").is_none());

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_text_overrides_saved_in_style() {
        let mut element = Element::new(ElementContent::text(["a"]), ElementStyle::at(0.0, 0.0, 10.0, 10.0));
        if let Some(text) = element.as_text_mut() {
            text.overrides.font_size = Some(18.0);
            text.overrides.text_align = Some(TextAlign::Left);
        }
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["props"]["style"]["fontSize"], 18.0);
        assert_eq!(json["props"]["style"]["textAlign"], "left");
        assert_eq!(json["props"]["style"]["left"], 0.0);

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_reads_legacy_element() {
        let json = json!({
            "id": "SkzU3e1ub",
            "type": "Plotly",
            "props": {
                "src": "https://plot.ly/~user/12.embed",
                "style": { "left": 120, "top": 80, "width": 400, "height": 300, "zIndex": 2 }
            }
        });
        let element: Element = serde_json::from_value(json).unwrap();
        assert_eq!(element.id.as_str(), "SkzU3e1ub");
        assert_eq!(element.kind(), ElementKind::Chart);
        assert_eq!(element.style.frame(), Some(Frame::new(120.0, 80.0, 400.0, 300.0)));
        assert_eq!(element.style.opacity, 1.0);

        let saved = serde_json::to_value(&element).unwrap();
        assert_eq!(saved["type"], "Plotly");
        assert_eq!(saved["props"]["src"], "https://plot.ly/~user/12.embed");
    }

    #[test]
    fn test_text_without_children_or_paragraph_style() {
        let json = json!({ "id": "t1", "type": "Text", "props": { "style": { "left": 5 } } });
        let element: Element = serde_json::from_value(json).unwrap();
        let text = element.as_text().unwrap();
        assert!(text.lines.is_empty());
        assert_eq!(text.paragraph_style, DEFAULT_PARAGRAPH_STYLE);
        assert_eq!(element.style.left, 5.0);
    }

    #[test]
    fn test_kind_tags() {
        for kind in [ElementKind::Text, ElementKind::Image, ElementKind::Chart] {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ElementKind::from_tag("Chart"), Some(ElementKind::Chart));
        assert_eq!(ElementKind::from_tag("Table"), None);
    }
}
