//! Named paragraph styles shared by text elements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paragraph style table, keyed by style name.
pub type ParagraphStyles = BTreeMap<String, ParagraphStyle>;

/// Built-in style names in menu order.
pub const PARAGRAPH_STYLE_NAMES: [&str; 6] = [
    "Heading 1",
    "Heading 2",
    "Heading 3",
    "Body",
    "Body Small",
    "Caption",
];

/// Style a newly dropped text element uses.
pub const DEFAULT_PARAGRAPH_STYLE: &str = "Body";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

/// Typography for one paragraph style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    /// CSS hex colour.
    pub color: String,
    pub font_family: String,
    pub font_size: f64,
    pub font_style: FontStyle,
    /// Line height multiplier (`None` = renderer default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    pub font_weight: u16,
    /// Narrowest a text box using this style may wrap to.
    pub min_width: f64,
    pub opacity: f64,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            color: "#3d3d3d".to_string(),
            font_family: "Open Sans".to_string(),
            font_size: 45.0,
            font_style: FontStyle::Normal,
            line_height: None,
            font_weight: 400,
            min_width: 20.0,
            opacity: 1.0,
            text_align: TextAlign::Center,
            text_decoration: TextDecoration::None,
        }
    }
}

impl ParagraphStyle {
    fn sized(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }
}

/// The table every new presentation starts with.
pub fn default_paragraph_styles() -> ParagraphStyles {
    let mut styles = ParagraphStyles::new();
    styles.insert("Heading 1".to_string(), ParagraphStyle::sized(26.0));
    styles.insert("Heading 2".to_string(), ParagraphStyle::sized(20.0));
    styles.insert(
        "Heading 3".to_string(),
        ParagraphStyle {
            font_weight: 700,
            ..ParagraphStyle::sized(11.0)
        },
    );
    styles.insert("Body".to_string(), ParagraphStyle::sized(11.0));
    styles.insert("Body Small".to_string(), ParagraphStyle::sized(10.0));
    styles.insert(
        "Caption".to_string(),
        ParagraphStyle {
            font_style: FontStyle::Italic,
            ..ParagraphStyle::sized(11.0)
        },
    );
    styles
}
