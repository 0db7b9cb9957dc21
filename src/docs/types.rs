// src/docs/types.rs
// Wire types for the remote rich-text document API

use serde::{Deserialize, Serialize};

const LINK_RGB: RgbColor = RgbColor {
    red: 0.0,
    green: 0.3,
    blue: 0.8,
};

/// Index into the document's text, in UTF-16 code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentOffset(pub u32);

/// `[start, start + length)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRange {
    pub start: DocumentOffset,
    pub length: u32,
}

impl StyleRange {
    pub fn new(start: DocumentOffset, length: u32) -> Self {
        Self { start, length }
    }

    pub fn end(&self) -> u32 {
        self.start.0 + self.length
    }

    fn to_range(self) -> Range {
        Range {
            start_index: self.start.0,
            end_index: self.end(),
        }
    }
}

/// Styles the mutation client knows how to apply
#[derive(Debug, Clone, PartialEq)]
pub enum TextStyleKind {
    /// Clickable anchor: link + colour + underline
    Hyperlink { url: String },
    /// Section label
    Bold,
}

impl TextStyleKind {
    fn to_text_style(&self) -> (TextStyle, &'static str) {
        match self {
            TextStyleKind::Hyperlink { url } => (
                TextStyle {
                    link: Some(Link { url: url.clone() }),
                    foreground_color: Some(OptionalColor {
                        color: Color { rgb_color: LINK_RGB },
                    }),
                    underline: Some(true),
                    ..TextStyle::default()
                },
                "link,foregroundColor,underline",
            ),
            TextStyleKind::Bold => (
                TextStyle {
                    bold: Some(true),
                    ..TextStyle::default()
                },
                "bold",
            ),
        }
    }
}

// --- Read side ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

// --- Write side ---

#[derive(Debug, Serialize)]
pub struct CreateDocumentRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

/// One entry of a batchUpdate, serialized as `{"insertText": {...}}` etc.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertText(InsertTextRequest),
    UpdateTextStyle(UpdateTextStyleRequest),
    UpdateParagraphStyle(UpdateParagraphStyleRequest),
}

impl Request {
    /// End-of-segment insert: always lands after the last existing character
    pub fn append(text: impl Into<String>) -> Self {
        Request::InsertText(InsertTextRequest {
            text: text.into(),
            location: None,
            end_of_segment_location: Some(EndOfSegmentLocation {}),
        })
    }

    pub fn insert_at(index: u32, text: impl Into<String>) -> Self {
        Request::InsertText(InsertTextRequest {
            text: text.into(),
            location: Some(Location { index }),
            end_of_segment_location: None,
        })
    }

    pub fn style(range: StyleRange, style: &TextStyleKind) -> Self {
        let (text_style, fields) = style.to_text_style();
        Request::UpdateTextStyle(UpdateTextStyleRequest {
            range: range.to_range(),
            text_style,
            fields: fields.to_string(),
        })
    }

    pub fn header_font(range: StyleRange, family: &str, size_pt: f32) -> Self {
        Request::UpdateTextStyle(UpdateTextStyleRequest {
            range: range.to_range(),
            text_style: TextStyle {
                weighted_font_family: Some(WeightedFontFamily {
                    font_family: family.to_string(),
                }),
                font_size: Some(Dimension {
                    magnitude: size_pt,
                    unit: "PT".to_string(),
                }),
                bold: Some(true),
                ..TextStyle::default()
            },
            fields: "weightedFontFamily,fontSize,bold".to_string(),
        })
    }

    pub fn center_paragraph(range: StyleRange) -> Self {
        Request::UpdateParagraphStyle(UpdateParagraphStyleRequest {
            range: range.to_range(),
            paragraph_style: ParagraphStyle {
                alignment: Some("CENTER".to_string()),
                named_style_type: Some("NORMAL_TEXT".to_string()),
            },
            fields: "alignment,namedStyleType".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTextRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_of_segment_location: Option<EndOfSegmentLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndOfSegmentLocation {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: u32,
    pub end_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyleRequest {
    pub range: Range,
    pub text_style: TextStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParagraphStyleRequest {
    pub range: Range,
    pub paragraph_style: ParagraphStyle,
    pub fields: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_font_family: Option<WeightedFontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionalColor {
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub rgb_color: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedFontFamily {
    pub font_family: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub magnitude: f32,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<String>,
}
