use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

use super::article::MainImage;

/// One structural unit of an article body.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentBlock {
    Text(TextBlock),
    Image(ImageBlock),
    /// A block type this site does not know how to render yet.
    Unknown { kind: String },
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match kind.as_str() {
            "block" => TextBlock::deserialize(value)
                .map(ContentBlock::Text)
                .map_err(D::Error::custom),
            "image" => ImageBlock::deserialize(value)
                .map(ContentBlock::Image)
                .map_err(D::Error::custom),
            _ => Ok(ContentBlock::Unknown { kind }),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String")]
pub enum Style {
    Normal,
    Center,
    Right,
    Justify,
    Heading2,
    Heading3,
    Quote,
    Unknown(String),
}

impl From<String> for Style {
    fn from(style: String) -> Self {
        match style.as_str() {
            "normal" => Style::Normal,
            "center" => Style::Center,
            "right" => Style::Right,
            "justify" => Style::Justify,
            "h2" => Style::Heading2,
            "h3" => Style::Heading3,
            "blockquote" => Style::Quote,
            _ => Style::Unknown(style),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String")]
pub enum ListKind {
    Bullet,
    Number,
    Unknown(String),
}

impl From<String> for ListKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "bullet" => ListKind::Bullet,
            "number" => ListKind::Number,
            _ => ListKind::Unknown(kind),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(rename = "_key")]
    pub key: Option<String>,
    pub style: Option<Style>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
    pub list_item: Option<ListKind>,
    pub level: Option<u32>,
}

impl TextBlock {
    pub fn style(&self) -> Style {
        self.style.clone().unwrap_or(Style::Normal)
    }

    pub fn level(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }

    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|def| def.key == key)
    }
}

/// Inline run of text. `marks` holds decorator names (`strong`, `em`, ...)
/// or keys into the parent block's `mark_defs`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Span {
    #[serde(rename = "_type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

impl Span {
    pub fn is_text(&self) -> bool {
        self.kind.as_deref().map_or(true, |kind| kind == "span")
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    pub href: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ImageBlock {
    #[serde(flatten)]
    pub image: MainImage,
    pub alt: Option<String>,
    pub caption: Option<String>,
}
