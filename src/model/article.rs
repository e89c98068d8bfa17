use serde::Deserialize;
use std::fmt;
use time::{macros::format_description, Date};

use super::block::ContentBlock;

time::serde::format_description!(calendar_date, Date, "[year]-[month]-[day]");

/// Categories an editor can pick in the studio. Anything else the store hands
/// back is kept verbatim so it can still be displayed.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum Category {
    Art,
    PopCulture,
    Music,
    Other(String),
}

/// URL token to store label, in navigation order.
const CATEGORY_TOKENS: [(&str, Category); 3] = [
    ("art", Category::Art),
    ("pop-culture", Category::PopCulture),
    ("music", Category::Music),
];

impl Category {
    pub const ALL: [Category; 3] = [Category::Art, Category::PopCulture, Category::Music];

    pub fn label(&self) -> &str {
        match self {
            Category::Art => "Art",
            Category::PopCulture => "Pop Culture",
            Category::Music => "Music",
            Category::Other(label) => label,
        }
    }

    /// URL-friendly form used in `/category/{token}`.
    pub fn token(&self) -> String {
        slug::slugify(self.label())
    }

    /// Resolves a URL token. Unknown tokens fall back to capitalizing the first
    /// letter, so `culture` becomes `Culture`.
    pub fn from_token(token: &str) -> Category {
        let lower = token.to_lowercase();
        if let Some((_, category)) = CATEGORY_TOKENS.iter().find(|(t, _)| *t == lower) {
            return category.clone();
        }

        let mut chars = token.chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        Category::from(label)
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Art" => Category::Art,
            "Pop Culture" => Category::PopCulture,
            "Music" => Category::Music,
            _ => Category::Other(label),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Focal point chosen in the studio, as fractions of the image size.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
}

/// Crop insets, as fractions of the image size.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Crop {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct MainImage {
    pub asset: Option<AssetRef>,
    pub hotspot: Option<Hotspot>,
    pub crop: Option<Crop>,
    /// Credit line shown under the image.
    pub source: Option<String>,
}

impl MainImage {
    pub fn asset_ref(&self) -> Option<&str> {
        self.asset.as_ref().map(|asset| asset.reference.as_str())
    }
}

/// An article as projected by the store queries. Fields the query did not
/// project come back as `null` and land in the `Option`s.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub slug: String,
    pub category: Category,
    #[serde(with = "calendar_date")]
    pub date: Date,
    pub excerpt: Option<String>,
    pub image: Option<MainImage>,
    pub spotify_url: Option<String>,
    pub reading_time: Option<u32>,
    pub views: Option<u64>,
    pub is_pinned: Option<bool>,
    pub content: Option<Vec<ContentBlock>>,
}

impl Article {
    pub fn is_pinned(&self) -> bool {
        self.is_pinned.unwrap_or(false)
    }

    pub fn views(&self) -> u64 {
        self.views.unwrap_or(0)
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.spotify_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Articles without a usable main image are laid out as text-only.
    pub fn has_image(&self) -> bool {
        self.image
            .as_ref()
            .and_then(MainImage::asset_ref)
            .is_some()
    }

    pub fn display_date(&self) -> String {
        self.date
            .format(format_description!("[day].[month].[year repr:last_two]"))
            .unwrap_or_else(|_| self.date.to_string())
    }
}
