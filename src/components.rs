use serde::Serialize;
use url::Url;

use crate::{model::Article, page::Links, store::ImageUrls};

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CardVariant {
    Hero,
    Standard,
    Compact,
    Mini,
    Audio,
    TextOnly,
}

impl CardVariant {
    fn image_size(self) -> Option<(u32, u32)> {
        match self {
            CardVariant::Hero => Some((1600, 900)),
            CardVariant::Standard => Some((900, 600)),
            CardVariant::Compact => Some((160, 160)),
            CardVariant::Mini => Some((400, 400)),
            CardVariant::Audio => Some((600, 600)),
            CardVariant::TextOnly => None,
        }
    }

    /// Grid cards for articles without an image switch to the text-only layout.
    pub fn for_article(self, article: &Article) -> Self {
        match self {
            CardVariant::Standard if !article.has_image() => CardVariant::TextOnly,
            variant => variant,
        }
    }
}

/// Everything a card template needs, already resolved.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Card {
    pub variant: CardVariant,
    pub title: String,
    pub category: String,
    pub category_href: String,
    pub date: String,
    pub excerpt: Option<String>,
    pub href: String,
    pub image: Option<String>,
    pub reading_time: Option<u32>,
}

impl Card {
    pub fn new(article: &Article, variant: CardVariant, links: &Links, images: &ImageUrls) -> Self {
        let image = variant.image_size().and_then(|(width, height)| {
            article
                .image
                .as_ref()
                .and_then(|image| images.url(image, Some(width), Some(height)))
        });

        Card {
            variant,
            title: article.title.clone(),
            category: article.category.label().to_string(),
            category_href: links.category(&article.category),
            date: article.display_date(),
            excerpt: article.excerpt.clone().filter(|excerpt| !excerpt.is_empty()),
            href: links.article(&article.slug),
            image,
            reading_time: article.reading_time.filter(|minutes| *minutes > 0),
        }
    }

    pub fn many<'a>(
        articles: impl IntoIterator<Item = &'a Article>,
        variant: CardVariant,
        links: &Links,
        images: &ImageUrls,
    ) -> Vec<Card> {
        articles
            .into_iter()
            .map(|article| Card::new(article, variant.for_article(article), links, images))
            .collect()
    }
}

const SPOTIFY_HOST: &str = "open.spotify.com";

/// Player iframe for an article's audio link.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AudioEmbed {
    pub src: String,
    pub height: u32,
}

impl AudioEmbed {
    pub fn new(url: &str) -> Option<Self> {
        let mut parsed = match Url::parse(url.trim()) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("ignoring audio link {:?}: {}", url, err);
                return None;
            }
        };

        if parsed.host_str() == Some(SPOTIFY_HOST) && !parsed.path().starts_with("/embed/") {
            let path = format!("/embed{}", parsed.path());
            parsed.set_path(&path);
        }

        Some(AudioEmbed {
            src: parsed.into(),
            height: 152,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetRef, Category, MainImage};
    use time::{Date, Month};

    fn article(with_image: bool) -> Article {
        Article {
            title: String::from("Loud Rooms"),
            slug: String::from("loud-rooms"),
            category: Category::Music,
            date: Date::from_calendar_date(2024, Month::July, 4).unwrap(),
            excerpt: Some(String::new()),
            image: with_image.then(|| MainImage {
                asset: Some(AssetRef {
                    reference: String::from("image-abc-800x600-jpg"),
                }),
                hotspot: None,
                crop: None,
                source: Some(String::from("Press kit")),
            }),
            spotify_url: None,
            reading_time: Some(0),
            views: None,
            is_pinned: None,
            content: None,
        }
    }

    fn fixtures() -> (Links, ImageUrls) {
        (
            Links::new("/"),
            ImageUrls::new(None, "abc123", "production").unwrap(),
        )
    }

    #[test]
    fn card_resolves_links_and_sized_image() {
        let (links, images) = fixtures();
        let card = Card::new(&article(true), CardVariant::Compact, &links, &images);

        assert_eq!(card.href, "/article/loud-rooms");
        assert_eq!(card.category, "Music");
        assert_eq!(card.category_href, "/category/music");
        assert_eq!(card.date, "04.07.24");
        assert_eq!(card.excerpt, None);
        assert_eq!(card.reading_time, None);
        assert!(card.image.unwrap().contains("w=160&h=160"));
    }

    #[test]
    fn text_only_cards_have_no_image() {
        let (links, images) = fixtures();
        let card = Card::new(&article(true), CardVariant::TextOnly, &links, &images);
        assert_eq!(card.image, None);
    }

    #[test]
    fn standard_cards_without_image_become_text_only() {
        let (links, images) = fixtures();
        let with = article(true);
        let without = article(false);

        let cards = Card::many([&with, &without], CardVariant::Standard, &links, &images);
        assert_eq!(cards[0].variant, CardVariant::Standard);
        assert_eq!(cards[1].variant, CardVariant::TextOnly);

        assert_eq!(CardVariant::Hero.for_article(&without), CardVariant::Hero);
    }

    #[test]
    fn variants_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_value(CardVariant::TextOnly).unwrap(),
            serde_json::json!("text-only")
        );
    }

    #[test]
    fn spotify_links_become_embeds() {
        assert_eq!(
            AudioEmbed::new("https://open.spotify.com/episode/4rOoJ6Egrf8K2IrywzwOMk?si=1")
                .map(|embed| embed.src),
            Some(String::from(
                "https://open.spotify.com/embed/episode/4rOoJ6Egrf8K2IrywzwOMk?si=1"
            ))
        );
        assert_eq!(
            AudioEmbed::new("https://open.spotify.com/embed/track/abc").map(|embed| embed.src),
            Some(String::from("https://open.spotify.com/embed/track/abc"))
        );
    }

    #[test]
    fn other_audio_links_pass_through() {
        assert_eq!(
            AudioEmbed::new("https://w.soundcloud.com/player/?url=x").map(|embed| embed.src),
            Some(String::from("https://w.soundcloud.com/player/?url=x"))
        );
        assert_eq!(AudioEmbed::new("not a url"), None);
    }
}
