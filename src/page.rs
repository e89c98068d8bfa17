use serde::Serialize;
use url::Url;

use crate::{
    components::{AudioEmbed, Card},
    config::Config,
    model::Category,
};

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct Html(pub String);

/// Site-relative links, all under the configured base path.
#[derive(Debug, Clone)]
pub struct Links {
    base: String,
}

impl Links {
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim_matches('/');
        let base = if trimmed.is_empty() {
            String::from("/")
        } else {
            format!("/{}/", trimmed)
        };
        Self { base }
    }

    /// Prefix the router is mounted under, without the trailing slash.
    pub fn mount_point(&self) -> &str {
        self.base.trim_end_matches('/')
    }

    pub fn home(&self) -> String {
        match self.mount_point() {
            "" => String::from("/"),
            mount => mount.to_string(),
        }
    }

    pub fn article(&self, slug: &str) -> String {
        format!("{}article/{}", self.base, slug)
    }

    pub fn category(&self, category: &Category) -> String {
        format!("{}category/{}", self.base, category.token())
    }

    pub fn search(&self) -> String {
        format!("{}search", self.base)
    }

    pub fn privacy(&self) -> String {
        format!("{}privacy", self.base)
    }

    pub fn terms(&self) -> String {
        format!("{}terms", self.base)
    }

    pub fn stylesheet(&self) -> String {
        format!("{}static/site.css", self.base)
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

/// Header and footer content shared by every page.
#[derive(Serialize, Clone, Debug)]
pub struct Chrome {
    pub site_title: String,
    pub site_description: String,
    pub home: String,
    pub search: String,
    pub privacy: String,
    pub terms: String,
    pub stylesheet: String,
    pub categories: Vec<NavLink>,
    pub contact_email: Option<String>,
    pub instagram: Option<String>,
    pub year: i32,
}

impl Chrome {
    pub fn new(config: &Config, links: &Links) -> Self {
        Chrome {
            site_title: config.site.title.clone(),
            site_description: config.site.description.clone(),
            home: links.home(),
            search: links.search(),
            privacy: links.privacy(),
            terms: links.terms(),
            stylesheet: links.stylesheet(),
            categories: Category::ALL
                .iter()
                .map(|category| NavLink {
                    label: category.label().to_string(),
                    href: links.category(category),
                })
                .collect(),
            contact_email: config.site.contact_email.clone(),
            instagram: config
                .site
                .instagram
                .as_ref()
                .map(|handle| format!("https://instagram.com/{}", handle.trim_start_matches('@'))),
            year: time::OffsetDateTime::now_utc().year(),
        }
    }
}

/// `<head>` metadata, including Open Graph and Twitter card tags.
#[derive(Serialize, Clone, Debug)]
pub struct Meta {
    pub title: String,
    pub description: String,
    pub canonical: Option<String>,
    pub image: Option<String>,
    pub kind: &'static str,
}

impl Meta {
    pub fn site(chrome: &Chrome) -> Self {
        Meta {
            title: chrome.site_title.clone(),
            description: chrome.site_description.clone(),
            canonical: None,
            image: None,
            kind: "website",
        }
    }

    pub fn titled(chrome: &Chrome, title: &str) -> Self {
        Meta {
            title: format!("{} | {}", title, chrome.site_title),
            ..Meta::site(chrome)
        }
    }
}

/// Absolute URL for a site-relative path, for canonical and social links.
pub fn absolute(origin: &Url, path: &str) -> Option<String> {
    origin.join(path).ok().map(String::from)
}

#[derive(Serialize, Debug)]
pub struct HomePage {
    pub chrome: Chrome,
    pub meta: Meta,
    pub hero: Option<Card>,
    pub latest: Vec<Card>,
    pub selected: Vec<Card>,
    pub most_read: Option<Vec<Card>>,
    pub archives: Vec<Card>,
    pub listen: Vec<Card>,
}

#[derive(Serialize, Debug)]
pub struct ArticleView {
    pub title: String,
    pub category: String,
    pub category_href: String,
    pub date: String,
    pub excerpt: Option<String>,
    pub reading_time: Option<u32>,
    pub image: Option<String>,
    pub image_credit: Option<String>,
    pub audio: Option<AudioEmbed>,
    /// `None` renders the "no content yet" placeholder.
    pub body: Option<Html>,
}

#[derive(Serialize, Debug)]
pub struct ArticlePage {
    pub chrome: Chrome,
    pub meta: Meta,
    pub article: ArticleView,
    pub related: Vec<Card>,
}

/// Category and search result pages.
#[derive(Serialize, Debug)]
pub struct ListingPage {
    pub chrome: Chrome,
    pub meta: Meta,
    pub kind: &'static str,
    pub heading: String,
    pub query: Option<String>,
    pub results: Vec<Card>,
    pub empty_message: &'static str,
}

/// Pages with nothing but chrome: legal text and not-found.
#[derive(Serialize, Debug)]
pub struct PlainPage {
    pub chrome: Chrome,
    pub meta: Meta,
}
