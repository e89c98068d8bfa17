//! Page handlers. Each one fetches what it needs, builds a page context and
//! renders it; store failures have already been turned into empty results.

use axum::{
    extract::{Path, Query as QueryString, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Tera;

use crate::{
    components::{AudioEmbed, Card, CardVariant},
    config::{Config, RevalidateConfig},
    error::Result,
    feed::Feed,
    model::{Article, Category},
    page::{self, ArticlePage, ArticleView, Chrome, HomePage, Links, ListingPage, Meta, PlainPage},
    render::Renderer,
    store::{Content, ContentStore, ImageUrls, Query},
    templates,
};

const SOCIAL_IMAGE: (u32, u32) = (1200, 630);
const ARTICLE_IMAGE: (u32, u32) = (1600, 900);

#[derive(Clone)]
pub struct AppState {
    pub content: Content,
    pub images: ImageUrls,
    pub links: Links,
    templates: Arc<Tera>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ContentStore>) -> Result<Self> {
        let templates = templates::load(config.site.templates.as_deref())?;
        let images = ImageUrls::new(
            config.images.cdn_host.as_ref(),
            &config.store.project_id,
            &config.store.dataset,
        )?;

        Ok(Self {
            content: Content::new(store),
            images,
            links: Links::new(&config.net.base_path),
            templates: Arc::new(templates),
            config: Arc::new(config),
        })
    }

    pub fn revalidate(&self) -> RevalidateConfig {
        self.config.revalidate
    }

    fn chrome(&self) -> Chrome {
        Chrome::new(&self.config, &self.links)
    }

    fn canonical(&self, path: &str) -> Option<String> {
        page::absolute(&self.config.net.proto_host, path)
    }

    fn card(&self, article: &Article, variant: CardVariant) -> Card {
        Card::new(article, variant, &self.links, &self.images)
    }

    fn cards<'a>(
        &self,
        articles: impl IntoIterator<Item = &'a Article>,
        variant: CardVariant,
    ) -> Vec<Card> {
        Card::many(articles, variant, &self.links, &self.images)
    }

    fn render<T: Serialize>(&self, name: &str, page: &T) -> Result<Html<String>> {
        let context = tera::Context::from_serialize(page)?;
        Ok(Html(self.templates.render(name, &context)?))
    }

    fn not_found(&self) -> Result<Response> {
        let chrome = self.chrome();
        let page = PlainPage {
            meta: Meta::titled(&chrome, "Not Found"),
            chrome,
        };

        Ok((
            StatusCode::NOT_FOUND,
            [(header::CACHE_CONTROL, "no-store")],
            self.render("not_found.html", &page)?,
        )
            .into_response())
    }
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let articles: Vec<Article> = state.content.list(&Query::articles()).await;
    let feed = Feed::compose(&articles);
    if feed.is_empty() {
        tracing::info!("home feed is empty");
    }

    let chrome = state.chrome();
    let page = HomePage {
        meta: Meta {
            canonical: state.canonical(&state.links.home()),
            ..Meta::site(&chrome)
        },
        hero: feed.hero.map(|hero| state.card(hero, CardVariant::Hero)),
        latest: state.cards(feed.latest, CardVariant::Compact),
        selected: state.cards(feed.selected, CardVariant::Standard),
        most_read: feed
            .most_read
            .map(|ranked| state.cards(ranked, CardVariant::Mini)),
        archives: state.cards(feed.archives, CardVariant::TextOnly),
        listen: state.cards(feed.listen, CardVariant::Audio),
        chrome,
    };

    state.render("home.html", &page)
}

pub async fn article(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    let Some(article) = state.content.one::<Article>(&Query::article(&slug)).await else {
        tracing::info!("no article with slug {:?}", slug);
        return state.not_found();
    };

    let related: Vec<Article> = state
        .content
        .list(&Query::related(&article.category, &article.slug))
        .await;

    let image = |(width, height): (u32, u32)| {
        article
            .image
            .as_ref()
            .and_then(|image| state.images.url(image, Some(width), Some(height)))
    };

    let body = article
        .content
        .as_deref()
        .filter(|blocks| !blocks.is_empty())
        .map(|blocks| Renderer::new(&state.images).render(blocks));

    let chrome = state.chrome();
    let page = ArticlePage {
        meta: Meta {
            description: article
                .excerpt
                .clone()
                .unwrap_or_else(|| chrome.site_description.clone()),
            canonical: state.canonical(&state.links.article(&article.slug)),
            image: image(SOCIAL_IMAGE),
            kind: "article",
            ..Meta::titled(&chrome, &article.title)
        },
        article: ArticleView {
            title: article.title.clone(),
            category: article.category.label().to_string(),
            category_href: state.links.category(&article.category),
            date: article.display_date(),
            excerpt: article.excerpt.clone(),
            reading_time: article.reading_time.filter(|minutes| *minutes > 0),
            image: image(ARTICLE_IMAGE),
            image_credit: article.image.as_ref().and_then(|image| image.source.clone()),
            audio: article.audio_url().and_then(AudioEmbed::new),
            body,
        },
        related: state.cards(&related, CardVariant::Standard),
        chrome,
    };

    Ok(state.render("article.html", &page)?.into_response())
}

pub async fn category(State(state): State<AppState>, Path(token): Path<String>) -> Result<Html<String>> {
    let category = Category::from_token(&token);
    let articles: Vec<Article> = state.content.list(&Query::category(&category)).await;

    let chrome = state.chrome();
    let page = ListingPage {
        meta: Meta {
            canonical: state.canonical(&state.links.category(&category)),
            ..Meta::titled(&chrome, category.label())
        },
        kind: "category",
        heading: category.label().to_string(),
        query: None,
        results: state.cards(&articles, CardVariant::Standard),
        empty_message: "No articles found in this category yet.",
        chrome,
    };

    state.render("listing.html", &page)
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    QueryString(params): QueryString<SearchParams>,
) -> Result<Html<String>> {
    let text = params.q.as_deref().unwrap_or_default().trim().to_string();

    let (articles, empty_message): (Vec<Article>, _) = if text.is_empty() {
        (Vec::new(), "Enter a keyword to start searching.")
    } else {
        (
            state.content.list(&Query::search(&text)).await,
            "No articles found matching your search.",
        )
    };

    let chrome = state.chrome();
    let page = ListingPage {
        meta: Meta::titled(&chrome, "Search"),
        kind: "search",
        heading: String::from("Search Results"),
        query: Some(text),
        results: state.cards(&articles, CardVariant::Standard),
        empty_message,
        chrome,
    };

    state.render("listing.html", &page)
}

pub async fn privacy(State(state): State<AppState>) -> Result<Html<String>> {
    legal(&state, "privacy.html", "Privacy Policy", state.links.privacy())
}

pub async fn terms(State(state): State<AppState>) -> Result<Html<String>> {
    legal(&state, "terms.html", "Terms of Use", state.links.terms())
}

fn legal(state: &AppState, template: &str, title: &str, path: String) -> Result<Html<String>> {
    let chrome = state.chrome();
    let page = PlainPage {
        meta: Meta {
            canonical: state.canonical(&path),
            ..Meta::titled(&chrome, title)
        },
        chrome,
    };

    state.render(template, &page)
}

pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        templates::STYLESHEET,
    )
}

pub async fn not_found(State(state): State<AppState>) -> Result<Response> {
    state.not_found()
}
