use axum::{
    http::{header, HeaderValue},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::site::{self, AppState};

pub fn create_router(state: AppState) -> Router {
    let windows = state.revalidate();

    let pages = Router::new()
        .route("/", get(site::home).layer(cache_for(windows.home)))
        .route(
            "/article/:slug",
            get(site::article).layer(cache_for(windows.article)),
        )
        .route(
            "/category/:token",
            get(site::category).layer(cache_for(windows.category)),
        )
        .route("/search", get(site::search).layer(cache_for(windows.search)))
        .route("/privacy", get(site::privacy).layer(cache_for(windows.legal)))
        .route("/terms", get(site::terms).layer(cache_for(windows.legal)))
        .route(
            "/static/site.css",
            get(site::stylesheet).layer(cache_for(windows.legal)),
        );

    let app = match state.links.mount_point() {
        "" => pages,
        mount => Router::new().nest(mount, pages),
    };

    app.fallback(site::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Lets shared caches serve a page for `seconds`, then revalidate in the
/// background. Zero disables caching.
pub fn cache_control(seconds: u64) -> HeaderValue {
    if seconds == 0 {
        return HeaderValue::from_static("no-store");
    }

    HeaderValue::try_from(format!(
        "public, max-age=0, s-maxage={}, stale-while-revalidate",
        seconds
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}

/// Only successful responses are cacheable; errors set their own header.
fn cache_for(
    seconds: u64,
) -> SetResponseHeaderLayer<impl Fn(&Response) -> Option<HeaderValue> + Clone> {
    let value = cache_control(seconds);
    SetResponseHeaderLayer::if_not_present(header::CACHE_CONTROL, move |response: &Response| {
        response.status().is_success().then(|| value.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, store::stub::StubStore};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const CONFIG: &str = r#"
[net]
bind = "127.0.0.1:3000"
proto_host = "https://journal.example"

[store]
project_id = "abc123"
dataset = "production"
api_version = "2024-01-01"

[site]
title = "Journal"
description = "Notes on art, pop culture and music."
contact_email = "desk@journal.example"
"#;

    fn app_with(store: Arc<StubStore>, extra: &str) -> Router {
        let config: Config = toml::from_str(&format!("{}{}", CONFIG, extra)).unwrap();
        create_router(AppState::new(config, store).unwrap())
    }

    fn app(store: Arc<StubStore>) -> Router {
        app_with(store, "")
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let cache = response
            .headers()
            .get(header::CACHE_CONTROL)
            .map(|value| value.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, cache, String::from_utf8(body.to_vec()).unwrap())
    }

    fn article(slug: &str, title: &str) -> Value {
        json!({
            "title": title,
            "slug": slug,
            "category": "Music",
            "date": "2024-06-01",
            "excerpt": format!("About {}", title),
            "image": {
                "asset": { "_ref": format!("image-{}-800x600-jpg", slug) },
                "source": "Press kit"
            },
            "spotifyUrl": null,
            "views": 1,
            "isPinned": null
        })
    }

    #[test]
    fn cache_control_values() {
        assert_eq!(cache_control(0), "no-store");
        assert_eq!(
            cache_control(60),
            "public, max-age=0, s-maxage=60, stale-while-revalidate"
        );
    }

    #[tokio::test]
    async fn home_renders_feed_sections() {
        let store = StubStore::new();
        let mut pinned = article("pinned", "The Pinned One");
        pinned["isPinned"] = json!(true);
        pinned["spotifyUrl"] = json!("https://open.spotify.com/episode/abc");
        store.respond(
            "articles",
            json!([
                article("first", "First Light"),
                pinned,
                article("third", "Third Wave"),
                article("fourth", "Fourth Wall"),
                article("fifth", "Fifth Season"),
            ]),
        );

        let (status, cache, body) = get(app(store.clone()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            cache.as_deref(),
            Some("public, max-age=0, s-maxage=3600, stale-while-revalidate")
        );
        assert!(body.contains(r#"class="card card--hero""#));
        assert!(body.contains("The Pinned One"));
        assert!(body.contains("Latest Updates"));
        assert!(body.contains("Selected Stories"));
        assert!(body.contains("Most Read"));
        assert!(body.contains("Listen"));
        assert!(!body.contains("From the Archives"));
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn home_survives_store_failure() {
        let store = StubStore::new();
        store.fail("articles");

        let (status, _, body) = get(app(store), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Nothing has been published yet."));
        assert!(!body.contains("Most Read"));
    }

    #[tokio::test]
    async fn article_page_renders_body_and_related() {
        let store = StubStore::new();
        let mut detail = article("loud-rooms", "Loud Rooms");
        detail["spotifyUrl"] = json!("https://open.spotify.com/track/xyz");
        detail["content"] = json!([
            { "_type": "block", "style": "h2", "children": [{ "_type": "span", "text": "Soundcheck" }] },
            { "_type": "block", "style": "blockquote", "children": [{ "_type": "span", "text": "Too loud?" }] }
        ]);
        store.respond("article", detail);
        store.respond("related", json!([article("quiet-rooms", "Quiet Rooms")]));

        let (status, cache, body) = get(app(store.clone()), "/article/loud-rooms").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            cache.as_deref(),
            Some("public, max-age=0, s-maxage=21600, stale-while-revalidate")
        );
        assert!(body.contains("<title>Loud Rooms | Journal</title>"));
        assert!(body.contains("<h2>Soundcheck</h2>"));
        assert!(body.contains("<blockquote>Too loud?</blockquote>"));
        assert!(body.contains("Image: Press kit"));
        assert!(body.contains("open.spotify.com&#x2F;embed&#x2F;track&#x2F;xyz"));
        assert!(body.contains("Read Also"));
        assert!(body.contains("Quiet Rooms"));
        assert!(body.contains(r#"<meta property="og:type" content="article">"#));

        let calls = store.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].params["category"], json!("Music"));
        assert_eq!(calls[1].params["currentSlug"], json!("loud-rooms"));
    }

    #[tokio::test]
    async fn article_without_body_shows_placeholder() {
        let store = StubStore::new();
        store.respond("article", article("empty", "Empty"));
        store.fail("related");

        let (status, _, body) = get(app(store), "/article/empty").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("This article has no content yet."));
        assert!(!body.contains("Read Also"));
    }

    #[tokio::test]
    async fn missing_article_is_not_found() {
        let store = StubStore::new();

        let (status, cache, body) = get(app(store.clone()), "/article/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert!(body.contains("Page not found"));
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn failing_article_fetch_is_not_found() {
        let store = StubStore::new();
        store.fail("article");

        let (status, _, _) = get(app(store), "/article/broken").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn category_maps_token_to_label() {
        let store = StubStore::new();
        store.respond("category", json!([article("a", "Alpha")]));

        let (status, cache, body) = get(app(store.clone()), "/category/pop-culture").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            cache.as_deref(),
            Some("public, max-age=0, s-maxage=60, stale-while-revalidate")
        );
        assert!(body.contains("Pop Culture"));
        assert!(body.contains("Alpha"));
        assert_eq!(store.calls()[0].params["category"], json!("Pop Culture"));
    }

    #[tokio::test]
    async fn unknown_category_shows_empty_state() {
        let store = StubStore::new();
        store.respond("category", json!([]));

        let (status, _, body) = get(app(store.clone()), "/category/culture").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Culture</h1>"));
        assert!(body.contains("No articles found in this category yet."));
        assert_eq!(store.calls()[0].params["category"], json!("Culture"));
    }

    #[tokio::test]
    async fn empty_search_issues_no_query() {
        let store = StubStore::new();

        for uri in ["/search", "/search?q=", "/search?q=%20%20"] {
            let (status, cache, body) = get(app(store.clone()), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache.as_deref(), Some("no-store"));
            assert!(body.contains("Enter a keyword to start searching."));
        }
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn search_without_matches() {
        let store = StubStore::new();
        store.respond("search", json!([]));

        let (status, _, body) = get(app(store.clone()), "/search?q=jazz").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No articles found matching your search."));
        assert!(body.contains(r#"value="jazz""#));
        assert_eq!(store.calls()[0].params["text"], json!("*jazz*"));
    }

    #[tokio::test]
    async fn search_with_matches() {
        let store = StubStore::new();
        store.respond("search", json!([article("jazz-age", "Jazz Age")]));

        let (_, _, body) = get(app(store), "/search?q=jazz").await;
        assert!(body.contains("Jazz Age"));
        assert!(!body.contains("No articles found"));
    }

    #[tokio::test]
    async fn legal_pages_and_stylesheet() {
        let store = StubStore::new();

        let (status, _, body) = get(app(store.clone()), "/privacy").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("desk@journal.example"));

        let (status, _, body) = get(app(store.clone()), "/terms").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Terms of Use"));

        let (status, _, body) = get(app(store), "/static/site.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(".align-justify"));
    }

    #[tokio::test]
    async fn failed_renders_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("home.html"), "{{ nope.missing }}").unwrap();
        let extra = format!("templates = {:?}\n", dir.path().display().to_string());

        let (status, cache, body) = get(app_with(StubStore::new(), &extra), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body, "the page could not be rendered");
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_not_found() {
        let (status, cache, body) = get(app(StubStore::new()), "/no/such/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn base_path_prefixes_routes_and_links() {
        let store = StubStore::new();
        store.respond("articles", json!([article("first", "First Light")]));
        let extra = "\n[revalidate]\nhome = 60\n";
        let config = CONFIG.replace(
            "proto_host = \"https://journal.example\"",
            "proto_host = \"https://journal.example\"\nbase_path = \"/journal\"",
        );
        let config: Config = toml::from_str(&format!("{}{}", config, extra)).unwrap();
        let app = create_router(AppState::new(config, store).unwrap());

        let (status, cache, body) = get(app.clone(), "/journal").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            cache.as_deref(),
            Some("public, max-age=0, s-maxage=60, stale-while-revalidate")
        );
        assert!(body.contains("&#x2F;journal&#x2F;article&#x2F;first"));

        let (status, _, _) = get(app, "/article/first").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
