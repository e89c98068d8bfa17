use indexmap::IndexMap;
use serde_json::Value;

use crate::model::Category;

/// Fields every article listing projects. The main image keeps its asset
/// reference, crop and hotspot so URLs can be built locally.
macro_rules! summary_fields {
    () => {
        r#"title, category, date, readingTime, excerpt, "slug": slug.current, "image": imageUrl{asset, hotspot, crop, source}, spotifyUrl, views, isPinned"#
    };
}

const ARTICLES: &str = concat!(
    r#"*[_type == "article"] | order(date desc)[0...100] {"#,
    summary_fields!(),
    "}"
);

const ARTICLE: &str = concat!(
    r#"*[_type == "article" && slug.current == $slug][0] {"#,
    summary_fields!(),
    ", content}"
);

const RELATED: &str = concat!(
    r#"*[_type == "article" && category == $category && slug.current != $currentSlug] | order(date desc)[0...2] {"#,
    summary_fields!(),
    "}"
);

const CATEGORY: &str = concat!(
    r#"*[_type == "article" && category == $category] | order(date desc) {"#,
    summary_fields!(),
    "}"
);

const SEARCH: &str = concat!(
    r#"*[_type == "article" && (title match $text || excerpt match $text || content[].children[].text match $text)] | order(date desc) {"#,
    summary_fields!(),
    "}"
);

/// A GROQ query plus its parameters, named for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub name: &'static str,
    pub groq: &'static str,
    pub params: IndexMap<String, Value>,
}

impl Query {
    fn new(name: &'static str, groq: &'static str) -> Self {
        Self {
            name,
            groq,
            params: IndexMap::new(),
        }
    }

    fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Home feed: the 100 newest articles, without bodies.
    pub fn articles() -> Self {
        Self::new("articles", ARTICLES)
    }

    pub fn article(slug: &str) -> Self {
        Self::new("article", ARTICLE).param("slug", slug)
    }

    /// Two newest articles in `category`, excluding the one being read.
    pub fn related(category: &Category, current_slug: &str) -> Self {
        Self::new("related", RELATED)
            .param("category", category.label())
            .param("currentSlug", current_slug)
    }

    pub fn category(category: &Category) -> Self {
        Self::new("category", CATEGORY).param("category", category.label())
    }

    /// Substring search; the store decides case sensitivity.
    pub fn search(text: &str) -> Self {
        Self::new("search", SEARCH).param("text", format!("*{}*", text))
    }
}
