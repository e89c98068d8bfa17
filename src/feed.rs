//! Splits the home feed into its sections.
//!
//! Sections are positional slices of the date-ordered list, not a partition:
//! an article can show up in several of them, and the hero can reappear under
//! "Latest Updates".

use crate::model::Article;

pub const LATEST_LEN: usize = 3;
pub const SELECTED_LEN: usize = 3;
pub const MOST_READ_LEN: usize = 4;
pub const MOST_READ_MIN: usize = 3;
pub const LISTEN_LEN: usize = 6;

#[derive(Debug)]
pub struct Feed<'a> {
    pub hero: Option<&'a Article>,
    pub latest: &'a [Article],
    pub selected: &'a [Article],
    /// `None` when there are too few articles to rank.
    pub most_read: Option<Vec<&'a Article>>,
    pub archives: &'a [Article],
    pub listen: Vec<&'a Article>,
}

impl<'a> Feed<'a> {
    /// `articles` must already be ordered newest first.
    pub fn compose(articles: &'a [Article]) -> Self {
        let latest_end = (1 + LATEST_LEN).min(articles.len());
        let selected_end = (latest_end + SELECTED_LEN).min(articles.len());

        Feed {
            hero: hero(articles),
            latest: &articles[latest_end.min(1)..latest_end],
            selected: &articles[latest_end..selected_end],
            most_read: most_read(articles),
            archives: &articles[selected_end..],
            listen: articles
                .iter()
                .filter(|article| article.audio_url().is_some())
                .take(LISTEN_LEN)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hero.is_none()
    }
}

/// First pinned article, otherwise the newest one.
pub fn hero(articles: &[Article]) -> Option<&Article> {
    articles
        .iter()
        .find(|article| article.is_pinned())
        .or_else(|| articles.first())
}

/// Top articles by view count. Ties keep feed order.
pub fn most_read(articles: &[Article]) -> Option<Vec<&Article>> {
    if articles.len() < MOST_READ_MIN {
        return None;
    }

    let mut ranked: Vec<&Article> = articles.iter().collect();
    ranked.sort_by(|a, b| b.views().cmp(&a.views()));
    ranked.truncate(MOST_READ_LEN);
    Some(ranked)
}
