//! Turns an article body into HTML.

use tera::escape_html;
use url::Url;

use crate::{
    model::{ContentBlock, ImageBlock, ListKind, Span, Style, TextBlock},
    page::Html,
    store::ImageUrls,
};

const BODY_IMAGE_WIDTH: u32 = 1200;
const BODY_IMAGE_HEIGHT: u32 = 800;

/// Lists still open while walking consecutive list items.
#[derive(Default)]
struct OpenLists {
    stack: Vec<(ListKind, u32)>,
}

impl OpenLists {
    fn tag(kind: &ListKind) -> &'static str {
        match kind {
            ListKind::Number => "ol",
            _ => "ul",
        }
    }

    fn close_one(&mut self, out: &mut String) {
        if let Some((kind, _)) = self.stack.pop() {
            out.push_str("</li></");
            out.push_str(Self::tag(&kind));
            out.push('>');
        }
    }

    fn close_all(&mut self, out: &mut String) {
        while !self.stack.is_empty() {
            self.close_one(out);
        }
    }

    /// Opens an `<li>` at `level`, closing or nesting lists as needed. The item
    /// stays open so a deeper list can nest inside it.
    fn item(&mut self, out: &mut String, kind: ListKind, level: u32) {
        loop {
            let close = match self.stack.last() {
                Some((open_kind, open_level)) => {
                    *open_level > level || (*open_level == level && *open_kind != kind)
                }
                None => false,
            };
            if !close {
                break;
            }
            self.close_one(out);
        }

        let sibling = matches!(self.stack.last(), Some((_, open_level)) if *open_level == level);
        if sibling {
            out.push_str("</li>");
        } else {
            out.push('<');
            out.push_str(Self::tag(&kind));
            out.push('>');
            self.stack.push((kind, level));
        }

        out.push_str("<li>");
    }
}

pub struct Renderer<'a> {
    images: &'a ImageUrls,
}

impl<'a> Renderer<'a> {
    pub fn new(images: &'a ImageUrls) -> Self {
        Self { images }
    }

    pub fn render(&self, blocks: &[ContentBlock]) -> Html {
        let mut out = String::new();
        let mut lists = OpenLists::default();

        for block in blocks {
            match block {
                ContentBlock::Text(text) => match &text.list_item {
                    Some(ListKind::Unknown(kind)) => {
                        lists.close_all(&mut out);
                        tracing::warn!("skipping list item of unknown kind {:?}", kind);
                    }
                    Some(kind) => {
                        lists.item(&mut out, kind.clone(), text.level());
                        out.push_str(&self.spans(text));
                    }
                    None => {
                        lists.close_all(&mut out);
                        self.text(&mut out, text);
                    }
                },

                ContentBlock::Image(image) => {
                    lists.close_all(&mut out);
                    self.image(&mut out, image);
                }

                ContentBlock::Unknown { kind } => {
                    lists.close_all(&mut out);
                    tracing::warn!("skipping content block of unknown type {:?}", kind);
                }
            }
        }

        lists.close_all(&mut out);
        Html(out)
    }

    fn text(&self, out: &mut String, block: &TextBlock) {
        let (open, close) = match block.style() {
            Style::Normal => ("<p>", "</p>"),
            Style::Center => (r#"<p class="align-center">"#, "</p>"),
            Style::Right => (r#"<p class="align-right">"#, "</p>"),
            Style::Justify => (r#"<p class="align-justify">"#, "</p>"),
            Style::Heading2 => ("<h2>", "</h2>"),
            Style::Heading3 => ("<h3>", "</h3>"),
            Style::Quote => ("<blockquote>", "</blockquote>"),
            Style::Unknown(style) => {
                tracing::warn!("skipping text block with unknown style {:?}", style);
                return;
            }
        };

        out.push_str(open);
        out.push_str(&self.spans(block));
        out.push_str(close);
    }

    fn spans(&self, block: &TextBlock) -> String {
        let mut out = String::new();
        for span in &block.children {
            if !span.is_text() {
                tracing::warn!("skipping inline object {:?}", span.kind);
                continue;
            }
            self.span(&mut out, block, span);
        }
        out
    }

    fn span(&self, out: &mut String, block: &TextBlock, span: &Span) {
        let mut closers = Vec::new();

        for mark in &span.marks {
            let (open, close) = match mark.as_str() {
                "strong" => (String::from("<strong>"), "</strong>"),
                "em" => (String::from("<em>"), "</em>"),
                "underline" => (String::from("<u>"), "</u>"),
                "code" => (String::from("<code>"), "</code>"),
                "strike-through" => (String::from("<s>"), "</s>"),
                key => match block.mark_def(key) {
                    Some(def) if def.kind == "link" => {
                        match def.href.as_deref().and_then(link_open) {
                            Some(open) => (open, "</a>"),
                            None => {
                                tracing::warn!("dropping link to {:?}", def.href);
                                continue;
                            }
                        }
                    }
                    _ => {
                        tracing::debug!("ignoring unknown mark {:?}", key);
                        continue;
                    }
                },
            };
            out.push_str(&open);
            closers.push(close);
        }

        let mut lines = span.text.split('\n');
        if let Some(first) = lines.next() {
            out.push_str(&escape_html(first));
        }
        for line in lines {
            out.push_str("<br>");
            out.push_str(&escape_html(line));
        }

        for close in closers.into_iter().rev() {
            out.push_str(close);
        }
    }

    fn image(&self, out: &mut String, block: &ImageBlock) {
        let Some(src) = self
            .images
            .url(&block.image, Some(BODY_IMAGE_WIDTH), Some(BODY_IMAGE_HEIGHT))
        else {
            tracing::warn!("skipping image block without a usable asset");
            return;
        };

        let alt = block.alt.as_deref().unwrap_or("Article image");
        out.push_str(&format!(
            r#"<figure><img src="{}" alt="{}" loading="lazy">"#,
            escape_html(&src),
            escape_html(alt)
        ));
        if let Some(caption) = block.caption.as_deref().filter(|c| !c.is_empty()) {
            out.push_str(&format!("<figcaption>{}</figcaption>", escape_html(caption)));
        }
        out.push_str("</figure>");
    }
}

const LINK_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// Opening tag for a link mark, or `None` when the target is not a
/// site-relative path, a fragment, or one of [`LINK_SCHEMES`].
fn link_open(href: &str) -> Option<String> {
    let href = href.trim();
    if href.starts_with('/') || href.starts_with('#') {
        return Some(format!(r#"<a href="{}">"#, escape_html(href)));
    }

    let url = Url::parse(href).ok()?;
    if !LINK_SCHEMES.contains(&url.scheme()) {
        return None;
    }

    Some(format!(
        r#"<a href="{}" rel="noreferrer noopener">"#,
        escape_html(href)
    ))
}
