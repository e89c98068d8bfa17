mod article;
mod block;

pub use article::{Article, AssetRef, Category, Crop, Hotspot, MainImage};
pub use block::{ContentBlock, ImageBlock, ListKind, Span, Style, TextBlock};
