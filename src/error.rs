use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content store returned {status}: {message}")]
    Store {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not encode query: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("request failed: {}", self);

        let (status, body) = match self {
            Error::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "the page could not be rendered",
            ),

            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        };

        // Shared caches must not keep a failed render.
        (status, [(header::CACHE_CONTROL, "no-store")], body).into_response()
    }
}
