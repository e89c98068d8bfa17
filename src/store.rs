//! Read access to the hosted content store.
//!
//! Pages never see store errors: [`Content`] logs them and hands back an
//! empty list or `None`, which the pages render as empty or not-found states.

mod http;
mod image;
mod query;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub use http::SanityClient;
pub use image::ImageUrls;
pub use query::Query;

use crate::error::Result;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Runs `query` and returns the store's `result` value as-is.
    async fn query(&self, query: &Query) -> Result<Value>;
}

#[derive(Clone)]
pub struct Content {
    store: Arc<dyn ContentStore>,
}

impl Content {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Records matching `query`. Failures yield an empty list and records that
    /// do not decode are skipped.
    pub async fn list<T: DeserializeOwned>(&self, query: &Query) -> Vec<T> {
        let items = match self.store.query(query).await {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => return Vec::new(),
            Ok(other) => {
                tracing::warn!("query {} returned a non-list result: {}", query.name, other);
                return Vec::new();
            }
            Err(err) => {
                tracing::error!("query {} failed: {}", query.name, err);
                return Vec::new();
            }
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!("skipping record {} of query {}: {}", i, query.name, err);
                    None
                }
            })
            .collect()
    }

    /// The single record `query` selects, or `None` when it is missing, does
    /// not decode, or the store failed.
    pub async fn one<T: DeserializeOwned>(&self, query: &Query) -> Option<T> {
        match self.store.query(query).await {
            Ok(Value::Null) => {
                tracing::debug!("query {} matched nothing", query.name);
                None
            }
            Ok(value) => serde_json::from_value(value)
                .map_err(|err| tracing::warn!("query {} returned a bad record: {}", query.name, err))
                .ok(),
            Err(err) => {
                tracing::error!("query {} failed: {}", query.name, err);
                None
            }
        }
    }
}
