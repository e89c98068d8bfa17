use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use url::Url;

use super::{ContentStore, Query};
use crate::{
    config::StoreConfig,
    error::{Error, Result},
};

/// Longest GET URL the query API accepts; anything longer goes out as POST.
const MAX_GET_URL: usize = 11264;

/// Client for the hosted store's HTTP query API.
pub struct SanityClient {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl SanityClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("masthead/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let version = config.api_version.trim_start_matches('v');
        let endpoint = config
            .api_origin()?
            .join(&format!("v{}/data/query/{}", version, config.dataset))?;

        Ok(Self {
            client,
            endpoint,
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `query=<groq>&$name=<json>` for every parameter.
    fn encode(query: &Query) -> Result<String> {
        let mut pairs = vec![(String::from("query"), query.groq.to_string())];
        for (name, value) in &query.params {
            pairs.push((format!("${}", name), value.to_string()));
        }

        Ok(serde_urlencoded::to_string(pairs)?)
    }

    fn request(&self, query: &Query) -> Result<RequestBuilder> {
        let encoded = Self::encode(query)?;

        let request = if self.endpoint.as_str().len() + 1 + encoded.len() > MAX_GET_URL {
            tracing::debug!("query {} too long for GET, using POST", query.name);
            self.client.post(self.endpoint.clone()).json(&json!({
                "query": query.groq,
                "params": query.params,
            }))
        } else {
            let mut url = self.endpoint.clone();
            url.set_query(Some(&encoded));
            self.client.get(url)
        };

        Ok(match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn query(&self, query: &Query) -> Result<Value> {
        let response = self.request(query)?.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .pointer("/error/description")
                .or_else(|| body.pointer("/message"))
                .and_then(Value::as_str)
                .or(status.canonical_reason())
                .unwrap_or("unknown error")
                .to_string();

            return Err(Error::Store { status, message });
        }

        let mut body: Value = response.json().await?;
        Ok(body.get_mut("result").map(Value::take).unwrap_or(Value::Null))
    }
}
