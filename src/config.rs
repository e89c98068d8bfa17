use serde::{de::Visitor, Deserialize};
use std::{
    net::SocketAddr,
    ops::Deref,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

#[derive(Deserialize, Debug, Clone)]
pub struct NetConfig {
    pub bind: SocketAddr,
    pub proto_host: Url,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    #[serde(default = "default_true")]
    pub use_cdn: bool,
    pub token: Option<String>,
    pub api_host: Option<Url>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ImageConfig {
    pub cdn_host: Option<Url>,
}

/// Maximum cache age, in seconds, for each kind of page.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RevalidateConfig {
    pub home: u64,
    pub article: u64,
    pub category: u64,
    pub search: u64,
    pub legal: u64,
}

impl Default for RevalidateConfig {
    fn default() -> Self {
        Self {
            home: 3600,
            article: 21600,
            category: 60,
            search: 0,
            legal: 86400,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub templates: Option<ValidPath>,
    pub contact_email: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub net: NetConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub revalidate: RevalidateConfig,
    pub site: SiteConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|err| crate::error::Error::Config(format!("{}: {}", path.display(), err)))
    }
}

impl StoreConfig {
    /// Origin the query API lives on, honoring the CDN toggle.
    pub fn api_origin(&self) -> crate::error::Result<Url> {
        if let Some(host) = &self.api_host {
            return Ok(host.clone());
        }

        let domain = if self.use_cdn && self.token.is_none() {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };

        Ok(Url::parse(&format!("https://{}.{}", self.project_id, domain))?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_path() -> String {
    String::from("/")
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Clone)]
pub struct ValidPath(PathBuf);

impl<'de> Deserialize<'de> for ValidPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ValidPathVisitor;
        impl Visitor<'_> for ValidPathVisitor {
            type Value = ValidPath;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a valid path")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ValidPath(
                    PathBuf::from(v).canonicalize().map_err(E::custom)?,
                ))
            }
        }

        deserializer.deserialize_str(ValidPathVisitor)
    }
}

impl Deref for ValidPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.0.as_path()
    }
}
