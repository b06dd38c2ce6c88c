//! Site configuration (_config.yml)

use anyhow::{anyhow, bail, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::feed::FeedMetadata;
use crate::projection::PostFilter;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,
    pub date_format: String,

    // URL
    pub url: String,
    pub feed_path: String,

    // Directory
    pub content_dir: String,
    pub content_index: Option<String>,
    pub public_dir: String,
    pub static_dir: String,

    // Home page
    pub tabs: Vec<TabConfig>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Skyward".to_string(),
            description: "Beyond awesome.".to_string(),
            author: String::new(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            date_format: "MMMM DD, YYYY".to_string(),

            url: "https://www.skyward.moe".to_string(),
            feed_path: "/feed".to_string(),

            content_dir: "content/posts".to_string(),
            content_index: None,
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            tabs: TabConfig::defaults(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the site cannot be built with
    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        if self.feed_route() == "/" {
            bail!("feed_path {:?} would replace the home page", self.feed_path);
        }
        Ok(())
    }

    /// Timezone used for dates written without an offset
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone {:?}: {}", self.timezone, e))
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Feed path, always rooted
    pub fn feed_route(&self) -> String {
        format!("/{}", self.feed_path.trim_start_matches('/'))
    }

    /// Channel-level metadata for the syndication feed
    pub fn feed_metadata(&self) -> FeedMetadata {
        FeedMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            feed_url: format!("{}{}", self.base_url(), self.feed_route()),
            site_url: self.base_url().to_string(),
            language: self.language.clone(),
        }
    }
}

/// A listing tab on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabConfig {
    pub title: String,
    #[serde(default)]
    pub lang: Option<String>,
}

impl TabConfig {
    fn defaults() -> Vec<TabConfig> {
        vec![
            TabConfig {
                title: "All".to_string(),
                lang: None,
            },
            TabConfig {
                title: "En".to_string(),
                lang: Some("en".to_string()),
            },
            TabConfig {
                title: "中".to_string(),
                lang: Some("zh-CN".to_string()),
            },
        ]
    }

    pub fn filter(&self) -> PostFilter {
        match &self.lang {
            Some(lang) => PostFilter::Lang(lang.clone()),
            None => PostFilter::All,
        }
    }
}
