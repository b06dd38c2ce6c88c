//! skyward: a small blog front-end
//!
//! Loads posts from markdown files (or a generated JSON index), projects
//! them into newest-first listings and an RSS feed, and serves or writes
//! the result as a static site.

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod projection;
pub mod server;
pub mod views;

use anyhow::Result;
use chrono_tz::Tz;
use std::path::Path;

/// The main site application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Timezone for dates without an offset
    pub tz: Tz,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content (markdown posts) directory
    pub content_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets directory
    pub static_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let tz = config.tz()?;
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            tz,
            base_dir,
            content_dir,
            public_dir,
            static_dir,
        })
    }

    /// Load the full post collection
    pub fn load_posts(&self) -> Result<Vec<content::PostRecord>> {
        Ok(content::ContentLoader::new(self).load()?)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, lang: Option<&str>) -> Result<std::path::PathBuf> {
        commands::new::create_post(self, title, lang)
    }
}
