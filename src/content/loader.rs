//! Content loader - loads posts from the content directory or a JSON index

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{ContentError, FrontMatter, PostRecord};
use crate::Site;

/// Loads the full post collection
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load every post, from the configured index if there is one,
    /// otherwise from the markdown files under the content directory
    pub fn load(&self) -> Result<Vec<PostRecord>, ContentError> {
        match &self.site.config.content_index {
            Some(index) => self.load_index(&self.site.base_dir.join(index)),
            None => self.load_posts(),
        }
    }

    /// Load all posts from the content directory
    pub fn load_posts(&self) -> Result<Vec<PostRecord>, ContentError> {
        let content_dir = &self.site.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(content_dir).follow_links(true) {
            let entry = entry.map_err(|e| ContentError::Io {
                path: e.path().unwrap_or(content_dir.as_path()).to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.into_path();
            if path.is_file() && is_markdown_file(&path) {
                paths.push(path);
            }
        }
        // Directory order is platform dependent; keep the collection stable
        paths.sort();

        let mut posts = Vec::with_capacity(paths.len());
        let mut slugs = SlugRegistry::default();
        for path in paths {
            let (origin, post) = self.load_post(&path)?;
            slugs.claim(&post.slug, &origin)?;
            posts.push(post);
        }

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), content_dir);
        Ok(posts)
    }

    /// Load a single post from a file, along with its origin
    fn load_post(&self, path: &Path) -> Result<(String, PostRecord), ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let origin = path
            .strip_prefix(&self.site.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let (fm, body) = FrontMatter::parse(&origin, &content)?;

        // A post at `name/index.md` takes its slug from the directory
        let stem = path.file_stem().and_then(|s| s.to_str());
        let fallback_slug = match stem {
            Some("index") => path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str()),
            other => other,
        };

        let post = fm.into_record(
            &origin,
            fallback_slug,
            &self.site.config.language,
            self.site.tz,
            body.to_string(),
        )?;
        Ok((origin, post))
    }

    /// Load posts from a generated JSON index: an array of objects with the
    /// front-matter fields plus an optional `body`
    pub fn load_index(&self, path: &Path) -> Result<Vec<PostRecord>, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<FrontMatter> =
            serde_json::from_str(&content).map_err(|source| ContentError::Index {
                path: path.to_path_buf(),
                source,
            })?;

        let mut posts = Vec::with_capacity(entries.len());
        let mut slugs = SlugRegistry::default();
        for (i, mut entry) in entries.into_iter().enumerate() {
            let origin = format!("{}[{}]", path.display(), i);
            let body = entry
                .extra
                .remove("body")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            let post = entry.into_record(
                &origin,
                None,
                &self.site.config.language,
                self.site.tz,
                body,
            )?;
            slugs.claim(&post.slug, &origin)?;
            posts.push(post);
        }

        tracing::debug!("Loaded {} posts from index {:?}", posts.len(), path);
        Ok(posts)
    }
}

/// Slugs seen so far and where they came from
#[derive(Default)]
struct SlugRegistry {
    seen: HashMap<String, String>,
}

impl SlugRegistry {
    fn claim(&mut self, slug: &str, origin: &str) -> Result<(), ContentError> {
        if let Some(first) = self.seen.get(slug) {
            return Err(ContentError::DuplicateSlug {
                slug: slug.to_string(),
                first: first.clone(),
                second: origin.to_string(),
            });
        }
        self.seen.insert(slug.to_string(), origin.to_string());
        Ok(())
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "mdx" || e == "markdown")
        .unwrap_or(false)
}
