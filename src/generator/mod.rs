//! Generator module - writes the site as static files

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::{MarkdownRenderer, PostRecord};
use crate::projection::{project_feed, project_listing, PostFilter};
use crate::views;
use crate::Site;

/// What a generation run wrote
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateStats {
    pub listings: usize,
    pub posts: usize,
    pub assets: usize,
}

/// Static site generator
pub struct Generator {
    site: Site,
    renderer: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Self {
        Self {
            site: site.clone(),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[PostRecord]) -> Result<GenerateStats> {
        fs::create_dir_all(&self.site.public_dir)?;

        let mut stats = GenerateStats {
            assets: self.copy_static_assets()?,
            ..Default::default()
        };

        // Generate listing pages, one per tab
        let mut filters = vec![PostFilter::All];
        for tab in &self.site.config.tabs {
            let filter = tab.filter();
            if !filters.contains(&filter) {
                filters.push(filter);
            }
        }
        for filter in &filters {
            self.generate_listing(posts, filter)?;
            stats.listings += 1;
        }

        // Generate post pages
        stats.posts = self.generate_post_pages(posts)?;

        // Generate RSS feed
        self.generate_feed(posts)?;

        let not_found = views::render_not_found(&self.site.config);
        fs::write(self.site.public_dir.join("404.html"), not_found)?;

        Ok(stats)
    }

    /// Generate one listing page
    fn generate_listing(&self, posts: &[PostRecord], filter: &PostFilter) -> Result<()> {
        let listing = project_listing(posts, filter);
        let html = views::render_index(&self.site.config, &listing, filter);

        let output_path = self.output_path(&views::tab_path(filter)).join("index.html");
        write_file(&output_path, html)?;
        tracing::debug!("Generated listing {:?} with {} posts", output_path, listing.len());
        Ok(())
    }

    /// Generate a page for every visible post
    fn generate_post_pages(&self, posts: &[PostRecord]) -> Result<usize> {
        let listing = project_listing(posts, &PostFilter::All);

        for post in &listing {
            let content = self.renderer.render(&post.body);
            let html = views::render_post(
                &self.site.config,
                post,
                &content,
                post.prev(&listing),
                post.next(&listing),
            );
            let output_path = self.output_path(&post.path()).join("index.html");
            write_file(&output_path, html)?;
        }

        tracing::info!("Generated {} post pages", listing.len());
        Ok(listing.len())
    }

    /// Generate the RSS feed at the configured path
    fn generate_feed(&self, posts: &[PostRecord]) -> Result<()> {
        let feed = project_feed(posts, &self.site.config);
        let output_path = self.output_path(&self.site.config.feed_route());

        // A feed path without an extension is also written as .xml for hosts
        // that pick the content type from the file name
        if output_path.extension().is_none() {
            write_file(&output_path.with_extension("xml"), feed.clone())?;
        }
        write_file(&output_path, feed)?;
        tracing::info!("Generated feed {:?}", output_path);

        Ok(())
    }

    /// Copy static assets (images, etc.) to the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                let dest = self.site.public_dir.join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
                copied += 1;
            }
        }

        Ok(copied)
    }

    /// Map a site path to a location under the public directory
    fn output_path(&self, site_path: &str) -> PathBuf {
        let relative = site_path.trim_matches('/');
        if relative.is_empty() {
            self.site.public_dir.clone()
        } else {
            self.site.public_dir.join(relative)
        }
    }
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use tempfile::TempDir;

    fn post(slug: &str, day: u32, lang: &str) -> PostRecord {
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, day, 0, 0, 0)
            .unwrap();
        let mut p = PostRecord::new(slug, slug, date, lang);
        p.body = format!("# {}\n\nHello from `{}`.", slug, slug);
        p
    }

    #[test]
    fn test_generate_site() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("static/images")).unwrap();
        fs::write(dir.path().join("static/images/logo.png"), b"png").unwrap();
        let site = Site::new(dir.path()).unwrap();

        let mut draft = post("draft", 4, "en");
        draft.draft = true;
        let mut hidden = post("hidden", 5, "en");
        hidden.hidden = true;
        let posts = vec![post("first", 1, "en"), post("second", 2, "zh-CN"), draft, hidden];

        let stats = Generator::new(&site).generate(&posts).unwrap();
        assert_eq!(
            stats,
            GenerateStats {
                listings: 3,
                posts: 2,
                assets: 1
            }
        );

        let public = dir.path().join("public");
        assert!(public.join("index.html").exists());
        assert!(public.join("lang/en/index.html").exists());
        assert!(public.join("lang/zh-CN/index.html").exists());
        assert!(public.join("post/first/index.html").exists());
        assert!(public.join("post/second/index.html").exists());
        assert!(!public.join("post/draft").exists());
        assert!(!public.join("post/hidden").exists());
        assert!(public.join("images/logo.png").exists());
        assert!(public.join("404.html").exists());

        let en = fs::read_to_string(public.join("lang/en/index.html")).unwrap();
        assert!(en.contains("/post/first"));
        assert!(!en.contains("/post/second"));

        let page = fs::read_to_string(public.join("post/first/index.html")).unwrap();
        assert!(page.contains("text-2xl leading-7\">first</h1>"));
        assert!(page.contains(r#"<a href="/post/second" class="newer">second</a>"#));

        let feed = fs::read_to_string(public.join("feed")).unwrap();
        assert_eq!(feed, fs::read_to_string(public.join("feed.xml")).unwrap());
        assert_eq!(feed.matches("<item>").count(), 2);
        let second = feed.find("/post/second").unwrap();
        let first = feed.find("/post/first").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_root_feed_path_never_reaches_generation() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "feed_path: /\n").unwrap();
        assert!(Site::new(dir.path()).is_err());
        assert!(!dir.path().join("public").exists());
        assert!(!dir.path().join("public.xml").exists());
    }

    #[test]
    fn test_generate_empty_site() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let stats = Generator::new(&site).generate(&[]).unwrap();
        assert_eq!(stats.posts, 0);

        let feed = fs::read_to_string(dir.path().join("public/feed")).unwrap();
        assert!(feed.contains("<channel>"));
        assert!(!feed.contains("<item>"));
    }
}
