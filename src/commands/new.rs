//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create a new draft post and return its path
pub fn create_post(site: &Site, title: &str, lang: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Utc::now().with_timezone(&site.tz);

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site.content_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let lang = lang.unwrap_or(&site.config.language);
    let content = format!(
        "---\ntitle: {}\ndate: {}\nsummary: \"\"\nlang: {}\ndraft: true\n---\n",
        serde_yaml::to_string(title)?.trim_end(),
        now.format("%Y-%m-%d %H:%M:%S"),
        lang
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use tempfile::TempDir;

    #[test]
    fn test_create_post_is_a_loadable_draft() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_post(&site, "Hello: World", Some("zh-CN")).unwrap();
        assert!(path.ends_with("content/posts/hello-world.md"));

        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hello: World");
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(posts[0].lang, "zh-CN");
        assert!(posts[0].draft);
    }

    #[test]
    fn test_create_post_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        create_post(&site, "Twice", None).unwrap();
        assert!(create_post(&site, "Twice", None).is_err());
    }
}
