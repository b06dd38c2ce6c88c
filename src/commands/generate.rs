//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::new_debouncer;
use notify_debouncer_mini::notify::RecursiveMode;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::Generator;
use crate::Site;

/// Generate the static site
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let posts = site.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let stats = Generator::new(site).generate(&posts)?;
    tracing::info!(
        "Wrote {} listings, {} posts and {} assets",
        stats.listings,
        stats.posts,
        stats.assets
    );

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Re-read `_config.yml` and the content, then generate again
pub fn rebuild(base_dir: &Path) -> Result<()> {
    run(&Site::new(base_dir)?)
}

/// Paths whose changes invalidate the loaded content
fn watched_paths(site: &Site) -> Vec<(PathBuf, RecursiveMode)> {
    let mut paths = vec![
        (site.content_dir.clone(), RecursiveMode::Recursive),
        (site.static_dir.clone(), RecursiveMode::Recursive),
        (site.base_dir.join("_config.yml"), RecursiveMode::NonRecursive),
    ];
    if let Some(index) = &site.config.content_index {
        paths.push((site.base_dir.join(index), RecursiveMode::NonRecursive));
    }
    paths.into_iter().filter(|(p, _)| p.exists()).collect()
}

/// Block and call `on_change` whenever the site's sources change
pub fn watch<F>(site: &Site, mut on_change: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    let (tx, rx) = channel();

    // Debounce to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    for (path, mode) in watched_paths(site) {
        debouncer.watcher().watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                for event in &events {
                    tracing::info!("File changed: {}", event.path.display());
                }
                if let Err(e) = on_change() {
                    tracing::error!("Rebuild failed: {:#}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_generates_from_content_dir() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-01\nsummary: First\n---\nHi there.\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        run(&site).unwrap();

        let feed = fs::read_to_string(dir.path().join("public/feed")).unwrap();
        assert!(feed.contains("<title>Hello</title>"));
        assert!(feed.contains("<description>First</description>"));
        assert!(dir.path().join("public/post/hello/index.html").exists());
    }

    #[test]
    fn test_run_fails_on_bad_content() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("broken.md"), "---\ntitle: No date\n---\n").unwrap();

        let site = Site::new(dir.path()).unwrap();
        let err = run(&site).unwrap_err();
        assert!(format!("{:#}", err).contains("missing date"));
        assert!(!dir.path().join("public").exists());
    }

    #[test]
    fn test_rebuild_picks_up_config_changes() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        run(&site).unwrap();
        let feed = fs::read_to_string(dir.path().join("public/feed")).unwrap();
        assert!(feed.contains("<title>Skyward</title>"));

        fs::write(dir.path().join("_config.yml"), "title: Renamed\n").unwrap();
        rebuild(&site.base_dir).unwrap();
        let feed = fs::read_to_string(dir.path().join("public/feed")).unwrap();
        assert!(feed.contains("<title>Renamed</title>"));
    }

    #[test]
    fn test_watched_paths_skip_missing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content/posts")).unwrap();
        let site = Site::new(dir.path()).unwrap();
        let paths: Vec<_> = watched_paths(&site).into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![site.content_dir.clone()]);
    }
}
