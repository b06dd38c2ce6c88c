//! List site content

use anyhow::Result;

use crate::helpers::format_date;
use crate::projection::{project_listing, PostFilter};
use crate::Site;

/// Print the visible posts, newest first
pub fn run(site: &Site, lang: Option<&str>) -> Result<()> {
    let posts = site.load_posts()?;
    let filter = PostFilter::from_lang(lang);
    let listing = project_listing(&posts, &filter);

    println!("Posts ({}):", listing.len());
    for line in format_lines(&listing) {
        println!("{}", line);
    }

    let excluded = posts.iter().filter(|p| !p.is_visible()).count();
    if excluded > 0 {
        tracing::info!("{} drafts or hidden posts not listed", excluded);
    }

    Ok(())
}

fn format_lines(posts: &[&crate::content::PostRecord]) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            format!(
                "  {} - {} [{}] ({})",
                format_date(&post.date, "YYYY-MM-DD"),
                post.title,
                post.slug,
                post.lang
            )
        })
        .collect()
}
