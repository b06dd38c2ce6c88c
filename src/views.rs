//! HTML views: the post listing with its language tabs, post pages and the
//! not-found page

use crate::config::{SiteConfig, TabConfig};
use crate::content::PostRecord;
use crate::helpers::{feed_tag, html_escape, link_to, meta_generator, open_graph, time_tag};
use crate::projection::PostFilter;

/// Site-relative path of a listing tab
pub fn tab_path(filter: &PostFilter) -> String {
    match filter.lang() {
        Some(lang) => format!("/lang/{}", lang),
        None => "/".to_string(),
    }
}

/// Render the home page listing for one tab
pub fn render_index(config: &SiteConfig, posts: &[&PostRecord], active: &PostFilter) -> String {
    let mut body = String::new();
    body.push_str(r#"<div class="flex justify-between items-center">"#);
    body.push_str(&format!(
        r#"<h1 class="my-4 font-bold text-3xl">{}</h1>"#,
        html_escape(&config.title)
    ));
    body.push_str(&render_tabs(&config.tabs, active));
    body.push_str("</div>\n");

    body.push_str(r#"<div class="py-4">"#);
    body.push('\n');
    if posts.is_empty() {
        body.push_str(r#"<p class="my-2">No posts yet.</p>"#);
        body.push('\n');
    }
    for post in posts {
        body.push_str(&render_card(config, post));
    }
    body.push_str("</div>\n");

    layout(config, &config.title, "", &body)
}

fn render_tabs(tabs: &[TabConfig], active: &PostFilter) -> String {
    let mut html = String::from(r#"<nav class="flex space-x-1 rounded-xl bg-blue-900 p-1">"#);
    for tab in tabs {
        let filter = tab.filter();
        let class = if filter == *active {
            "tab tab-selected"
        } else {
            "tab"
        };
        html.push_str(&link_to(&tab_path(&filter), &tab.title, Some(class)));
    }
    html.push_str("</nav>");
    html
}

/// A post card in a listing
fn render_card(config: &SiteConfig, post: &PostRecord) -> String {
    let mut card = format!(
        r#"<article class="post-card" lang="{}">"#,
        html_escape(&post.lang)
    );
    card.push_str(&format!(
        r#"<h2 class="font-bold text-xl">{}</h2>"#,
        link_to(&post.path(), &post.title, None)
    ));
    card.push_str(&time_tag(&post.date, &config.date_format));
    if let Some(summary) = post.summary.as_deref().filter(|s| !s.is_empty()) {
        card.push_str(&format!(r#"<p class="my-2">{}</p>"#, html_escape(summary)));
    }
    card.push_str("</article>\n");
    card
}

/// Render a post page. `content` is the post body already rendered to HTML.
pub fn render_post(
    config: &SiteConfig,
    post: &PostRecord,
    content: &str,
    newer: Option<&PostRecord>,
    older: Option<&PostRecord>,
) -> String {
    let mut body = format!(r#"<article lang="{}">"#, html_escape(&post.lang));
    body.push_str(&format!(
        r#"<h1 class="my-4 font-bold text-3xl">{}</h1>"#,
        html_escape(&post.title)
    ));
    body.push_str(&time_tag(&post.date, &config.date_format));
    body.push_str(r#"<div class="post-content">"#);
    body.push('\n');
    body.push_str(content);
    body.push_str("</div></article>\n");

    if newer.is_some() || older.is_some() {
        body.push_str(r#"<nav class="pager">"#);
        if let Some(newer) = newer {
            body.push_str(&link_to(&newer.path(), &newer.title, Some("newer")));
        }
        if let Some(older) = older {
            body.push_str(&link_to(&older.path(), &older.title, Some("older")));
        }
        body.push_str("</nav>\n");
    }

    let head = open_graph(
        &post.title,
        post.summary.as_deref().unwrap_or_default(),
        &post.permalink(config.base_url()),
        &config.title,
    );
    let title = format!("{} | {}", post.title, config.title);
    layout(config, &title, &head, &body)
}

/// Render the not-found page
pub fn render_not_found(config: &SiteConfig) -> String {
    let body = format!(
        r#"<h1 class="my-4 font-bold text-3xl">Not found</h1><p class="my-2">{}</p>"#,
        link_to("/", "Back to all posts", None)
    );
    layout(config, &format!("Not found | {}", config.title), "", &body)
}

fn layout(config: &SiteConfig, title: &str, extra_head: &str, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!(r#"<html lang="{}">"#, html_escape(&config.language)));
    html.push_str("\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    html.push('\n');
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    if !config.description.is_empty() {
        html.push_str(&format!(
            r#"<meta name="description" content="{}">"#,
            html_escape(&config.description)
        ));
        html.push('\n');
    }
    html.push_str(&meta_generator());
    html.push('\n');
    html.push_str(&feed_tag(&config.feed_route(), &config.title));
    html.push('\n');
    if !extra_head.is_empty() {
        html.push_str(extra_head);
        html.push('\n');
    }
    html.push_str("</head>\n<body>\n<main class=\"container mx-auto\">\n");
    html.push_str(body);
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn post(slug: &str, lang: &str) -> PostRecord {
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
            .unwrap();
        PostRecord::new(slug, &format!("Title {}", slug), date, lang)
    }

    #[test]
    fn test_tab_path() {
        assert_eq!(tab_path(&PostFilter::All), "/");
        assert_eq!(tab_path(&PostFilter::Lang("zh-CN".to_string())), "/lang/zh-CN");
    }

    #[test]
    fn test_index_lists_cards_in_given_order() {
        let config = SiteConfig::default();
        let mut b = post("b", "zh-CN");
        b.summary = Some("Second <post>".to_string());
        let a = post("a", "en");
        let html = render_index(&config, &[&b, &a], &PostFilter::All);

        let pos_b = html.find(r#"href="/post/b""#).unwrap();
        let pos_a = html.find(r#"href="/post/a""#).unwrap();
        assert!(pos_b < pos_a);
        assert!(html.contains("Second &lt;post&gt;"));
        assert!(html.contains("March 01, 2024"));
        assert!(html.contains(r#"type="application/rss+xml""#));
    }

    #[test]
    fn test_index_marks_active_tab() {
        let config = SiteConfig::default();
        let html = render_index(&config, &[], &PostFilter::Lang("en".to_string()));
        assert!(html.contains(r#"<a href="/lang/en" class="tab tab-selected">En</a>"#));
        assert!(html.contains(r#"<a href="/" class="tab">All</a>"#));
        assert!(html.contains("No posts yet."));
    }

    #[test]
    fn test_post_page() {
        let config = SiteConfig::default();
        let current = post("current", "en");
        let older = post("older", "en");
        let html = render_post(&config, &current, "<p>body</p>", None, Some(&older));
        assert!(html.contains("<title>Title current | Skyward</title>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains(r#"<a href="/post/older" class="older">Title older</a>"#));
        assert!(!html.contains("class=\"newer\""));
        assert!(html.contains("https://www.skyward.moe/post/current"));
    }

    #[test]
    fn test_not_found_page() {
        let html = render_not_found(&SiteConfig::default());
        assert!(html.contains("Not found"));
    }
}
