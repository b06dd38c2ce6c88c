//! HTML helper functions

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to("/post/hello", "Hello", None) // -> <a href="/post/hello">Hello</a>
/// ```
pub fn link_to(href: &str, text: &str, class: Option<&str>) -> String {
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, html_escape(c)))
        .unwrap_or_default();
    format!(
        r#"<a href="{}"{}>{}</a>"#,
        html_escape(href),
        class_attr,
        html_escape(text)
    )
}

/// Generate a feed/RSS link tag
pub fn feed_tag(href: &str, title: &str) -> String {
    format!(
        r#"<link rel="alternate" href="{}" title="{}" type="application/rss+xml">"#,
        html_escape(href),
        html_escape(title)
    )
}

/// Generate Open Graph meta tags
pub fn open_graph(title: &str, description: &str, url: &str, site_name: &str) -> String {
    let mut tags = vec![
        r#"<meta property="og:type" content="article">"#.to_string(),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(title)
        ),
        format!(r#"<meta property="og:url" content="{}">"#, html_escape(url)),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            html_escape(site_name)
        ),
    ];

    if !description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            html_escape(description)
        ));
    }

    tags.join("\n")
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="skyward {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_to() {
        assert_eq!(link_to("/post/a", "A & B", None), r#"<a href="/post/a">A &amp; B</a>"#);
        assert!(link_to("/", "Home", Some("nav")).contains(r#"class="nav""#));
    }

    #[test]
    fn test_open_graph_skips_empty_description() {
        let tags = open_graph("T", "", "https://x.test/post/t", "Site");
        assert!(!tags.contains("og:description"));
        assert!(tags.contains(r#"content="https://x.test/post/t""#));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
