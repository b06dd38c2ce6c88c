//! Markdown rendering through the site's component table
//!
//! Headings, links, inline code and paragraphs are not emitted with the
//! default markup. Each of them is looked up in a fixed table keyed by
//! [`NodeKind`] and rendered by the matching component, which receives the
//! node's already rendered children. Everything else goes through
//! pulldown-cmark's HTML writer unchanged, except fenced code blocks which
//! are highlighted with syntect.

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::html_escape;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

const HEADING_MARK: &str = "before:content-['#'] before:-ml-5 before:w-5 before:inline-block \
before:font-light before:text-rose-600 before:dark:text-cyan-400";

const INLINE_CODE_CLASS: &str = "font-mono text-sm text-rose-600 dark:text-cyan-400 px-1 py-0.5";

/// Content nodes that have their own component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading(HeadingLevel),
    Link,
    InlineCode,
    Paragraph,
}

impl NodeKind {
    fn of(tag: &Tag) -> Option<Self> {
        match tag {
            Tag::Heading { level, .. } => Some(NodeKind::Heading(*level)),
            Tag::Link { .. } => Some(NodeKind::Link),
            Tag::Paragraph => Some(NodeKind::Paragraph),
            _ => None,
        }
    }

    fn closes(end: &TagEnd) -> bool {
        matches!(end, TagEnd::Heading(_) | TagEnd::Link | TagEnd::Paragraph)
    }

    fn is_block(self) -> bool {
        matches!(self, NodeKind::Heading(_) | NodeKind::Paragraph)
    }
}

/// Attributes a component may use
#[derive(Debug, Clone, Default)]
pub struct NodeProps {
    pub href: Option<String>,
    pub title: Option<String>,
    pub id: Option<String>,
}

impl NodeProps {
    fn of(tag: &Tag) -> Self {
        match tag {
            Tag::Heading { id, .. } => Self {
                id: id.as_ref().map(|id| id.to_string()),
                ..Default::default()
            },
            Tag::Link {
                dest_url, title, ..
            } => Self {
                href: Some(dest_url.to_string()),
                title: Some(title.to_string()).filter(|t| !t.is_empty()),
                ..Default::default()
            },
            _ => Self::default(),
        }
    }
}

/// Renders one node around its rendered children
pub type Component = fn(&NodeProps, &str) -> String;

/// The component table
pub fn component(kind: NodeKind) -> Component {
    match kind {
        NodeKind::Heading(HeadingLevel::H1) => heading1,
        NodeKind::Heading(HeadingLevel::H2) => heading2,
        NodeKind::Heading(HeadingLevel::H3) => heading3,
        NodeKind::Heading(HeadingLevel::H4 | HeadingLevel::H5 | HeadingLevel::H6) => heading4,
        NodeKind::Link => link,
        NodeKind::InlineCode => inline_code,
        NodeKind::Paragraph => paragraph,
    }
}

fn heading(tag: &str, size: &str, props: &NodeProps, children: &str) -> String {
    let id = props
        .id
        .as_deref()
        .map(|id| format!(r#" id="{}""#, html_escape(id)))
        .unwrap_or_default();
    format!(
        r#"<{tag}{id} class="{HEADING_MARK} font-bold mt-4 mb-2 {size} leading-7">{children}</{tag}>"#
    )
}

fn heading1(props: &NodeProps, children: &str) -> String {
    heading("h1", "text-2xl", props, children)
}

fn heading2(props: &NodeProps, children: &str) -> String {
    heading("h2", "text-xl", props, children)
}

fn heading3(props: &NodeProps, children: &str) -> String {
    heading("h3", "text-lg", props, children)
}

fn heading4(props: &NodeProps, children: &str) -> String {
    heading("h4", "text-md", props, children)
}

fn link(props: &NodeProps, children: &str) -> String {
    let href = html_escape(props.href.as_deref().unwrap_or_default());
    match props.title.as_deref() {
        Some(title) => format!(
            r#"<a href="{}" title="{}">{}</a>"#,
            href,
            html_escape(title),
            children
        ),
        None => format!(r#"<a href="{}">{}</a>"#, href, children),
    }
}

fn inline_code(_props: &NodeProps, children: &str) -> String {
    format!(r#"<code class="{INLINE_CODE_CLASS}">{children}</code>"#)
}

fn paragraph(_props: &NodeProps, children: &str) -> String {
    format!(r#"<p class="my-2">{children}</p>"#)
}

/// A mapped node whose children are still being collected
struct Frame<'a> {
    kind: NodeKind,
    props: NodeProps,
    events: Vec<Event<'a>>,
}

impl Frame<'_> {
    fn finish(self) -> Event<'static> {
        let mut children = String::new();
        html::push_html(&mut children, self.events.into_iter());
        let rendered = component(self.kind)(&self.props, &children);
        if self.kind.is_block() {
            Event::Html(CowStr::from(rendered + "\n"))
        } else {
            Event::InlineHtml(CowStr::from(rendered))
        }
    }
}

/// Markdown renderer with the component table and syntax highlighting
pub struct MarkdownRenderer {
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme("base16-ocean.dark")
    }

    /// Create with a specific syntect theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            theme_name: theme.to_string(),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut root: Vec<Event> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            if let Some((lang, code)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(code, lang.as_deref());
                        code_block = None;
                        emit(&mut stack, &mut root, Event::Html(CowStr::from(highlighted)));
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(tag) => match NodeKind::of(&tag) {
                    Some(kind) => stack.push(Frame {
                        kind,
                        props: NodeProps::of(&tag),
                        events: Vec::new(),
                    }),
                    None => emit(&mut stack, &mut root, Event::Start(tag)),
                },
                Event::End(end) if NodeKind::closes(&end) => {
                    if let Some(frame) = stack.pop() {
                        let rendered = frame.finish();
                        emit(&mut stack, &mut root, rendered);
                    }
                }
                Event::Code(text) => {
                    let rendered =
                        component(NodeKind::InlineCode)(&NodeProps::default(), &html_escape(&text));
                    emit(&mut stack, &mut root, Event::InlineHtml(CowStr::from(rendered)));
                }
                other => emit(&mut stack, &mut root, other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, root.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = SYNTAX_SET
            .find_syntax_by_token(lang)
            .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

        let highlighted = THEME_SET
            .themes
            .get(&self.theme_name)
            .and_then(|theme| highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme).ok());

        match highlighted {
            Some(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                html_escape(lang),
                highlighted
            ),
            None => {
                tracing::debug!("No highlighting for {:?}, emitting plain block", lang);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    html_escape(lang),
                    html_escape(code)
                )
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Append to the innermost open frame, or to the document
fn emit<'a>(stack: &mut [Frame<'a>], root: &mut Vec<Event<'a>>, event: Event<'a>) {
    match stack.last_mut() {
        Some(frame) => frame.events.push(event),
        None => root.push(event),
    }
}
