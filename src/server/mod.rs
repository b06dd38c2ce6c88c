//! HTTP server: listings, post pages, the RSS feed and static assets

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, PostRecord};
use crate::projection::{project_feed, project_listing, PostFilter};
use crate::{views, Site};

/// Site and posts the handlers serve, replaced together on reload
struct Snapshot {
    site: Site,
    posts: Vec<PostRecord>,
}

/// Server state
pub struct ServerState {
    base_dir: PathBuf,
    snapshot: RwLock<Snapshot>,
    renderer: MarkdownRenderer,
}

impl ServerState {
    pub fn new(site: Site, posts: Vec<PostRecord>) -> Self {
        Self {
            base_dir: site.base_dir.clone(),
            snapshot: RwLock::new(Snapshot { site, posts }),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Re-read `_config.yml` and the content. On failure the current
    /// snapshot keeps serving.
    pub fn reload(&self) -> Result<()> {
        let site = Site::new(&self.base_dir)?;
        let posts = site.load_posts()?;
        tracing::info!("Reloaded {} posts", posts.len());

        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        if site.config.feed_route() != guard.site.config.feed_route() {
            tracing::warn!("feed_path changed, restart the server to move the feed");
        }
        *guard = Snapshot { site, posts };
        Ok(())
    }

    fn snapshot(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    let feed_route = state.snapshot().site.config.feed_route();

    Router::new()
        .route("/", get(index_handler))
        .route("/lang/:lang", get(lang_handler))
        .route("/post/:slug", get(post_handler))
        .route(&feed_route, get(feed_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let posts = site.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());
    let state = Arc::new(ServerState::new(site.clone(), posts));
    let app = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let site = site.clone();
        tokio::task::spawn_blocking(move || {
            let result = crate::commands::generate::watch(&site, || state.reload());
            if let Err(e) = result {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct ListingQuery {
    lang: Option<String>,
}

/// GET /, optionally narrowed with ?lang=
async fn index_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListingQuery>,
) -> Html<String> {
    let filter = PostFilter::from_lang(query.lang.as_deref());
    render_listing(&state, &filter)
}

/// GET /lang/:lang
async fn lang_handler(
    State(state): State<Arc<ServerState>>,
    Path(lang): Path<String>,
) -> Html<String> {
    let filter = PostFilter::from_lang(Some(&lang));
    render_listing(&state, &filter)
}

fn render_listing(state: &ServerState, filter: &PostFilter) -> Html<String> {
    let snapshot = state.snapshot();
    let listing = project_listing(&snapshot.posts, filter);
    Html(views::render_index(&snapshot.site.config, &listing, filter))
}

/// GET /post/:slug
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let snapshot = state.snapshot();
    let listing = project_listing(&snapshot.posts, &PostFilter::All);

    let Some(post) = listing.iter().find(|p| p.slug == slug) else {
        tracing::debug!("No visible post {:?}", slug);
        return not_found(&snapshot.site.config);
    };

    let content = state.renderer.render(&post.body);
    Html(views::render_post(
        &snapshot.site.config,
        post,
        &content,
        post.prev(&listing),
        post.next(&listing),
    ))
    .into_response()
}

/// GET <feed_path>
async fn feed_handler(State(state): State<Arc<ServerState>>) -> Response {
    let snapshot = state.snapshot();
    let feed = project_feed(&snapshot.posts, &snapshot.site.config);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        feed,
    )
        .into_response()
}

/// Fallback handler that serves static assets
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let static_dir = state.snapshot().site.static_dir.clone();
    let mut service = ServeDir::new(static_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => {
            not_found(&state.snapshot().site.config)
        }
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to serve static file: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn not_found(config: &SiteConfig) -> Response {
    (StatusCode::NOT_FOUND, Html(views::render_not_found(config)))
        .into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
