use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{any, get},
};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};
use tokio::sync::broadcast;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use folio_generator::SiteRenderer;

use super::contact::{self, ContactRelay};
use super::routes;
use crate::site::{SiteData, load_site, offline_source, wordpress_source};

pub struct ServeOptions {
    pub path: PathBuf,
    pub host: String,
    pub port: u16,
    pub watch: bool,
    pub offline: bool,
}

/// Shared by every handler. The site can be swapped at runtime when watching.
#[derive(Clone)]
pub struct AppState {
    data: Arc<RwLock<Arc<SiteData>>>,
    relay: ContactRelay,
    reload_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(data: SiteData, relay: ContactRelay) -> Self {
        let (reload_tx, _) = broadcast::channel::<()>(100);
        Self {
            data: Arc::new(RwLock::new(Arc::new(data))),
            relay,
            reload_tx,
        }
    }

    pub fn data(&self) -> Arc<SiteData> {
        match self.data.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn relay(&self) -> &ContactRelay {
        &self.relay
    }

    fn replace(&self, data: SiteData) {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::new(data);
    }
}

/// Build the page data for a site directory
fn site_data(path: &Path, offline: bool, live_reload: bool) -> Result<SiteData> {
    let site = load_site(path)?;
    let source = if offline {
        offline_source()
    } else {
        wordpress_source(&site)?
    };
    let renderer = SiteRenderer::new(Arc::new(site))
        .context("Failed to initialize content pipeline")?
        .with_live_reload(live_reload);
    Ok(SiteData::new(renderer, source))
}

/// Serve the site.
///
/// This command:
/// - Validates and loads site.toml
/// - Renders pages per request from site.toml and the CMS
/// - Relays contact form submissions
/// - Serves static files from `public/`
/// - With `--watch`, reloads site.toml and the browser on file changes
pub async fn run(options: ServeOptions) -> Result<()> {
    let ServeOptions {
        path,
        host,
        port,
        watch,
        offline,
    } = options;

    println!("Starting folio server...");
    println!("   Site: {}", path.display());

    let data = site_data(&path, offline, watch)?;
    println!("   ✓ Loaded: {}", data.site().meta.name);
    if offline {
        println!("   ⚠ Offline: blog pages render empty");
    } else {
        println!("   ✓ CMS: {}", data.site().cms.base_url);
    }
    println!("   ✓ Services: {}", data.site().services.len());

    let relay = ContactRelay::new(data.site().contact.endpoint.clone())?;
    let state = AppState::new(data, relay);
    let app = router(state.clone(), &path.join("public"), watch);

    if watch {
        let watcher_state = state.clone();
        let watcher_path = path.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_files(watcher_path, watcher_state, offline).await {
                error!(error = %e, "File watcher stopped");
            }
        });
    }

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, watch, "Server listening");
    println!("\n🚀 Serving at: http://{}", addr);
    println!("   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Every page route, static files from `public_dir`, and a 404 fallback
pub fn router(state: AppState, public_dir: &Path, live_reload: bool) -> Router {
    let not_found = any(routes::not_found).with_state(state.clone());
    let panic_state = state.clone();

    let mut app = Router::new()
        .route("/", get(routes::home))
        .route("/about", get(routes::about))
        .route("/services", get(routes::services))
        .route("/services/{slug}", get(routes::service))
        .route("/projects", get(routes::projects))
        .route("/projects/category/{category}", get(routes::project_category))
        .route("/projects/{slug}", get(routes::project))
        .route("/blog", get(routes::blog))
        .route("/blog/page/{page}", get(routes::blog_page))
        .route("/blog/tag/{slug}", get(routes::tag))
        .route("/blog/tag/{slug}/page/{page}", get(routes::tag_page))
        .route("/blog/category/{slug}", get(routes::category))
        .route("/blog/category/{slug}/page/{page}", get(routes::category_page))
        .route("/blog/{slug}", get(routes::post))
        .route("/contact", get(routes::contact).post(contact::submit))
        .route("/sitemap.xml", get(routes::sitemap))
        .route("/robots.txt", get(routes::robots));

    if live_reload {
        app = app.route("/_reload", get(sse_handler));
    }

    app.fallback_service(ServeDir::new(public_dir).not_found_service(not_found))
        .layer(CatchPanicLayer::custom(move |_: Box<dyn std::any::Any + Send>| {
            error_page(&panic_state)
        }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A handler panicked: answer with the generic error page
fn error_page(state: &AppState) -> Response {
    error!("Request handler panicked");
    let body = state.data().renderer().error("/");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [
            (CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8")),
            (
                axum::http::header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ),
        ],
        body,
    )
        .into_response()
}

/// Watch the site directory. site.toml changes reload the site; any change
/// tells connected browsers to refresh.
async fn watch_files(path: PathBuf, state: AppState, offline: bool) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;
    info!(path = %path.display(), "Watching for changes");

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                let relevant: Vec<&PathBuf> = event
                    .paths
                    .iter()
                    .filter(|p| {
                        let filename = p.file_name().unwrap_or_default().to_string_lossy();
                        !filename.starts_with('.') && !filename.ends_with('~')
                    })
                    .collect();
                if relevant.is_empty() {
                    continue;
                }

                if relevant.iter().any(|p| p.ends_with("site.toml")) {
                    match site_data(&path, offline, true) {
                        Ok(data) => {
                            state.replace(data);
                            info!("Reloaded site.toml");
                        }
                        Err(e) => {
                            // Keep serving the last good configuration
                            error!(error = %format!("{:#}", e), "site.toml reload failed");
                            continue;
                        }
                    }
                }

                println!("   📝 File changed, reloading...");
                let _ = state.reload_tx.send(());
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for live reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(()) => yield Ok(Event::default().data("reload")),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
