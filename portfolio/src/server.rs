use crate::about::AboutStats;
use crate::config::ConfigError;
use crate::contact::{ContactForm, ContactReply};
use crate::database::CacheMirror;
use crate::detail::{DetailPage, DetailResolver, DetailState, DetailView, ProjectCard};
use crate::error::AppError;
use crate::gallery::{Gallery, Viewport};
use crate::models::Collection;
use crate::profile::{Profile, PROFILE};
use crate::state::{AppState, StateError};
use crate::typing::{Frame, Typewriter};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

pub const DEFAULT_TYPEWRITER_STEPS: usize = 60;
pub const MAX_TYPEWRITER_STEPS: usize = 1000;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// API routes plus the SPA bundle in `static_dir`. The landing route and
/// detail routes answer with the SPA entry document.
pub fn router(app_state: AppState, static_dir: &std::path::Path) -> Router {
    let index = static_dir.join("index.html");
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(&index));

    Router::new()
        .route("/api/collections/:name", get(collection_page))
        .route("/api/collections/:name/snapshot", get(collection_snapshot))
        .route("/api/projects/:id", get(project_detail))
        .route("/api/about", get(about))
        .route("/api/profile", get(profile))
        .route("/api/typewriter", get(typewriter))
        .route("/api/contact", post(contact))
        .route_service("/", ServeFile::new(&index))
        .route_service("/project/:id", ServeFile::new(&index))
        .fallback_service(spa)
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Binds `addr` and serves `app` in the background, returning the bound address.
pub async fn start_server(app: Router, addr: SocketAddr) -> Result<SocketAddr, ServerError> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;

    info!("Portfolio server started on {local}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Server stopped");
        }
    });

    Ok(local)
}

/// Serves `app` on `addr` until Ctrl+C or SIGTERM.
pub async fn serve(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn parse_collection(name: String) -> Result<Collection, AppError> {
    Collection::parse(&name).ok_or(AppError::UnknownCollection(name))
}

#[derive(Deserialize)]
struct PageQuery {
    width: Option<u32>,
    expanded: Option<bool>,
}

/// Without `expanded` the collection is fetched and mirrored. With it, the
/// request only changes what is shown and is answered from the mirror.
async fn collection_page(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let collection = parse_collection(name)?;
    let viewport = query.width.map(Viewport::new).unwrap_or_default();

    let mirrored = CacheMirror::run_blocking(&state.mirror, move |m| {
        Ok(m.snapshot(collection)?.is_some())
    })
    .await?;

    let mut gallery = Gallery::new(state.store.clone(), state.mirror.clone(), viewport);
    gallery.seed_from_mirror().await?;
    if (query.expanded.is_none() || !mirrored) && gallery.refresh(collection).await.is_err() {
        warn!(%collection, "Serving mirrored snapshot");
    }
    gallery.set_expanded(collection, query.expanded.unwrap_or(false));

    Ok(match collection {
        Collection::Projects => {
            Json(gallery.projects().page().map(ProjectCard::new)).into_response()
        }
        Collection::Certificates => Json(gallery.certificates().page()).into_response(),
    })
}

async fn collection_snapshot(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let collection = parse_collection(name)?;

    let snapshot =
        CacheMirror::run_blocking(&state.mirror, move |m| m.snapshot(collection)).await?;
    let Some(snapshot) = snapshot else {
        return Ok((
            [(header::CONTENT_TYPE, "application/json")],
            "[]",
        )
            .into_response());
    };

    let etag = format!("\"{}\"", snapshot.digest);
    let fresh = headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| etag_matches(v, &etag));
    if fresh {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        snapshot.body,
    )
        .into_response())
}

/// Weak comparison against one `If-None-Match` value, which may be `*` or a
/// comma-separated list of tags.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match
        .split(',')
        .map(str::trim)
        .any(|tag| tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag)
}

async fn project_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetailView>, AppError> {
    let resolver = DetailResolver::new(state.mirror.clone());
    let lookup = id.clone();
    let resolved = CacheMirror::run_blocking(&state.mirror, move |_| {
        let mut page = DetailPage::new();
        page.resolve(&resolver, &lookup);
        Ok(page.into_state())
    })
    .await?;

    match resolved {
        DetailState::Resolved { project, origin } => Ok(Json(DetailView::new(project, origin))),
        DetailState::Loading | DetailState::NotFound => Err(AppError::ProjectNotFound(id)),
    }
}

async fn about(State(state): State<AppState>) -> Result<Json<AboutStats>, AppError> {
    let start_year = state.start_year;
    let stats =
        CacheMirror::run_blocking(&state.mirror, move |m| Ok(AboutStats::current(m, start_year)))
            .await?;
    Ok(Json(stats))
}

async fn profile() -> Json<&'static Profile> {
    Json(&PROFILE)
}

#[derive(Deserialize)]
struct TypewriterQuery {
    steps: Option<usize>,
}

async fn typewriter(Query(query): Query<TypewriterQuery>) -> Json<Vec<Frame>> {
    let steps = query
        .steps
        .unwrap_or(DEFAULT_TYPEWRITER_STEPS)
        .min(MAX_TYPEWRITER_STEPS);
    Json(Typewriter::new(PROFILE.taglines).frames(steps))
}

async fn contact(
    State(state): State<AppState>,
    Json(mut form): Json<ContactForm>,
) -> Result<Json<ContactReply>, AppError> {
    let _permit = state.contact_gate.try_begin()?;

    let submission = Uuid::new_v4();
    let notice = form
        .submit(state.relay.as_ref())
        .instrument(info_span!("contact", %submission))
        .await?;
    Ok(Json(ContactReply { notice, form }))
}
