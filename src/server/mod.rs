//! Development server
//!
//! Blog pages are rendered per request, so edits to posts show up on reload.
//! The chat assistant is exposed as a small JSON API backed by one
//! [`LiveChat`] per session. Anything else is served from the public
//! directory.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::chat::{ChatMessage, ChatState, LiveChat, Responder};
use crate::config::ChatConfig;
use crate::content::{ContentError, ContentLoader, Post, PostFilter, PostSummary};
use crate::helpers::url_for;
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Server state
struct ServerState {
    folio: Folio,
    loader: Arc<ContentLoader>,
    templates: TemplateRenderer,
    responder: Responder,
    sessions: RwLock<Sessions>,
}

type SharedState = Arc<ServerState>;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("post not found")]
    UnknownPost,
    #[error("chat session not found")]
    UnknownSession,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::UnknownPost | ServerError::UnknownSession => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Build the application router for `folio`
pub fn router(folio: &Folio) -> Result<Router> {
    let state = Arc::new(ServerState {
        folio: folio.clone(),
        loader: Arc::new(ContentLoader::new(folio)),
        templates: TemplateRenderer::new()?,
        responder: folio.responder()?,
        sessions: RwLock::new(Sessions::new(&folio.config.chat)),
    });

    let routes = Router::new()
        .route("/", get(home_handler))
        .route("/blog", get(blog_index_handler))
        .route("/blog/", get(blog_index_handler))
        .route("/blog/:slug", get(post_handler))
        .route("/blog/:slug/", get(post_handler))
        .route("/chat", get(chat_page_handler))
        .route("/chat/", get(chat_page_handler))
        .route("/api/posts", get(api_list_posts))
        .route("/api/posts/:slug", get(api_get_post))
        .route("/api/chat", axum::routing::post(create_session))
        .route("/api/chat/:id", get(get_session).delete(delete_session))
        .route("/api/chat/:id/messages", axum::routing::post(post_message))
        .with_state(state)
        .fallback_service(
            ServeDir::new(&folio.public_dir).append_index_html_on_directories(true),
        );

    // Serve under the configured root, e.g. `/portfolio/`
    let root = folio.config.root.trim_end_matches('/');
    let app = if root.is_empty() {
        routes
    } else {
        Router::new().nest(root, routes)
    };

    Ok(app.layer(TraceLayer::new_for_http()))
}

/// Start the development server
pub async fn start(folio: &Folio, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(folio)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, url_for(&folio.config, ""));
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(state): State<SharedState>) -> Redirect {
    Redirect::temporary(&url_for(&state.folio.config, "blog/"))
}

/// Post summaries; a missing content directory counts as an empty blog
async fn list_posts(state: &ServerState) -> Result<Vec<PostSummary>, ServerError> {
    let loader = state.loader.clone();
    match tokio::task::spawn_blocking(move || loader.list_posts()).await? {
        Ok(posts) => Ok(posts),
        Err(ContentError::NotFound(dir)) => {
            tracing::warn!("Content directory {:?} not found", dir);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

async fn load_post(state: &ServerState, slug: String) -> Result<Option<Post>, ServerError> {
    let loader = state.loader.clone();
    match tokio::task::spawn_blocking(move || loader.get_post(&slug)).await? {
        Ok(post) => Ok(post),
        Err(ContentError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// `?tag=` with an empty value means no tag
fn normalize(mut filter: PostFilter) -> PostFilter {
    filter.tag = filter.tag.filter(|tag| !tag.trim().is_empty());
    filter
}

async fn blog_index_handler(
    State(state): State<SharedState>,
    Query(filter): Query<PostFilter>,
) -> Result<Html<String>, ServerError> {
    let filter = normalize(filter);
    let posts = list_posts(&state).await?;
    let html = state
        .templates
        .render_listing(&state.folio.config, &posts, &filter)?;
    Ok(Html(html))
}

async fn post_handler(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Response, ServerError> {
    let config = &state.folio.config;
    match load_post(&state, slug).await? {
        Some(post) => Ok(Html(state.templates.render_post(config, &post)?).into_response()),
        None => {
            let html = state.templates.render_not_found(config)?;
            Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
        }
    }
}

async fn chat_page_handler(State(state): State<SharedState>) -> Result<Html<String>, ServerError> {
    Ok(Html(state.templates.render_chat(&state.folio.config)?))
}

async fn api_list_posts(
    State(state): State<SharedState>,
    Query(filter): Query<PostFilter>,
) -> Result<Json<Vec<PostSummary>>, ServerError> {
    let filter = normalize(filter);
    let posts = list_posts(&state).await?;
    Ok(Json(filter.apply(&posts).into_iter().cloned().collect()))
}

async fn api_get_post(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ServerError> {
    load_post(&state, slug)
        .await?
        .map(Json)
        .ok_or(ServerError::UnknownPost)
}

// Chat API

struct SessionEntry {
    chat: LiveChat,
    last_active: Instant,
}

/// Open chats by id
///
/// A session nobody has read or written for `idle` is gone, and opening one
/// past `max` closes the least recently used.
struct Sessions {
    entries: HashMap<Uuid, SessionEntry>,
    idle: Duration,
    max: usize,
}

impl Sessions {
    fn new(config: &ChatConfig) -> Self {
        Self {
            entries: HashMap::new(),
            idle: config.session_idle(),
            max: config.max_sessions.max(1),
        }
    }

    fn insert(&mut self, id: Uuid, chat: LiveChat) {
        self.prune();
        while self.entries.len() >= self.max {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_active)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    tracing::debug!(id = %oldest, "Chat session evicted");
                }
                None => break,
            }
        }
        let last_active = Instant::now();
        self.entries.insert(id, SessionEntry { chat, last_active });
    }

    /// The live chat for `id`, marked as just used
    fn touch(&mut self, id: &Uuid) -> Option<&LiveChat> {
        let now = Instant::now();
        if self.is_expired(id, now) {
            self.entries.remove(id);
            tracing::debug!(%id, "Chat session expired");
            return None;
        }
        let entry = self.entries.get_mut(id)?;
        entry.last_active = now;
        Some(&entry.chat)
    }

    fn remove(&mut self, id: &Uuid) -> Option<LiveChat> {
        self.entries.remove(id).map(|entry| entry.chat)
    }

    fn is_expired(&self, id: &Uuid, now: Instant) -> bool {
        self.entries
            .get(id)
            .is_some_and(|entry| now.duration_since(entry.last_active) >= self.idle)
    }

    fn prune(&mut self) {
        let now = Instant::now();
        let idle = self.idle;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_active) < idle);
        if self.entries.len() < before {
            tracing::debug!("Dropped {} idle chat sessions", before - self.entries.len());
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    id: Uuid,
    bot_name: String,
    state: ChatState,
    messages: Vec<ChatMessage>,
}

impl SessionView {
    fn new(id: Uuid, bot_name: &str, chat: &LiveChat) -> Self {
        Self {
            id,
            bot_name: bot_name.to_string(),
            state: chat.state(),
            messages: chat.transcript(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    content: String,
}

async fn create_session(State(state): State<SharedState>) -> (StatusCode, Json<SessionView>) {
    let chat_config = &state.folio.config.chat;
    let chat = LiveChat::start(
        state.responder.clone(),
        &chat_config.welcome,
        state.folio.typing_delay(),
    );

    let id = Uuid::new_v4();
    let view = SessionView::new(id, &chat_config.bot_name, &chat);
    state.sessions.write().await.insert(id, chat);
    tracing::debug!(%id, "Chat session started");

    (StatusCode::CREATED, Json(view))
}

async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ServerError> {
    let mut sessions = state.sessions.write().await;
    let chat = sessions.touch(&id).ok_or(ServerError::UnknownSession)?;
    Ok(Json(SessionView::new(id, &state.folio.config.chat.bot_name, chat)))
}

/// 202 with the appended message, or 204 when the input was blank
async fn post_message(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageBody>,
) -> Result<Response, ServerError> {
    let mut sessions = state.sessions.write().await;
    let chat = sessions.touch(&id).ok_or(ServerError::UnknownSession)?;

    match chat.submit(&body.content) {
        Some(message) => Ok((StatusCode::ACCEPTED, Json(message)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    match state.sessions.write().await.remove(&id) {
        Some(_) => {
            tracing::debug!(%id, "Chat session closed");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ServerError::UnknownSession),
    }
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
