use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{Form, Path as AxumPath, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    serve, Json, Router,
};
use minijinja::Environment;
use serde::Deserialize;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::catalog::{self, Path};
use crate::guidance::GuidanceClient;
use crate::render;
use crate::session::{Phase, Session};
use crate::session_store::SessionStore;

const EMPTY_DILEMMA_NOTICE: &str = "Share what weighs on you before seeking guidance.";
const STYLESHEET: &str = include_str!("../static/style.css");

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<Environment<'static>>,
    pub sessions: SessionStore,
    pub oracle: Arc<GuidanceClient>,
}

impl AppState {
    pub fn new(oracle: GuidanceClient) -> Result<Self> {
        Self::with_store(oracle, SessionStore::default())
    }

    pub fn with_store(oracle: GuidanceClient, sessions: SessionStore) -> Result<Self> {
        let templates = render::create_environment().context("Failed to initialize template engine")?;
        Ok(Self {
            templates: Arc::new(templates),
            sessions,
            oracle: Arc::new(oracle),
        })
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("no session with id {0}")]
    UnknownSession(Uuid),
    #[error("failed to render page: {0}")]
    Render(#[from] minijinja::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::UnknownSession(_) => {
                (StatusCode::NOT_FOUND, Html("<p>This consultation has faded. <a href=\"/\">Begin anew</a>.</p>".to_string()))
                    .into_response()
            }
            WebError::Render(e) => {
                error!("Failed to render template: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, Html("Internal Server Error".to_string())).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DilemmaForm {
    #[serde(default)]
    pub dilemma: String,
}

#[derive(Debug, Deserialize)]
pub struct CardForm {
    pub card: usize,
}

fn session_url(id: Uuid) -> String {
    format!("/session/{}", id)
}

async fn index_handler(State(state): State<AppState>) -> Redirect {
    let id = state.sessions.insert(Session::new()).await;
    info!(session = %id, "New consultation started");
    Redirect::to(&session_url(id))
}

async fn session_handler(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Html<String>, WebError> {
    state
        .sessions
        .with_session(&id, |session| -> Result<Html<String>, WebError> {
            let page = render::render_session(&state.templates, session, None)?;
            // The preparing screen is shown once; the next load lays out the cards.
            if session.phase() == Phase::Preparing {
                session.finish_preparing();
            }
            Ok(Html(page))
        })
        .await
        .ok_or(WebError::UnknownSession(id))?
}

async fn dilemma_handler(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Form(form): Form<DilemmaForm>,
) -> Result<Response, WebError> {
    state
        .sessions
        .with_session(&id, |session| -> Result<Response, WebError> {
            if !session.submit_dilemma(&form.dilemma) && session.phase() == Phase::Intake {
                let page = render::render_session(&state.templates, session, Some(EMPTY_DILEMMA_NOTICE))?;
                return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
            }
            Ok(Redirect::to(&session_url(id)).into_response())
        })
        .await
        .ok_or(WebError::UnknownSession(id))?
}

async fn select_handler(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Form(form): Form<CardForm>,
) -> Result<Redirect, WebError> {
    let ticket = state
        .sessions
        .with_session(&id, |session| session.select(form.card))
        .await
        .ok_or(WebError::UnknownSession(id))?;

    // The store is not locked while the relay answers.
    if let Some(ticket) = ticket {
        let guidance = state.oracle.generate(&ticket.path, &ticket.dilemma).await;
        let landed = state
            .sessions
            .with_session(&id, |session| session.apply_guidance(&ticket, guidance))
            .await;
        if landed.is_none() {
            debug!(session = %id, "Session gone before guidance landed");
        }
    }
    Ok(Redirect::to(&session_url(id)))
}

async fn reset_handler(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Redirect, WebError> {
    state
        .sessions
        .with_session(&id, |session| session.reset())
        .await
        .ok_or(WebError::UnknownSession(id))?;
    Ok(Redirect::to(&session_url(id)))
}

async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

async fn paths_handler() -> Json<&'static [Path]> {
    Json(catalog::all())
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Build our application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/session/:id", get(session_handler))
        .route("/session/:id/dilemma", post(dilemma_handler))
        .route("/session/:id/select", post(select_handler))
        .route("/session/:id/reset", post(reset_handler))
        .route("/api/paths", get(paths_handler))
        .route("/health", get(health_handler))
        .route("/static/style.css", get(stylesheet_handler))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())) // Add request logging
}

pub async fn start_web_server(port: u16, oracle: GuidanceClient) -> Result<()> {
    let state = AppState::new(oracle)?;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    // Bind using tokio::net::TcpListener
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
