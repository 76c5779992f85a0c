//! WebHDFS HTTP transport
//!
//! Decodes `{prefix}/{path}?op=...` requests into [`OpRequest`]s, hands the
//! request body to the handler as a chunk stream and turns the outcome into
//! a WebHDFS response.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::WolfHdfsConfig;
use crate::error::{Error, Result};
use crate::handler::{bounded_chunks, BufferedSink, MemoryHandler, OpRequest, Operation, Params};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub handler: MemoryHandler,
    pub max_chunk_size: usize,
}

/// WebHDFS HTTP server
pub struct HttpServer {
    config: WolfHdfsConfig,
    handler: MemoryHandler,
}

impl HttpServer {
    /// Create a new HTTP server with a fresh store
    pub fn new(config: WolfHdfsConfig) -> Self {
        let handler = MemoryHandler::from_config(&config);
        Self { config, handler }
    }

    /// Create a new HTTP server over an existing handler
    pub fn with_handler(config: WolfHdfsConfig, handler: MemoryHandler) -> Self {
        Self { config, handler }
    }

    /// Handler shared with the router
    pub fn handler(&self) -> MemoryHandler {
        self.handler.clone()
    }

    /// Create the router
    pub fn router(&self) -> Router {
        let state = AppState {
            handler: self.handler.clone(),
            max_chunk_size: self.config.server.max_chunk_size,
        };

        let prefix = self.config.path_prefix();
        let (root, wildcard) = if prefix == "/" {
            ("/".to_string(), "/*path".to_string())
        } else {
            (format!("{}/", prefix), format!("{}/*path", prefix))
        };

        let mut routes: Router<AppState> = Router::new().route("/health", get(handle_health));
        if prefix != "/" {
            routes = routes.route(prefix, any(handle_root));
        }
        let mut router: Router = routes
            .route(&root, any(handle_root))
            .route(&wildcard, any(handle_path))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if self.config.server.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&self.config.server.bind_address).await?;
        tracing::info!(
            "WebHDFS endpoint listening on {}{}",
            self.config.server.bind_address,
            self.config.path_prefix()
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Network(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

// ============ Response Types ============

/// `{"boolean": true}` answer for operations without a body
#[derive(Debug, Serialize, Deserialize)]
pub struct BooleanResponse {
    pub boolean: bool,
}

/// WebHDFS error envelope
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteExceptionResponse {
    pub remote_exception: RemoteException,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteException {
    pub exception: String,
    pub java_class_name: String,
    pub message: String,
}

impl From<&Error> for RemoteExceptionResponse {
    fn from(e: &Error) -> Self {
        Self {
            remote_exception: RemoteException {
                exception: e.exception_name().to_string(),
                java_class_name: e.java_class_name().to_string(),
                message: e.to_string(),
            },
        }
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub entries: usize,
}

fn error_response(e: &Error) -> Response {
    (e.status_code(), Json(RemoteExceptionResponse::from(e))).into_response()
}

// ============ Handlers ============

async fn handle_root(
    State(state): State<AppState>,
    query: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Body,
) -> Response {
    dispatch(state, String::from("/"), query, body).await
}

async fn handle_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    query: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Body,
) -> Response {
    dispatch(state, format!("/{}", path.trim_start_matches('/')), query, body).await
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.handler.store();
    let entries = store.lock().await.len();
    Json(HealthResponse { healthy: true, entries })
}

async fn dispatch(
    state: AppState,
    path: String,
    query: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Body,
) -> Response {
    let decoded = decode_request(path, query);
    let request_id = uuid::Uuid::new_v4();
    let span = match &decoded {
        Ok(req) => tracing::info_span!("webhdfs", %request_id, op = %req.operation, path = %req.path),
        Err(_) => tracing::info_span!("webhdfs", %request_id),
    };

    let payload = bounded_chunks(
        body.into_data_stream()
            .map_err(|e| Error::Payload(e.to_string())),
        state.max_chunk_size,
    )
    .boxed();

    let mut sink = BufferedSink::new();
    let result = state
        .handler
        .handle(decoded, payload, &mut sink)
        .instrument(span)
        .await;

    match result {
        Ok(()) if sink.is_complete() => sink.into_response(),
        Ok(()) => (StatusCode::OK, Json(BooleanResponse { boolean: true })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Turn the captured path and query string into an [`OpRequest`]
fn decode_request(
    path: String,
    query: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<OpRequest> {
    let Query(mut query) = query.map_err(|e| Error::Passthrough(e.body_text()))?;

    let op = query
        .remove("op")
        .ok_or_else(|| Error::Passthrough("Missing op parameter".into()))?;

    Ok(OpRequest {
        path,
        operation: Operation::parse(&op),
        params: Params::from(query),
    })
}
