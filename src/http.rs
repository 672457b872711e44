use crate::mcp::{JsonRpcRequest, McpServer};
use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

const SESSION_HEADER: &str = "mcp-session-id";

#[derive(Clone)]
struct AppState {
    server: McpServer,
    auth_token: Option<Arc<str>>,
}

/// `POST /mcp` speaks JSON-RPC, `GET /health` is unauthenticated.
pub fn router(server: McpServer, auth_token: Option<String>) -> Router {
    let state = AppState {
        server,
        auth_token: auth_token.filter(|t| !t.is_empty()).map(Arc::from),
    };

    Router::new()
        .route("/mcp", post(handle_rpc))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(server: McpServer, addr: &str, auth_token: Option<String>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}/mcp", listener.local_addr()?);

    axum::serve(listener, router(server, auth_token))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down HTTP server");
        })
        .await
        .context("HTTP server error")
}

async fn require_token(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(expected) = &state.auth_token {
        let presented = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(&**expected) {
            warn!("Rejected request without a valid bearer token");
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    }
    next.run(req).await
}

async fn handle_rpc(State(state): State<AppState>, Json(req): Json<JsonRpcRequest>) -> Response {
    let is_initialize = req.method == "initialize";

    match state.server.respond(req).await {
        Some(resp) => {
            let mut response = Json(resp).into_response();
            if is_initialize {
                if let Ok(session) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
                    response.headers_mut().insert(SESSION_HEADER, session);
                }
            }
            response
        }
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxmox::{ConnectionSettings, ProxmoxGateway};
    use crate::router::ToolRouter;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(token: Option<&str>) -> Router {
        let settings = ConnectionSettings {
            host: "pve.example".to_string(),
            port: 8006,
            user: "root@pam".to_string(),
            token_name: None,
            token_value: None,
            verify_ssl: false,
        };
        let gateway = Arc::new(ProxmoxGateway::new(settings));
        let server = McpServer::new(Arc::new(ToolRouter::new(gateway)));
        router(server, token.map(String::from))
    }

    fn rpc(body: &'static str, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/mcp").header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_missing_token() {
        let resp = app(Some("secret"))
            .oneshot(rpc(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_initialize_sets_session_header() {
        let resp = app(Some("secret"))
            .oneshot(rpc(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
                Some("secret"),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(SESSION_HEADER));

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["id"], 1);
        assert!(v["result"]["serverInfo"].is_object());
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let resp = app(None)
            .oneshot(rpc(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let resp = app(Some("secret"))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
