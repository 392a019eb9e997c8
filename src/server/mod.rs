//! HTTP surface: `POST /resource` dispatches one aggregation request,
//! `GET /status` reports the configured request definitions.
//!
//! `/resource` always answers 200; only the envelope's `code` field tells
//! success from failure, and it never carries the failure cause.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::app::AppContext;
use crate::config::{self, RequestDef};
use crate::domain::Envelope;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/resource", post(resource))
        .route("/status", get(status))
        .with_state(ctx)
}

pub async fn serve(port: u16, ctx: Arc<AppContext>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(ctx)).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ResourceRequest {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    args: Map<String, Value>,
}

async fn resource(State(ctx): State<Arc<AppContext>>, body: String) -> Json<Envelope> {
    tracing::debug!(%body, "inbound resource request");

    let req: ResourceRequest = match serde_json::from_str(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(error = %e, "malformed request body");
            return Json(Envelope::error());
        }
    };

    let kind = req.kind.unwrap_or_default();
    Json(ctx.registry.resolve(&kind, Value::Object(req.args)).await)
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    reqs: Vec<RequestDef>,
}

async fn status(State(ctx): State<Arc<AppContext>>) -> Json<StatusResponse> {
    let reqs = match config::load_request_defs(&ctx.config_path) {
        Ok(reqs) => reqs,
        Err(e) => {
            tracing::warn!(error = %e, path = %ctx.config_path.display(), "could not load request definitions");
            Vec::new()
        }
    };
    Json(StatusResponse { reqs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EnvelopeCode;
    use std::io::Write;

    fn ctx_with_config(path: std::path::PathBuf) -> Arc<AppContext> {
        Arc::new(AppContext::new(path, None).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_body_degrades_to_error_envelope() {
        let ctx = ctx_with_config("/tmp/none.yaml".into());
        let Json(envelope) = resource(State(ctx), "{not json".to_string()).await;
        assert_eq!(envelope, Envelope::error());
    }

    #[tokio::test]
    async fn test_missing_type_degrades_to_error_envelope() {
        let ctx = ctx_with_config("/tmp/none.yaml".into());
        let Json(envelope) = resource(State(ctx), r#"{"args": {}}"#.to_string()).await;
        assert_eq!(envelope.code, EnvelopeCode::Error);
    }

    #[tokio::test]
    async fn test_status_reads_definitions_each_call() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"- type: fetch_cdkeys\n").unwrap();
        let ctx = ctx_with_config(file.path().to_path_buf());

        let Json(first) = status(State(ctx.clone())).await;
        assert_eq!(first.reqs.len(), 1);

        file.write_all(b"- type: fetch_r6_news\n").unwrap();
        file.flush().unwrap();
        let Json(second) = status(State(ctx)).await;
        assert_eq!(second.reqs.len(), 2);
    }

    #[tokio::test]
    async fn test_status_tolerates_missing_file() {
        let ctx = ctx_with_config("/tmp/definitely-not-there.yaml".into());
        let Json(res) = status(State(ctx)).await;
        assert!(res.reqs.is_empty());
    }
}
