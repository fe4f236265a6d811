/// HTTP routes and the server loop.
///
/// `GET /` takes these query parameters:
///
/// - `path`: directory to inspect, relative to the base directory (default `/`);
/// - `json`: if non-empty, answer with the nested tree as JSON, unstreamed;
/// - `chart`: `tree` or `flat`, embeds that chart payload in the page;
/// - `d3`: if non-empty, same as `chart=tree`.
///
/// The HTML page is a chunked body fed by a [`ChannelSink`]; the
/// orchestrator runs on its own task and the body ends when it drops the
/// sink.
use crate::config::ServerConfig;
use crate::orchestrator::{ChannelSink, InspectRequest, Inspector};
use crate::path::LogicalPath;
use anyhow::Context;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use dusleuth_core::encode::Chart;
use dusleuth_core::{TtlCache, Walker};
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Default, Deserialize)]
pub struct InspectQuery {
    pub path: Option<String>,
    pub json: Option<String>,
    pub chart: Option<String>,
    pub d3: Option<String>,
}

impl InspectQuery {
    fn wants_json(&self) -> bool {
        self.json.as_deref().is_some_and(|v| !v.is_empty())
    }

    fn chart(&self) -> Chart {
        match self.chart.as_deref() {
            Some("tree") => Chart::Tree,
            Some("flat") => Chart::Flat,
            _ if self.d3.as_deref().is_some_and(|v| !v.is_empty()) => Chart::Tree,
            _ => Chart::None,
        }
    }
}

/// Build the application router around a shared inspector.
pub fn router(inspector: Arc<Inspector>) -> Router {
    Router::new()
        .route("/", get(inspect))
        .with_state(inspector)
}

async fn inspect(
    State(inspector): State<Arc<Inspector>>,
    Query(query): Query<InspectQuery>,
) -> Response {
    let path = LogicalPath::parse(query.path.as_deref());

    if query.wants_json() {
        return match inspector.nested_json(&path).await {
            Ok(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
            Err(err) => {
                error!(path = %path, error = %err, "json request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error (see log)",
                )
                    .into_response()
            }
        };
    }

    let request = InspectRequest {
        path,
        chart: query.chart(),
    };
    let (sink, rx) = ChannelSink::new();
    // Errors are logged by the orchestrator itself.
    tokio::spawn(async move {
        let _ = inspector.inspect(request, sink).await;
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Periodically reclaim expired cache records, once per TTL.
pub fn spawn_janitor(cache: Arc<TtlCache>) -> Option<JoinHandle<()>> {
    let period = cache.ttl();
    if period.is_zero() {
        return None;
    }
    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = cache.purge_expired();
            if removed > 0 {
                debug!(removed, remaining = cache.len(), "purged expired cache records");
            }
        }
    }))
}

/// Bind the listening port and serve until Ctrl-C.
///
/// A bind failure is returned immediately; there is no retry.
pub async fn serve(config: &ServerConfig, walker: Walker) -> anyhow::Result<()> {
    let janitor = spawn_janitor(walker.cache().clone());
    let inspector = Arc::new(Inspector::new(
        walker,
        config.base_path.clone(),
        config.apology_timeout,
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, base = %config.base_path.display(), "listening");

    axum::serve(listener, router(inspector))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(janitor) = janitor {
        janitor.abort();
    }
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
