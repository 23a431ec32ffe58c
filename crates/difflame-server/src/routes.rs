//! Warp filters and handlers.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::http::header::CONTENT_TYPE;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use difflame_core::RevisionRange;

use crate::config::{ServeMode, ServerConfig};
use crate::error::ServerError;
use crate::page::render_page;

/// Query string accepted by `/data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataQuery {
    /// Older revision (diff mode).
    pub from: Option<String>,
    /// Newer revision (diff mode).
    pub to: Option<String>,
    /// Saved tree to return (file mode).
    pub file: Option<String>,
}

impl DataQuery {
    /// Revision range for diff mode; blank fields fall back to the defaults.
    pub fn range(&self) -> RevisionRange {
        RevisionRange::or_defaults(self.from.as_deref(), self.to.as_deref())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Build the complete route tree for `config`.
pub fn routes(
    config: Arc<ServerConfig>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index = warp::get()
        .and(warp::path::end())
        .and(with_config(config.clone()))
        .map(|config: Arc<ServerConfig>| warp::reply::html(render_page(&config.mode)));

    let data = warp::get()
        .and(warp::path("data"))
        .and(warp::path::end())
        .and(warp::query::<DataQuery>())
        .and(with_config(config))
        .and_then(handle_data);

    index
        .or(data)
        .with(warp::trace::request())
        .recover(handle_rejection)
}

fn with_config(
    config: Arc<ServerConfig>,
) -> impl Filter<Extract = (Arc<ServerConfig>,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

async fn handle_data(
    query: DataQuery,
    config: Arc<ServerConfig>,
) -> Result<warp::reply::Response, Rejection> {
    data_response(query, &config).await.map_err(|err| {
        tracing::warn!(error = %err, "data request failed");
        warp::reject::custom(err)
    })
}

async fn data_response(
    query: DataQuery,
    config: &ServerConfig,
) -> Result<warp::reply::Response, ServerError> {
    match &config.mode {
        ServeMode::Diffs { source } => {
            let range = query.range();
            let source = source.clone();
            // git2 and the git child process both block.
            let root = tokio::task::spawn_blocking(move || source.changes(&range)).await??;
            Ok(warp::reply::json(&root).into_response())
        }
        ServeMode::Files { files } => {
            let path = files.resolve(query.file.as_deref())?;
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ServerError::io(path, e))?;

            tracing::debug!(path = %path.display(), bytes = bytes.len(), "serving saved tree");
            Ok(warp::reply::with_header(bytes, CONTENT_TYPE, "application/json").into_response())
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<ServerError>() {
        (e.status(), e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        tracing::error!(?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    let body = warp::reply::json(&ErrorBody { error: message });
    Ok(warp::reply::with_status(body, status))
}

/// Resolve `address:port`, preferring IPv4 like most browsers do for
/// `localhost`.
async fn resolve_address(address: &str, port: u16) -> Result<SocketAddr, ServerError> {
    let resolve_error = |message: String| ServerError::Resolve {
        address: format!("{address}:{port}"),
        message,
    };

    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((address, port))
        .await
        .map_err(|e| resolve_error(e.to_string()))?
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| resolve_error("no addresses found".to_string()))
}

/// Run the server until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let addr = resolve_address(&config.address, config.port).await?;
    let mode = config.mode.label();
    let routes = routes(Arc::new(config));

    let shutdown = async {
        // An error here means no signal handler; run until killed instead.
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|source| ServerError::Bind {
            address: addr.to_string(),
            source,
        })?;

    tracing::info!(mode, "listening on http://{bound}");
    server.await;

    Ok(())
}
