//! # HTTP API
//!
//! 拉取式暴露适配器：`GET /signals` 返回最新快照。
//!
//! 每个请求从 `SnapshotPublisher` 复制一份快照，序列化在锁外完成。
//! 仅此一条路由，其余路径由 axum 返回默认的 404 / 405。

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use contracts::VehicleSnapshot;
use observability::record_signals_request;
use publisher::SnapshotPublisher;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default listen address
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// HTTP server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Listen address unavailable
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Server loop failed
    #[error("http server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Build the router serving `GET /signals`
pub fn router(publisher: Arc<SnapshotPublisher>) -> Router {
    Router::new()
        .route("/signals", get(get_signals))
        .with_state(publisher)
}

async fn get_signals(State(publisher): State<Arc<SnapshotPublisher>>) -> Json<VehicleSnapshot> {
    record_signals_request();
    let snapshot = publisher.read();
    debug!(%snapshot, "serving /signals");
    Json(snapshot)
}

/// `/signals` server over a shared publisher
pub struct SignalsServer {
    addr: SocketAddr,
    publisher: Arc<SnapshotPublisher>,
}

impl SignalsServer {
    pub fn new(addr: SocketAddr, publisher: Arc<SnapshotPublisher>) -> Self {
        Self { addr, publisher }
    }

    async fn bind(&self) -> Result<TcpListener, ServerError> {
        TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })
    }

    /// Serve on the current task until `shutdown` completes
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        info!(address = %listener.local_addr()?, "Server running on /signals");

        axum::serve(listener, router(self.publisher))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Bind, then serve on a background task
    pub async fn spawn(self) -> Result<SignalsServerHandle, ServerError> {
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;
        info!(address = %local_addr, "Server running on /signals");

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let server = axum::serve(listener, router(self.publisher)).with_graceful_shutdown(
            async move {
                let _ = shutdown_rx.changed().await;
            },
        );
        let task = tokio::spawn(async move {
            let result = server.await;
            if let Err(err) = &result {
                warn!(error = %err, "http server exited with error");
            }
            result
        });

        Ok(SignalsServerHandle {
            address: local_addr,
            task,
            shutdown: shutdown_tx,
        })
    }
}

/// Handle to a spawned server
pub struct SignalsServerHandle {
    address: SocketAddr,
    task: JoinHandle<std::io::Result<()>>,
    shutdown: watch::Sender<bool>,
}

impl SignalsServerHandle {
    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    /// Request graceful shutdown and wait for the server task
    pub async fn shutdown(self) -> Result<(), ServerError> {
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(result) => Ok(result?),
            Err(join) => Err(ServerError::Serve(std::io::Error::other(join))),
        }
    }
}
