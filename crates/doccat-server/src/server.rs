use std::future::Future;
use std::sync::Arc;

use doccat_index::{OpenSearchIndex, SearchIndex};
use doccat_store::{BlobStore, FsBlobStore};
use tokio::net::TcpListener;

use crate::catalog::CatalogService;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// doccat catalog server.
pub struct CatalogServer {
    config: ServerConfig,
    catalog: Arc<CatalogService>,
    index: Arc<dyn SearchIndex>,
}

impl CatalogServer {
    /// Wire up the directory-backed blob store and the OpenSearch index
    /// described by `config`. Does not contact the search engine yet.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let blobs = Arc::new(FsBlobStore::new(&config.storage_root)?);
        let index = Arc::new(OpenSearchIndex::new(&config.search)?);
        Ok(Self::with_backends(config, blobs, index))
    }

    /// Use caller-supplied backends (useful for testing and embedding).
    pub fn with_backends(
        config: ServerConfig,
        blobs: Arc<dyn BlobStore>,
        index: Arc<dyn SearchIndex>,
    ) -> Self {
        let catalog = Arc::new(CatalogService::from_config(&config, blobs, index.clone()));
        Self {
            config,
            catalog,
            index,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<CatalogService> {
        self.catalog.clone()
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.catalog.clone(), self.config.max_upload_size)
    }

    /// Start serving requests until the process is interrupted.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Ensure the search index exists, then serve until `signal` resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.index.ensure_index().await?;

        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            storage_root = %self.config.storage_root.display(),
            index = %self.config.search.index_name,
            duplicate_policy = %self.config.duplicate_policy,
            "doccat server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("doccat server stopped");
        Ok(())
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
