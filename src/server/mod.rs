//! Embedded workflow server.
//!
//! # Data Flow
//! ```text
//! ServerOptionSet
//!     → ServerFactory::build (validate settings, open store, pick logger)
//!     → WorkflowServer::start (bind frontend, create namespaces,
//!                              register search attributes, flush)
//!     → WorkflowServer::run (serve until the interrupt hook fires)
//! ```
//!
//! # Design Decisions
//! - The launch layer only sees the two traits; [`LiteServer`] is the
//!   built-in implementation
//! - All server work runs under the configured logger
//! - Shutdown is driven by the interrupt hook; no internal polling

pub mod frontend;
pub mod persistence;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;

use crate::lifecycle::shutdown::Shutdown;
use crate::observability::logging::{self, LoggingError};
use crate::options::{ServerConfig, ServerOptionSet};
use crate::server::persistence::{Store, StoreError};

/// Errors raised while building, starting or running a server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid frontend port: {0}")]
    InvalidPort(u16),

    #[error("invalid frontend address {ip:?}: {reason}")]
    InvalidAddress { ip: String, reason: String },

    #[error("namespace names must not be empty")]
    EmptyNamespace,

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("unable to bind frontend to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("frontend failed: {0}")]
    Frontend(#[source] std::io::Error),

    #[error("server has not been started")]
    NotStarted,
}

/// A server that can be started and then run until it terminates.
#[async_trait]
pub trait WorkflowServer: Send {
    /// Acquire resources and initialize state. Returns once the server is
    /// ready to serve.
    async fn start(&mut self) -> Result<(), ServerError>;

    /// Serve until the interrupt hook fires or the server fails.
    async fn run(&mut self) -> Result<(), ServerError>;
}

/// Builds servers from a directive set.
pub trait ServerFactory: Send + Sync {
    type Server: WorkflowServer;

    fn build(&self, options: ServerOptionSet) -> Result<Self::Server, ServerError>;
}

/// Factory for [`LiteServer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteServerFactory;

impl ServerFactory for LiteServerFactory {
    type Server = LiteServer;

    fn build(&self, options: ServerOptionSet) -> Result<LiteServer, ServerError> {
        LiteServer::new(options.into_config())
    }
}

/// The built-in server.
pub struct LiteServer {
    config: ServerConfig,
    addr: SocketAddr,
    store: Store,
    logger: Dispatch,
    interrupt: Shutdown,
    listener: Option<TcpListener>,
}

impl LiteServer {
    /// Validate `config`, open storage and resolve the logger.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        if config.frontend_port == 0 {
            return Err(ServerError::InvalidPort(config.frontend_port));
        }
        let ip: IpAddr = config
            .frontend_ip
            .parse()
            .map_err(|err: std::net::AddrParseError| ServerError::InvalidAddress {
                ip: config.frontend_ip.clone(),
                reason: err.to_string(),
            })?;
        if config.namespaces.iter().any(|ns| ns.trim().is_empty()) {
            return Err(ServerError::EmptyNamespace);
        }

        let logger = match &config.logger {
            Some(logger) => logger.clone(),
            None => logging::json_logger()?,
        };
        let store = Store::open(&config.storage)?;
        let interrupt = config.interrupt.clone().unwrap_or_default();

        Ok(Self {
            addr: SocketAddr::new(ip, config.frontend_port),
            config,
            store,
            logger,
            interrupt,
            listener: None,
        })
    }

    /// Address the frontend listens on.
    pub fn frontend_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Handle that stops [`WorkflowServer::run`] when triggered.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.interrupt.clone()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    async fn start_inner(&mut self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;

        for namespace in &self.config.namespaces {
            if self.store.catalog_mut().create_namespace(namespace) {
                tracing::info!(namespace = %namespace, "Namespace created");
            } else {
                tracing::debug!(namespace = %namespace, "Namespace already exists");
            }
        }

        for (name, ty) in &self.config.search_attributes {
            if self.store.catalog_mut().register_search_attribute(name, *ty)? {
                tracing::info!(name = %name, attribute_type = %ty, "Search attribute registered");
            }
        }

        self.store.flush()?;
        self.listener = Some(listener);

        tracing::info!(
            address = %self.addr,
            ephemeral = self.store.is_ephemeral(),
            namespaces = self.store.catalog().namespaces.len(),
            search_attributes = self.store.catalog().search_attributes.len(),
            "Server started"
        );
        Ok(())
    }

    async fn run_inner(&mut self) -> Result<(), ServerError> {
        let listener = self.listener.take().ok_or(ServerError::NotStarted)?;
        let app = frontend::router(Arc::new(self.store.catalog().clone()));
        let interrupt = self.interrupt.clone();

        tracing::info!(address = %self.addr, "Frontend serving");
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                interrupt.recv().await;
                tracing::info!("Interrupt received, stopping frontend");
            })
            .await
            .map_err(ServerError::Frontend)?;

        self.store.flush()?;
        tracing::info!("Server stopped");
        Ok(())
    }
}

#[async_trait]
impl WorkflowServer for LiteServer {
    async fn start(&mut self) -> Result<(), ServerError> {
        let logger = self.logger.clone();
        self.start_inner().with_subscriber(logger).await
    }

    async fn run(&mut self) -> Result<(), ServerError> {
        let logger = self.logger.clone();
        self.run_inner().with_subscriber(logger).await
    }
}
