pub mod admission_review;
pub(crate) mod api;
pub(crate) mod certs;
pub mod cli;
pub mod config;
pub mod errors;
pub mod mutation;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::{
    api::{
        handlers::{mutate_handler, readiness_handler},
        state::ApiServerState,
    },
    certs::create_tls_config_and_watch_certificate_changes,
    config::Config,
    mutation::StrategyRegistry,
};

pub struct LabelInjector {
    router: Router,
    addr: SocketAddr,
    tls_config: Option<RustlsConfig>,
}

impl LabelInjector {
    pub async fn new_from_config(config: Config) -> Result<Self> {
        let principal_matcher = config.system_principals.matcher()?;
        info!(
            labels = config.metadata.labels().len(),
            annotations = config.metadata.annotations().len(),
            system_principals = ?config.system_principals,
            "mutation configuration loaded"
        );

        let state = Arc::new(ApiServerState {
            metadata: config.metadata,
            principal_matcher,
            strategies: StrategyRegistry::default(),
        });

        let tls_config = match config.tls_config {
            Some(tls_config) => {
                Some(create_tls_config_and_watch_certificate_changes(tls_config).await?)
            }
            None => None,
        };

        let router = Router::new()
            .route("/mutate", post(mutate_handler))
            .route("/readiness", get(readiness_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Ok(Self {
            router,
            addr: config.addr,
            tls_config,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(self) -> Result<()> {
        self.run_with_handle(Handle::new()).await
    }

    /// Serves until the process ends or `handle` is told to shut down.
    pub async fn run_with_handle(self, handle: Handle) -> Result<()> {
        match self.tls_config {
            Some(tls_config) => {
                info!(address = self.addr.to_string().as_str(), "started HTTPS server");
                axum_server::bind_rustls(self.addr, tls_config)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                info!(address = self.addr.to_string().as_str(), "started HTTP server");
                axum_server::bind(self.addr)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
        }

        Ok(())
    }
}
