//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::time::Duration;

use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result, ServerError, ServerState};
use crate::reservations::ReservationSweeper;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests inject collaborators)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(self) -> Result<()> {
        let state = match self.state {
            Some(s) => s,
            None => ServerState::initialize(&self.config),
        };

        // Start background tasks
        let mut tasks = BackgroundTasks::new();
        let sweeper = ReservationSweeper::new(
            state.engine.clone(),
            Duration::from_secs(self.config.sweep_interval_secs),
            tasks.shutdown_token(),
        );
        tasks.spawn("reservation_sweep", TaskKind::Periodic, sweeper.run());
        tasks.log_summary();

        let app = crate::api::router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        tracing::info!("Reef Reserve Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tasks.shutdown().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}

/// 设置运行环境 (dotenv, 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    crate::utils::logger::init_logger();
    Ok(())
}
