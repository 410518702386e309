// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `despacho serve` command implementation.
//!
//! Opens the SQLite store, wires the dispatch engine to the Telegram
//! notifier (or a log-only fallback when no bot token is configured), and
//! runs the gateway HTTP server until the process is terminated.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use despacho_config::DespachoConfig;
use despacho_core::traits::{
    CourierStore, DeliveryStore, JourneyStore, NotificationChannel, OutboundNotification,
};
use despacho_core::{DespachoError, HealthStatus, MessageHandle};
use despacho_engine::DispatchEngine;
use despacho_gateway::{start_server, GatewayState, ServerConfig};
use despacho_storage::SqliteStore;
use despacho_telegram::TelegramNotifier;

/// Runs the `despacho serve` command.
pub async fn run_serve(config: DespachoConfig) -> Result<(), DespachoError> {
    init_tracing(&config.server.log_level);

    info!("starting despacho serve");

    let store = SqliteStore::open(&config.storage.database_path).await?;
    info!(path = config.storage.database_path.as_str(), "storage ready");

    let couriers: Arc<dyn CourierStore> = Arc::new(store.clone());
    let journeys: Arc<dyn JourneyStore> = Arc::new(store.clone());
    let deliveries: Arc<dyn DeliveryStore> = Arc::new(store);

    let channel: Arc<dyn NotificationChannel> = match &config.telegram.bot_token {
        Some(token) => {
            let notifier = TelegramNotifier::new(token)?;
            info!("telegram notifier configured");
            Arc::new(notifier)
        }
        None => {
            warn!("no telegram bot_token configured; courier notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let notify_target = config.telegram.chat_id.clone();
    if notify_target.is_none() {
        warn!("no telegram chat_id configured; courier notifications disabled");
    }

    let engine = Arc::new(DispatchEngine::new(
        couriers.clone(),
        journeys.clone(),
        deliveries.clone(),
        channel.clone(),
        notify_target,
        config.dispatch.correlation_capacity,
    ));

    let state = GatewayState {
        engine,
        couriers,
        journeys,
        deliveries,
        channel,
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    tokio::select! {
        result = start_server(&server_config, state) => result?,
        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    info!("despacho serve shutdown complete");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM where available.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("despacho={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Fallback channel used when Telegram is not configured: outbound traffic
/// is logged and dropped, so deliveries still work end to end.
struct LogNotifier;

#[async_trait]
impl NotificationChannel for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(
        &self,
        notification: OutboundNotification,
    ) -> Result<MessageHandle, DespachoError> {
        info!(
            target = notification.target.as_str(),
            text = notification.text.as_str(),
            actions = notification.actions.len(),
            "outbound notification (log-only channel)"
        );
        Ok(MessageHandle("log-0".to_string()))
    }

    async fn edit(
        &self,
        target: &str,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), DespachoError> {
        info!(target, handle = handle.0.as_str(), text, "edit (log-only channel)");
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, DespachoError> {
        Ok(HealthStatus::Degraded(
            "telegram not configured".to_string(),
        ))
    }
}
