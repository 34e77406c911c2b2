//! The registry node orchestrator.
//!
//! Builds the registry service from configuration, logs the live event feed
//! and runs the HTTP API server.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;

use zkcert_core::{EventRecord, RegistryEvent};
use zkcert_registry::RegistryService;

use crate::api::ApiState;
use crate::config::ZkcertConfig;

/// A running ZkCert registry node.
pub struct RegistryNode {
    /// Node configuration.
    config: ZkcertConfig,
    /// The registry every API call is served from.
    service: Arc<RegistryService>,
}

impl RegistryNode {
    /// Create a node from config. Fails on an invalid administrator, issuer
    /// list or verifier setup.
    pub fn new(config: ZkcertConfig) -> Result<Self> {
        let verifier = config.verifier.build()?;
        let service = RegistryService::new(&config.registry, verifier)
            .context("invalid [registry] configuration")?;

        tracing::info!(
            administrator = %service.administrator(),
            verifier = service.verifier_name(),
            "ZkCert node created"
        );

        Ok(Self {
            config,
            service: Arc::new(service),
        })
    }

    /// Serve the HTTP API until it fails. Registry events are logged by a
    /// background observer for the lifetime of the node.
    pub async fn run(&self) -> Result<()> {
        let api_addr: SocketAddr = self
            .config
            .api_bind_addr()
            .parse()
            .with_context(|| format!("invalid API address {}", self.config.api_bind_addr()))?;

        let event_rx = self.service.subscribe();
        tokio::spawn(observe_events(event_rx));

        let api_state = Arc::new(ApiState::new(self.service.clone()));
        crate::api::start_api_server(api_addr, api_state).await
    }

    /// Get a handle to the registry service.
    pub fn service(&self) -> &Arc<RegistryService> {
        &self.service
    }

    pub fn config(&self) -> &ZkcertConfig {
        &self.config
    }
}

/// Log every registry event until the feed closes.
async fn observe_events(mut event_rx: broadcast::Receiver<EventRecord>) {
    loop {
        match event_rx.recv().await {
            Ok(record) => log_event(&record),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(missed = n, "event observer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("registry event channel closed");
                break;
            }
        }
    }
}

fn log_event(record: &EventRecord) {
    let sequence = record.sequence;
    match &record.event {
        RegistryEvent::CredentialIssued {
            key,
            issuer,
            credential_type,
        } => {
            tracing::info!(
                sequence,
                %key,
                %issuer,
                credential_type = credential_type.as_deref().unwrap_or("-"),
                "credential issued"
            );
        }
        RegistryEvent::CredentialRevoked { key } => {
            tracing::info!(sequence, %key, "credential revoked");
        }
        RegistryEvent::CredentialMetadataUpdated { key, metadata } => {
            tracing::info!(sequence, %key, bytes = metadata.len(), "credential metadata updated");
        }
        RegistryEvent::IssuerAuthorized { issuer } => {
            tracing::info!(sequence, %issuer, "issuer authorized");
        }
        RegistryEvent::IssuerDeauthorized { issuer } => {
            tracing::info!(sequence, %issuer, "issuer deauthorized");
        }
    }
}
