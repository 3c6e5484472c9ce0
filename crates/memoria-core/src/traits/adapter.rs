// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all external collaborators implement.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MemoriaError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Memoria adapters.
///
/// Every adapter (embedding service, chunk store) provides identity,
/// lifecycle, and health check capabilities.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, MemoriaError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), MemoriaError>;
}

#[async_trait]
impl<T: PluginAdapter + ?Sized> PluginAdapter for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn version(&self) -> semver::Version {
        (**self).version()
    }

    fn adapter_type(&self) -> AdapterType {
        (**self).adapter_type()
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoriaError> {
        (**self).health_check().await
    }

    async fn shutdown(&self) -> Result<(), MemoriaError> {
        (**self).shutdown().await
    }
}
