// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0
//! Settings Store Contract - Anti-Corruption Layer for the platform settings service
//!
//! Provides abstraction over the settings backend to isolate the
//! provisioning core from external technology choices. Enables testing with
//! mocks and keeps the tenant-partitioned and legacy global backends behind
//! one read contract.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::tenant::TenantId;

/// Setting key holding the configured project storage root.
pub const PROJECT_ROOT_SETTING: &str = "project_storage_root";

/// Settings store errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings backend unavailable: {0}")]
    Unavailable(String),

    #[error("Settings backend error: {0}")]
    Backend(String),
}

/// Read contract consumed from the external settings store
///
/// A single string read, optionally scoped by tenant. Implementations on a
/// tenant-partitioned backend honor the `tenant` qualifier; legacy global
/// backends are read with `tenant = None`. Absence of a value is a normal,
/// not an error, condition.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a single setting value
    ///
    /// # Arguments
    /// * `key` - Fixed setting name (e.g. [`PROJECT_ROOT_SETTING`])
    /// * `tenant` - Tenant partition qualifier, `None` for the global value
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Configured value
    /// * `Ok(None)` - No value configured
    /// * `Err(SettingsError)` - Backend could not be reached or queried
    async fn get_value(
        &self,
        key: &str,
        tenant: Option<TenantId>,
    ) -> Result<Option<String>, SettingsError>;
}
