// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0

//! In-Memory Settings Store
//!
//! Filesystem-free implementation of the [`SettingsStore`] contract for
//! single-node development and testing. The real platform settings service
//! lives outside this crate; this implementation mirrors its dual shape
//! (tenant-partitioned entries next to a legacy global table) so both read
//! modes can be exercised.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::settings::{SettingsError, SettingsStore};
use crate::domain::tenant::TenantId;

/// In-memory settings store
///
/// Tenant-scoped values and global values are held in separate tables; a
/// tenant-qualified read never falls through to the global table, matching
/// the partitioned backend's behavior.
pub struct InMemorySettingsStore {
    global: RwLock<HashMap<String, String>>,
    tenant_scoped: RwLock<HashMap<(i64, String), String>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self {
            global: RwLock::new(HashMap::new()),
            tenant_scoped: RwLock::new(HashMap::new()),
        }
    }

    /// Set a global (tenant-unaware) value
    pub fn set_global(&self, key: &str, value: &str) {
        let mut global = self.global.write().unwrap();
        global.insert(key.to_string(), value.to_string());
    }

    /// Set a tenant-scoped value
    pub fn set_for_tenant(&self, tenant: TenantId, key: &str, value: &str) {
        let mut scoped = self.tenant_scoped.write().unwrap();
        scoped.insert((tenant.0, key.to_string()), value.to_string());
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get_value(
        &self,
        key: &str,
        tenant: Option<TenantId>,
    ) -> Result<Option<String>, SettingsError> {
        match tenant {
            Some(tenant) => {
                let scoped = self.tenant_scoped.read().unwrap();
                Ok(scoped.get(&(tenant.0, key.to_string())).cloned())
            }
            None => {
                let global = self.global.read().unwrap();
                Ok(global.get(key).cloned())
            }
        }
    }
}
