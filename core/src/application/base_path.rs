// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0

//! Base Path Resolution Application Service
//!
//! Produces the effective storage root for a tenant: the configured value
//! from the settings store when present and non-blank, else a process-wide
//! default. Resolution happens fresh on every call (tenant settings can be
//! edited at runtime) and is designed to degrade, never to abort the caller:
//! a failing settings backend is logged and answered with the fallback root.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::settings::{SettingsError, SettingsStore, PROJECT_ROOT_SETTING};
use crate::domain::tenant::TenantId;

/// Where an effective base path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasePathSource {
    /// Tenant or global setting supplied the root
    Configured,
    /// Process-wide default root
    Fallback,
}

/// Effective storage root resolved for one call
#[derive(Debug, Clone)]
pub struct ResolvedBasePath {
    pub path: PathBuf,
    pub source: BasePathSource,
}

/// Process-wide default storage root used when no root is configured.
pub fn default_storage_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("fieldlab").join("projects"))
        .unwrap_or_else(|| PathBuf::from("fieldlab-projects"))
}

/// Base path resolver
///
/// The tenant-partitioned and legacy global settings backends share this one
/// resolver; the constructor flag only changes the optional tenant qualifier
/// passed to the underlying read.
pub struct BasePathResolver {
    settings: Arc<dyn SettingsStore>,
    tenant_partitioned: bool,
    fallback_root: PathBuf,
}

impl BasePathResolver {
    /// Resolver against a tenant-partitioned settings backend
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            tenant_partitioned: true,
            fallback_root: default_storage_root(),
        }
    }

    /// Resolver against a legacy backend holding one global value
    pub fn tenant_unaware(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            tenant_partitioned: false,
            fallback_root: default_storage_root(),
        }
    }

    /// Override the process-wide fallback root
    pub fn with_fallback_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.fallback_root = root.into();
        self
    }

    /// Raw settings read with this resolver's tenant scope applied.
    ///
    /// Used by the diagnostic runner to report settings-store reachability
    /// separately from resolution.
    pub async fn probe_settings(
        &self,
        tenant: TenantId,
    ) -> Result<Option<String>, SettingsError> {
        let scope = self.tenant_partitioned.then_some(tenant);
        self.settings.get_value(PROJECT_ROOT_SETTING, scope).await
    }

    /// Resolve the effective storage root for a tenant
    ///
    /// Never fails and never returns an empty path.
    pub async fn resolve(&self, tenant: TenantId) -> ResolvedBasePath {
        match self.probe_settings(tenant).await {
            Ok(Some(value)) if !value.trim().is_empty() => ResolvedBasePath {
                path: PathBuf::from(value.trim()),
                source: BasePathSource::Configured,
            },
            Ok(_) => {
                debug!(%tenant, "no storage root configured, using fallback");
                self.fallback()
            }
            Err(error) => {
                warn!(%tenant, %error, "settings lookup failed, using fallback root");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> ResolvedBasePath {
        ResolvedBasePath {
            path: self.fallback_root.clone(),
            source: BasePathSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::settings::InMemorySettingsStore;
    use async_trait::async_trait;

    struct FailingSettingsStore;

    #[async_trait]
    impl SettingsStore for FailingSettingsStore {
        async fn get_value(
            &self,
            _key: &str,
            _tenant: Option<TenantId>,
        ) -> Result<Option<String>, SettingsError> {
            Err(SettingsError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_configured_tenant_root_wins() {
        let store = Arc::new(InMemorySettingsStore::new());
        store.set_for_tenant(TenantId(7), PROJECT_ROOT_SETTING, "/srv/tenant-7/projects");

        let resolver = BasePathResolver::new(store);
        let resolved = resolver.resolve(TenantId(7)).await;

        assert_eq!(resolved.path, PathBuf::from("/srv/tenant-7/projects"));
        assert_eq!(resolved.source, BasePathSource::Configured);
    }

    #[tokio::test]
    async fn test_absent_setting_falls_back() {
        let store = Arc::new(InMemorySettingsStore::new());
        let resolver =
            BasePathResolver::new(store).with_fallback_root("/var/lib/fieldlab/projects");

        let resolved = resolver.resolve(TenantId(7)).await;
        assert_eq!(resolved.path, PathBuf::from("/var/lib/fieldlab/projects"));
        assert_eq!(resolved.source, BasePathSource::Fallback);
    }

    #[tokio::test]
    async fn test_blank_setting_falls_back() {
        let store = Arc::new(InMemorySettingsStore::new());
        store.set_for_tenant(TenantId(7), PROJECT_ROOT_SETTING, "   ");

        let resolver =
            BasePathResolver::new(store).with_fallback_root("/var/lib/fieldlab/projects");
        let resolved = resolver.resolve(TenantId(7)).await;

        assert_eq!(resolved.source, BasePathSource::Fallback);
    }

    #[tokio::test]
    async fn test_failing_store_degrades_to_fallback() {
        let resolver = BasePathResolver::new(Arc::new(FailingSettingsStore))
            .with_fallback_root("/var/lib/fieldlab/projects");

        let resolved = resolver.resolve(TenantId(7)).await;
        assert_eq!(resolved.path, PathBuf::from("/var/lib/fieldlab/projects"));
        assert_eq!(resolved.source, BasePathSource::Fallback);
    }

    #[tokio::test]
    async fn test_tenant_unaware_resolver_reads_global_value() {
        let store = Arc::new(InMemorySettingsStore::new());
        store.set_global(PROJECT_ROOT_SETTING, "/srv/shared/projects");
        store.set_for_tenant(TenantId(7), PROJECT_ROOT_SETTING, "/srv/tenant-7/projects");

        let resolver = BasePathResolver::tenant_unaware(store);
        let resolved = resolver.resolve(TenantId(7)).await;

        assert_eq!(resolved.path, PathBuf::from("/srv/shared/projects"));
    }

    #[tokio::test]
    async fn test_configured_value_is_trimmed() {
        let store = Arc::new(InMemorySettingsStore::new());
        store.set_for_tenant(TenantId(7), PROJECT_ROOT_SETTING, "  /srv/projects  ");

        let resolver = BasePathResolver::new(store);
        let resolved = resolver.resolve(TenantId(7)).await;
        assert_eq!(resolved.path, PathBuf::from("/srv/projects"));
    }

    #[test]
    fn test_default_root_is_never_empty() {
        let root = default_storage_root();
        assert!(!root.as_os_str().is_empty());
    }
}
