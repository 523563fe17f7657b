// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0

//! Project Directory Provisioning Application Service
//!
//! Orchestrates the project directory lifecycle coordinating:
//! - Domain layer: segment sanitizer, provisioning value objects
//! - Application layer: base path resolver
//! - Infrastructure layer: path validator, filesystem
//!
//! Creation can appear to succeed while the entry is not yet visible through
//! the same access path when the storage root is mirrored by a cloud-sync
//! client. The engine therefore verifies every created directory with a
//! bounded retry tuned to the cloud-sync classification, and reports
//! verification exhaustion as a warning rather than a failure: the creation
//! call itself did not error, so the folder is most likely lagging behind
//! replication and will surface without caller action.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::application::base_path::BasePathResolver;
use crate::domain::provisioning::{
    ProvisioningConfig, ProvisioningResult, RetryPolicy, SubdirectoryOutcome,
    PROJECT_SUBDIRECTORIES,
};
use crate::domain::segment::SegmentSanitizer;
use crate::domain::tenant::TenantId;
use crate::infrastructure::path_probe::PathValidator;

/// Classic Windows path-length ceiling beyond which the extended-length
/// form is required for creation calls.
#[cfg(windows)]
const WINDOWS_MAX_PATH: usize = 260;

// ============================================================================
// Service Trait
// ============================================================================

#[async_trait]
pub trait ProvisioningService: Send + Sync {
    /// Ensure the project directory and its fixed subdirectory set exist
    /// and are usable
    ///
    /// Safe to call repeatedly for the same tenant/project pair: finding the
    /// tree already present and healthy is a cheap success, not an error.
    async fn provision_project_directory(
        &self,
        tenant: TenantId,
        project_identifier: &str,
    ) -> ProvisioningResult;
}

// ============================================================================
// Standard Implementation
// ============================================================================

pub struct StandardProvisioningService {
    resolver: BasePathResolver,
    sanitizer: SegmentSanitizer,
    validator: PathValidator,
    cloud_retry: RetryPolicy,
    local_retry: RetryPolicy,
}

impl StandardProvisioningService {
    pub fn new(resolver: BasePathResolver) -> Self {
        Self::with_config(resolver, &ProvisioningConfig::default())
    }

    pub fn with_config(resolver: BasePathResolver, config: &ProvisioningConfig) -> Self {
        Self {
            resolver,
            sanitizer: SegmentSanitizer::new(),
            validator: PathValidator::new(),
            cloud_retry: config.cloud_policy(),
            local_retry: config.local_policy(),
        }
    }

    fn retry_policy_for(&self, path: &str) -> RetryPolicy {
        if self.validator.is_cloud_synced(path) {
            self.cloud_retry
        } else {
            self.local_retry
        }
    }

    /// Path form handed to the creation call.
    ///
    /// Long paths get the Windows extended-length prefix for the creation
    /// call only; the logical path stays authoritative for reporting and
    /// for every subsequent existence check, so creation and verification
    /// can never disagree about which form is real.
    fn creation_path(logical: &Path) -> PathBuf {
        #[cfg(windows)]
        {
            let display = logical.display().to_string();
            if display.len() > WINDOWS_MAX_PATH && !display.starts_with(r"\\?\") {
                return PathBuf::from(format!(r"\\?\{display}"));
            }
        }
        logical.to_path_buf()
    }

    /// Poll for existence-and-directory-ness of the logical path within the
    /// retry budget
    async fn verify_directory(&self, logical: &Path, policy: RetryPolicy) -> bool {
        for attempt in 1..=policy.max_attempts {
            if logical.is_dir() {
                return true;
            }
            debug!(
                path = %logical.display(),
                attempt,
                max_attempts = policy.max_attempts,
                "directory not yet visible"
            );
            if attempt < policy.max_attempts {
                sleep(policy.delay).await;
            }
        }
        false
    }

    /// Create-if-absent plus bounded verification for one fixed
    /// subdirectory. Returns the outcome and an optional warning; a failure
    /// here never aborts provisioning of the remaining subdirectories.
    async fn provision_subdirectory(
        &self,
        project_root: &Path,
        name: &str,
        policy: RetryPolicy,
    ) -> (SubdirectoryOutcome, Option<String>) {
        let logical = project_root.join(name);
        if logical.is_dir() {
            return (SubdirectoryOutcome::pre_existing(name), None);
        }

        if let Err(e) = std::fs::create_dir_all(Self::creation_path(&logical)) {
            warn!(path = %logical.display(), error = %e, "subdirectory creation failed");
            return (
                SubdirectoryOutcome::failed(name, format!("failed to create subdirectory: {e}")),
                None,
            );
        }

        if self.verify_directory(&logical, policy).await {
            (SubdirectoryOutcome::created(name), None)
        } else {
            (
                SubdirectoryOutcome::created(name),
                Some(format!(
                    "subdirectory '{name}' was created but is not yet visible; check sync status"
                )),
            )
        }
    }
}

#[async_trait]
impl ProvisioningService for StandardProvisioningService {
    async fn provision_project_directory(
        &self,
        tenant: TenantId,
        project_identifier: &str,
    ) -> ProvisioningResult {
        info!(%tenant, project = project_identifier, "provisioning project directory");

        let base = self.resolver.resolve(tenant).await;
        let base_str = base.path.display().to_string();

        let check = self.validator.validate(&base_str);
        if !check.valid || !check.writable {
            let detail = check
                .error
                .unwrap_or_else(|| "unknown validation failure".to_string());
            warn!(%tenant, base_path = %base_str, %detail, "storage root unusable");
            return ProvisioningResult::hard_failure(
                &base_str,
                format!("storage root '{base_str}' is invalid or not writable: {detail}"),
            );
        }

        let segment = self.sanitizer.sanitize(project_identifier);
        let logical = base.path.join(segment.as_str());
        let logical_str = logical.display().to_string();
        let policy = self.retry_policy_for(&logical_str);

        let mut result = ProvisioningResult::succeeded(&logical_str);

        if logical.is_dir() {
            debug!(path = %logical_str, "project directory already present");
        } else {
            if let Err(e) = std::fs::create_dir_all(Self::creation_path(&logical)) {
                error!(%tenant, path = %logical_str, error = %e, "project directory creation failed");
                return ProvisioningResult::hard_failure(
                    &logical_str,
                    format!("failed to create project directory: {e}"),
                );
            }

            if !self.verify_directory(&logical, policy).await {
                warn!(%tenant, path = %logical_str, "project directory not visible within retry budget");
                result.warnings.push(
                    "project folder may have been created but is not yet visible; check sync status"
                        .to_string(),
                );
            }
        }

        if let Err(e) = self.validator.probe_writable(&logical) {
            warn!(%tenant, path = %logical_str, error = %e, "project directory write probe failed");
            result
                .warnings
                .push(format!("project folder write check failed: {e}"));
        }

        for name in PROJECT_SUBDIRECTORIES {
            let (outcome, warning) = self.provision_subdirectory(&logical, name, policy).await;
            if let Some(warning) = warning {
                result.warnings.push(warning);
            }
            result.subdirectories.push(outcome);
        }

        info!(
            %tenant,
            path = %logical_str,
            warnings = result.warnings.len(),
            "project directory provisioned"
        );
        result
    }
}
