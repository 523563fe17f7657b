// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0
//! Provisioning Value Objects
//!
//! The result and report types returned by the provisioning engine and the
//! diagnostic runner, the fixed project subdirectory set, and the retry
//! policy configuration. Results are constructed fresh per call, immutable
//! once returned, and replace exceptions for every expected failure mode:
//! callers decide whether to surface, log, or retry based on their contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::tenant::TenantId;

/// Fixed set of categorical folders created under every project root.
///
/// One folder per report/test type produced in the field. Treated as
/// configuration data; changing it only affects newly provisioned projects.
pub const PROJECT_SUBDIRECTORIES: &[&str] = &[
    "plate-load-tests",
    "density-tests",
    "proctor-tests",
    "sieve-analyses",
    "site-photos",
    "reports",
];

// ============================================================================
// Retry Configuration
// ============================================================================

fn default_cloud_retry_attempts() -> u32 {
    5
}

fn default_cloud_retry_delay_ms() -> u64 {
    1000
}

fn default_local_retry_attempts() -> u32 {
    2
}

fn default_local_retry_delay_ms() -> u64 {
    500
}

/// Verification retry tuning for the provisioning engine
///
/// Cloud-synced paths get a larger budget with longer spacing to absorb
/// replication lag; local paths get a small, fast budget that only covers
/// transient OS scheduling noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Verification attempts against cloud-synced paths
    #[serde(default = "default_cloud_retry_attempts")]
    pub cloud_retry_attempts: u32,

    /// Delay between verification attempts on cloud-synced paths (ms)
    #[serde(default = "default_cloud_retry_delay_ms")]
    pub cloud_retry_delay_ms: u64,

    /// Verification attempts against local paths
    #[serde(default = "default_local_retry_attempts")]
    pub local_retry_attempts: u32,

    /// Delay between verification attempts on local paths (ms)
    #[serde(default = "default_local_retry_delay_ms")]
    pub local_retry_delay_ms: u64,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            cloud_retry_attempts: default_cloud_retry_attempts(),
            cloud_retry_delay_ms: default_cloud_retry_delay_ms(),
            local_retry_attempts: default_local_retry_attempts(),
            local_retry_delay_ms: default_local_retry_delay_ms(),
        }
    }
}

impl ProvisioningConfig {
    /// Retry policy applied to cloud-synced paths
    pub fn cloud_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.cloud_retry_attempts,
            delay: Duration::from_millis(self.cloud_retry_delay_ms),
        }
    }

    /// Retry policy applied to local paths
    pub fn local_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.local_retry_attempts,
            delay: Duration::from_millis(self.local_retry_delay_ms),
        }
    }
}

/// Bounded retry budget for a single verification loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

// ============================================================================
// Provisioning Result
// ============================================================================

/// Outcome of provisioning one fixed subdirectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubdirectoryOutcome {
    pub name: String,
    /// `false` when the directory already existed
    pub created: bool,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubdirectoryOutcome {
    pub fn created(name: &str) -> Self {
        Self {
            name: name.to_string(),
            created: true,
            success: true,
            error: None,
        }
    }

    pub fn pre_existing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            created: false,
            success: true,
            error: None,
        }
    }

    pub fn failed(name: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            created: false,
            success: false,
            error: Some(error),
        }
    }
}

/// Result of one provisioning call
///
/// `success` reflects only the project root itself: it is `false` solely for
/// the hard-failure exits (unusable base path, OS error creating the root).
/// Verification lag, write-probe failures, and individual subdirectory
/// problems are reported as warnings and per-subdirectory outcomes alongside
/// an overall success, because their most likely cause is replication lag
/// that resolves without caller action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningResult {
    pub success: bool,
    /// Logical project path in its human-meaningful form
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub warnings: Vec<String>,
    pub subdirectories: Vec<SubdirectoryOutcome>,
}

impl ProvisioningResult {
    /// Successful scaffold for the given logical path; warnings and
    /// subdirectory outcomes are appended as provisioning proceeds.
    pub fn succeeded(path: &str) -> Self {
        Self {
            success: true,
            path: path.to_string(),
            error: None,
            warnings: Vec::new(),
            subdirectories: Vec::new(),
        }
    }

    /// Hard failure requiring operator or configuration intervention.
    /// No subdirectory provisioning is attempted.
    pub fn hard_failure(path: &str, error: String) -> Self {
        Self {
            success: false,
            path: path.to_string(),
            error: Some(error),
            warnings: Vec::new(),
            subdirectories: Vec::new(),
        }
    }
}

// ============================================================================
// Diagnostic Report
// ============================================================================

/// Name of the settings-store reachability step
pub const STEP_SETTINGS_STORE: &str = "settings-store";
/// Name of the base path resolution step
pub const STEP_BASE_PATH_RESOLUTION: &str = "base-path-resolution";
/// Name of the base path validation step
pub const STEP_BASE_PATH_VALIDATION: &str = "base-path-validation";
/// Name of the probe directory create-verify-cleanup step
pub const STEP_PROBE_DIRECTORY: &str = "probe-directory-cycle";

/// One independently-executed diagnostic step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticStep {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DiagnosticStep {
    pub fn passed(name: &str, detail: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            detail,
        }
    }

    pub fn failed(name: &str, detail: String) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            detail: Some(detail),
        }
    }
}

/// Report produced by the diagnostic runner
///
/// Every step is recorded even when an earlier one failed, so an operator
/// sees the full picture rather than the first problem only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub tenant_id: TenantId,
    pub ran_at: DateTime<Utc>,
    pub healthy: bool,
    pub steps: Vec<DiagnosticStep>,
}

impl DiagnosticReport {
    pub fn from_steps(tenant_id: TenantId, steps: Vec<DiagnosticStep>) -> Self {
        Self {
            tenant_id,
            ran_at: Utc::now(),
            healthy: steps.iter().all(|step| step.success),
            steps,
        }
    }
}
