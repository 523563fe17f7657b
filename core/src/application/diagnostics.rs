// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0

//! Storage Diagnostic Application Service
//!
//! Re-executes the resolve/validate/create/cleanup sequence against a
//! disposable probe directory so an operator can diagnose configuration
//! problems without touching real project data. Each step is isolated: a
//! failure never prevents the remaining steps from running and reporting.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::base_path::{BasePathResolver, BasePathSource};
use crate::domain::provisioning::{
    DiagnosticReport, DiagnosticStep, STEP_BASE_PATH_RESOLUTION, STEP_BASE_PATH_VALIDATION,
    STEP_PROBE_DIRECTORY, STEP_SETTINGS_STORE,
};
use crate::domain::tenant::TenantId;
use crate::infrastructure::path_probe::PathValidator;

/// Diagnostic runner
///
/// Shares the resolver and validator with the provisioning engine but never
/// its mutating path for real projects; always safe to re-run.
pub struct DiagnosticRunner {
    resolver: BasePathResolver,
    validator: PathValidator,
}

impl DiagnosticRunner {
    pub fn new(resolver: BasePathResolver) -> Self {
        Self {
            resolver,
            validator: PathValidator::new(),
        }
    }

    /// Run the four-step storage diagnostic for a tenant
    pub async fn run_diagnostic(&self, tenant: TenantId) -> DiagnosticReport {
        info!(%tenant, "running storage diagnostic");
        let mut steps = Vec::with_capacity(4);

        match self.resolver.probe_settings(tenant).await {
            Ok(Some(value)) => steps.push(DiagnosticStep::passed(
                STEP_SETTINGS_STORE,
                Some(format!("configured storage root: {value}")),
            )),
            Ok(None) => steps.push(DiagnosticStep::passed(
                STEP_SETTINGS_STORE,
                Some("reachable, no storage root configured".to_string()),
            )),
            Err(error) => steps.push(DiagnosticStep::failed(
                STEP_SETTINGS_STORE,
                error.to_string(),
            )),
        }

        let resolved = self.resolver.resolve(tenant).await;
        let base_str = resolved.path.display().to_string();
        let source = match resolved.source {
            BasePathSource::Configured => "configured",
            BasePathSource::Fallback => "fallback",
        };
        steps.push(DiagnosticStep::passed(
            STEP_BASE_PATH_RESOLUTION,
            Some(format!("{base_str} ({source})")),
        ));

        let check = self.validator.validate(&base_str);
        if check.valid && check.writable {
            steps.push(DiagnosticStep::passed(
                STEP_BASE_PATH_VALIDATION,
                Some("exists, is a directory, writable".to_string()),
            ));
        } else {
            steps.push(DiagnosticStep::failed(
                STEP_BASE_PATH_VALIDATION,
                check
                    .error
                    .unwrap_or_else(|| "unknown validation failure".to_string()),
            ));
        }

        match self.probe_cycle(&resolved.path) {
            Ok(()) => steps.push(DiagnosticStep::passed(
                STEP_PROBE_DIRECTORY,
                Some("create/verify/cleanup cycle completed".to_string()),
            )),
            Err(error) => steps.push(DiagnosticStep::failed(
                STEP_PROBE_DIRECTORY,
                format!("{error:#}"),
            )),
        }

        let report = DiagnosticReport::from_steps(tenant, steps);
        info!(%tenant, healthy = report.healthy, "storage diagnostic finished");
        report
    }

    /// Full create-verify-cleanup cycle against a throwaway directory under
    /// the resolved root. The probe directory is removed afterward
    /// regardless of outcome.
    fn probe_cycle(&self, base: &Path) -> Result<()> {
        let probe_dir: PathBuf = base.join(format!(".fieldlab-diagnostic-{}", Uuid::new_v4()));
        let outcome = self.probe_cycle_inner(&probe_dir);

        if probe_dir.exists() {
            if let Err(error) = std::fs::remove_dir_all(&probe_dir) {
                warn!(path = %probe_dir.display(), %error, "failed to remove diagnostic probe directory");
            }
        }

        outcome
    }

    fn probe_cycle_inner(&self, probe_dir: &Path) -> Result<()> {
        std::fs::create_dir(probe_dir).with_context(|| {
            format!("failed to create probe directory {}", probe_dir.display())
        })?;

        if !probe_dir.is_dir() {
            anyhow::bail!(
                "probe directory {} not visible after creation",
                probe_dir.display()
            );
        }

        self.validator
            .probe_writable(probe_dir)
            .map_err(anyhow::Error::msg)
            .context("probe directory write test failed")?;

        Ok(())
    }
}
