// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::application::diagnostics::DiagnosticRunner;
use crate::application::provisioning::ProvisioningService;
use crate::domain::tenant::TenantId;

pub struct AppState {
    pub provisioning_service: Arc<dyn ProvisioningService>,
    pub diagnostic_runner: Arc<DiagnosticRunner>,
}

pub fn app(
    provisioning_service: Arc<dyn ProvisioningService>,
    diagnostic_runner: Arc<DiagnosticRunner>,
) -> Router {
    let state = Arc::new(AppState {
        provisioning_service,
        diagnostic_runner,
    });

    Router::new()
        .route(
            "/tenants/{tenant_id}/projects/{project_number}/directory",
            post(provision_project_directory),
        )
        .route(
            "/tenants/{tenant_id}/diagnostics/storage",
            post(run_storage_diagnostic),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Idempotent create/retry endpoint for a project's directory tree.
async fn provision_project_directory(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, project_number)): Path<(i64, String)>,
) -> impl IntoResponse {
    let result = state
        .provisioning_service
        .provision_project_directory(TenantId(tenant_id), &project_number)
        .await;
    Json(result)
}

/// Operator-facing storage diagnostic; never touches real project data.
async fn run_storage_diagnostic(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<i64>,
) -> impl IntoResponse {
    let report = state
        .diagnostic_runner
        .run_diagnostic(TenantId(tenant_id))
        .await;
    Json(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::base_path::BasePathResolver;
    use crate::application::provisioning::StandardProvisioningService;
    use crate::domain::provisioning::ProvisioningConfig;
    use crate::domain::settings::PROJECT_ROOT_SETTING;
    use crate::infrastructure::settings::InMemorySettingsStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(base: &std::path::Path) -> Router {
        let store = Arc::new(InMemorySettingsStore::new());
        store.set_for_tenant(TenantId(7), PROJECT_ROOT_SETTING, &base.to_string_lossy());

        let config = ProvisioningConfig {
            cloud_retry_attempts: 2,
            cloud_retry_delay_ms: 0,
            local_retry_attempts: 2,
            local_retry_delay_ms: 0,
        };
        let service = Arc::new(StandardProvisioningService::with_config(
            BasePathResolver::new(store.clone()),
            &config,
        ));
        let runner = Arc::new(DiagnosticRunner::new(BasePathResolver::new(store)));

        app(service, runner)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_provision_endpoint_returns_result_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(temp_dir.path());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tenants/7/projects/02-2026-0019/directory")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert!(json["path"].as_str().unwrap().ends_with("02-2026-0019"));
        assert!(json.get("error").is_none());
        assert!(json["subdirectories"].as_array().unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_provision_endpoint_reports_hard_failure_in_body() {
        let store = Arc::new(InMemorySettingsStore::new());
        store.set_for_tenant(TenantId(7), PROJECT_ROOT_SETTING, "/does/not/exist");
        let service = Arc::new(StandardProvisioningService::new(BasePathResolver::new(
            store.clone(),
        )));
        let runner = Arc::new(DiagnosticRunner::new(BasePathResolver::new(store)));
        let app = app(service, runner);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tenants/7/projects/02-2026-0019/directory")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Expected failure modes travel in the result body, not as HTTP errors.
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("/does/not/exist"));
        assert_eq!(json["subdirectories"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_diagnostic_endpoint_reports_four_steps() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(temp_dir.path());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tenants/7/diagnostics/storage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["healthy"], true);
        assert_eq!(json["steps"].as_array().unwrap().len(), 4);
    }
}
