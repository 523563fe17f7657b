// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

/// Unique identifier for a tenant
///
/// Every settings lookup and every provisioned directory is partitioned by
/// tenant. The identifier is owned by the surrounding platform; this core
/// passes it through on each call and never caches it, because tenant
/// settings can change between invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub i64);

impl TenantId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl From<i64> for TenantId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
