// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0
//! Fieldlab Core
//!
//! Tenant-aware project directory provisioning and verification.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Resolves per-tenant storage roots, idempotently creates
//!   project directory trees, and verifies they are genuinely usable even
//!   when the underlying path is mirrored by a cloud-sync client.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
