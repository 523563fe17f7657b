// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0

//! Filesystem Path Probing
//!
//! Best-effort checks for candidate storage paths: existence, directory-ness
//! and genuine write capability, plus the cloud-sync classification that
//! feeds the provisioning engine's retry policy. Every probe is wrapped so
//! unexpected OS errors are captured into the returned value, never
//! propagated as an unhandled fault.

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Case-insensitive markers identifying paths mirrored by cloud-sync clients.
///
/// Heuristic with false negatives allowed; a miss only means the shorter
/// local retry budget is applied.
const CLOUD_SYNC_MARKERS: &[&str] = &[
    "dropbox",
    "onedrive",
    "google drive",
    "googledrive",
    "icloud",
    "nextcloud",
    "owncloud",
    "seafile",
];

/// Characters never valid inside a directory path on the strictest
/// supported platform. `:` is absent because it is legal as the Windows
/// drive separator.
const FORBIDDEN_PATH_CHARS: &[char] = &['<', '>', '"', '|', '*', '?'];

/// Result of validating a candidate storage path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathCheck {
    pub valid: bool,
    pub writable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PathCheck {
    fn invalid(error: String) -> Self {
        Self {
            valid: false,
            writable: false,
            error: Some(error),
        }
    }

    fn usable() -> Self {
        Self {
            valid: true,
            writable: true,
            error: None,
        }
    }

    fn not_writable(error: String) -> Self {
        Self {
            valid: true,
            writable: false,
            error: Some(error),
        }
    }
}

/// Path validator infrastructure service
///
/// Checks short-circuit on the first failure, in order: non-empty path,
/// forbidden characters, existence, directory-ness, writability. Write
/// capability is verified by round-tripping a probe file rather than by
/// permission bits, which lie on network and cloud-synced mounts.
pub struct PathValidator;

impl PathValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a candidate base or project path
    pub fn validate(&self, path: &str) -> PathCheck {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return PathCheck::invalid("path is empty".to_string());
        }

        if let Some(c) = Self::forbidden_char(trimmed) {
            return PathCheck::invalid(format!("path contains forbidden character {c:?}"));
        }

        let candidate = Path::new(trimmed);
        if !candidate.exists() {
            return PathCheck::invalid(format!("path does not exist: {trimmed}"));
        }

        if !candidate.is_dir() {
            return PathCheck::invalid(format!("path is not a directory: {trimmed}"));
        }

        match self.probe_writable(candidate) {
            Ok(()) => PathCheck::usable(),
            Err(error) => PathCheck::not_writable(error),
        }
    }

    /// Verify write access by creating and removing a uniquely-named
    /// zero-byte probe file inside the directory
    ///
    /// Any OS error is reported as a message, never propagated. No file
    /// handle outlives the probe.
    pub fn probe_writable(&self, dir: &Path) -> Result<(), String> {
        let probe = dir.join(format!(".fieldlab-probe-{}", Uuid::new_v4()));
        std::fs::write(&probe, b"")
            .map_err(|e| format!("directory is not writable: {e}"))?;
        std::fs::remove_file(&probe)
            .map_err(|e| format!("failed to remove probe file {}: {e}", probe.display()))?;
        Ok(())
    }

    /// Classify whether a path is backed by a cloud-sync client
    ///
    /// Side-channel predicate, not part of the pass/fail chain; it only
    /// selects the verification retry budget.
    pub fn is_cloud_synced(&self, path: &str) -> bool {
        let lowered = path.to_lowercase();
        CLOUD_SYNC_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
    }

    fn forbidden_char(path: &str) -> Option<char> {
        path.chars()
            .find(|c| FORBIDDEN_PATH_CHARS.contains(c) || c.is_control())
    }
}

impl Default for PathValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_writable_directory() {
        let temp_dir = TempDir::new().unwrap();
        let validator = PathValidator::new();

        let check = validator.validate(&temp_dir.path().to_string_lossy());
        assert!(check.valid);
        assert!(check.writable);
        assert!(check.error.is_none());
    }

    #[test]
    fn test_probe_leaves_no_residue() {
        let temp_dir = TempDir::new().unwrap();
        let validator = PathValidator::new();

        validator.probe_writable(temp_dir.path()).unwrap();
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_path_invalid() {
        let validator = PathValidator::new();
        let check = validator.validate("   ");
        assert!(!check.valid);
        assert!(check.error.unwrap().contains("empty"));
    }

    #[test]
    fn test_missing_path_invalid() {
        let validator = PathValidator::new();
        let check = validator.validate("/does/not/exist");
        assert!(!check.valid);
        assert!(!check.writable);
        assert!(check.error.unwrap().contains("does not exist"));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("report.pdf");
        std::fs::write(&file_path, b"x").unwrap();

        let validator = PathValidator::new();
        let check = validator.validate(&file_path.to_string_lossy());
        assert!(!check.valid);
        assert!(check.error.unwrap().contains("not a directory"));
    }

    #[test]
    fn test_forbidden_characters_rejected() {
        let validator = PathValidator::new();
        let check = validator.validate("/srv/pro|jects");
        assert!(!check.valid);
        assert!(check.error.unwrap().contains("forbidden character"));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_directory_not_writable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Mode bits are not enforced for root.
        if std::fs::write(locked.join(".w"), b"").is_ok() {
            return;
        }

        let validator = PathValidator::new();
        let check = validator.validate(&locked.to_string_lossy());
        assert!(check.valid);
        assert!(!check.writable);
        assert!(check.error.is_some());

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_cloud_sync_classification() {
        let validator = PathValidator::new();

        assert!(validator.is_cloud_synced("/home/anna/Dropbox/fieldlab"));
        assert!(validator.is_cloud_synced("C:\\Users\\anna\\OneDrive\\Projekte"));
        assert!(validator.is_cloud_synced("/mnt/Google Drive/shared"));
        assert!(validator.is_cloud_synced("/data/nextcloud/files"));
        assert!(!validator.is_cloud_synced("/srv/fieldlab/projects"));
    }

    #[test]
    fn test_cloud_sync_classification_is_case_insensitive() {
        let validator = PathValidator::new();
        assert!(validator.is_cloud_synced("/home/anna/DROPBOX/fieldlab"));
        assert!(validator.is_cloud_synced("/home/anna/dropbox/fieldlab"));
    }
}
