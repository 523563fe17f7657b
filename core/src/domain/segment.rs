// Copyright (c) 2026 Fieldlab Software GmbH
// SPDX-License-Identifier: AGPL-3.0
//! Project Identifier Sanitizer Domain Service
//!
//! Maps an arbitrary tenant-supplied project identifier to a filesystem-safe
//! folder name. This is a domain service because identifier safety is a core
//! business rule for the provisioning engine, not a technical concern.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements internal responsibilities for segment sanitization

/// Replacement for characters illegal on Windows or POSIX filesystems.
const PLACEHOLDER: char = '_';

/// Substitute segment when nothing usable remains after stripping.
const FALLBACK_SEGMENT: &str = "unnamed";

/// Length bound leaving room for subdirectory names under platform
/// path-length ceilings.
const MAX_SEGMENT_LEN: usize = 200;

/// A filesystem-safe folder-name segment derived from a project identifier.
///
/// Guaranteed non-empty, free of path separators and traversal components,
/// and at most 200 bytes long.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedSegment(String);

impl SanitizedSegment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SanitizedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Segment sanitizer domain service
///
/// Total and deterministic: any input string, including empty or entirely
/// illegal ones, maps to a usable segment. Directory creation downstream
/// must never be blocked by an unsanitizable name.
pub struct SegmentSanitizer {
    max_len: usize,
}

impl SegmentSanitizer {
    /// Create a sanitizer with the default length bound
    pub fn new() -> Self {
        Self {
            max_len: MAX_SEGMENT_LEN,
        }
    }

    /// Create a sanitizer with a custom length bound
    pub fn with_max_length(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Derive a filesystem-safe segment from an arbitrary identifier
    ///
    /// Replaces every character illegal on Windows or POSIX (`\ / : * ? " < > |`
    /// and control characters) with `_`, strips leading/trailing dots and
    /// whitespace (illegal as trailing characters on some platforms),
    /// truncates to the length bound preserving the prefix, and falls back
    /// to `"unnamed"` when nothing remains.
    ///
    /// # Examples
    /// ```
    /// use fieldlab_core::domain::segment::SegmentSanitizer;
    ///
    /// let sanitizer = SegmentSanitizer::new();
    /// assert_eq!(sanitizer.sanitize("02-2026-0019").as_str(), "02-2026-0019");
    /// assert_eq!(sanitizer.sanitize("a/b:c").as_str(), "a_b_c");
    /// assert_eq!(sanitizer.sanitize("").as_str(), "unnamed");
    /// ```
    pub fn sanitize(&self, raw: &str) -> SanitizedSegment {
        let replaced: String = raw
            .chars()
            .map(|c| match c {
                '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => PLACEHOLDER,
                c if c.is_control() => PLACEHOLDER,
                c => c,
            })
            .collect();

        let mut segment = replaced
            .trim_matches(|c: char| c.is_whitespace() || c == '.')
            .to_string();

        if segment.len() > self.max_len {
            let mut end = self.max_len;
            while !segment.is_char_boundary(end) {
                end -= 1;
            }
            segment.truncate(end);
            // The cut can expose a trailing dot or space again.
            let kept = segment
                .trim_end_matches(|c: char| c.is_whitespace() || c == '.')
                .len();
            segment.truncate(kept);
        }

        if segment.is_empty() {
            segment = FALLBACK_SEGMENT.to_string();
        }

        SanitizedSegment(segment)
    }
}

impl Default for SegmentSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
