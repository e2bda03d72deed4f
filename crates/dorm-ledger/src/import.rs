// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resident import affordance: file-type check and submission logging.
//!
//! Spreadsheet contents are not parsed and no state changes on submit.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::LedgerError;

/// Extensions accepted by the import picker (lowercase, without dot).
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// A file chosen for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    path: PathBuf,
    size_bytes: u64,
}

impl ImportRequest {
    /// Accept `path` if its extension is one of [`ACCEPTED_EXTENSIONS`].
    pub fn from_path(path: impl Into<PathBuf>, size_bytes: u64) -> Result<Self, LedgerError> {
        let path = path.into();
        let accepted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(ext))
            });
        if !accepted {
            return Err(LedgerError::UnsupportedImport(path));
        }
        Ok(Self { path, size_bytes })
    }

    /// Selected file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size as reported at selection time.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Human-readable label, e.g. `students.xlsx (12.5 KB)`.
    pub fn label(&self) -> String {
        let name = self
            .path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        format!("{name} ({})", pretty_size(self.size_bytes))
    }

    /// Submit the selection. Only the file reference is logged.
    pub fn submit(self) -> Self {
        info!(file = %self.path.display(), bytes = self.size_bytes, "import file selected");
        self
    }
}

/// Byte count as `B`, `KB` or `MB` with one decimal.
#[allow(clippy::cast_precision_loss)]
pub fn pretty_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}
