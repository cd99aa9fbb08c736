// src/scan.rs

//! Change detection for the watched directory.
//!
//! This module is responsible for:
//! - walking the watched tree once per tick,
//! - tracking the modification-time high-water mark across scans,
//! - falling back to a matching-file count so creations and deletions are
//!   noticed even when no timestamp advances.
//!
//! It knows nothing about building or process lifecycle; it only answers
//! "did a source file change since the last scan?".

use std::path::PathBuf;
use std::time::SystemTime;

use ignore::WalkBuilder;
use tracing::{debug, warn};

/// Scans a directory tree for modifications to source files.
///
/// State is updated only by [`ChangeDetector::scan`] and lives for the
/// process lifetime. The high-water mark never decreases; removals that a
/// timestamp comparison would miss are covered by the file count.
#[derive(Debug)]
pub struct ChangeDetector {
    root: PathBuf,
    extension: String,
    last_modification: Option<SystemTime>,
    file_count: usize,
}

impl ChangeDetector {
    /// Create a detector for files with the given extension under `root`.
    ///
    /// A leading dot in the extension is accepted (`".go"` and `"go"` are
    /// equivalent).
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
            last_modification: None,
            file_count: 0,
        }
    }

    /// Walk the watched tree and report whether anything changed.
    ///
    /// Returns `true` if a matching file's modification time is strictly
    /// greater than the high-water mark recorded so far, or if the number of
    /// matching files differs from the previous scan. On a `true` result the
    /// high-water mark is raised to the maximum timestamp observed and the
    /// stored count is updated.
    ///
    /// Per-entry walk and metadata errors are logged as warnings and the
    /// walk continues best-effort; a scan never fails.
    pub fn scan(&mut self) -> bool {
        let mut max_seen: Option<SystemTime> = None;
        let mut count = 0usize;

        // Standard filters stay off: every file under the root is visited,
        // hidden files and ignore files included.
        let walker = WalkBuilder::new(&self.root).standard_filters(false).build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "error walking watched directory");
                    continue;
                }
            };

            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != self.extension {
                continue;
            }

            count += 1;

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "error reading file metadata");
                    continue;
                }
            };

            let modified = match metadata.modified() {
                Ok(time) => time,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "modification time unavailable");
                    continue;
                }
            };

            max_seen = Some(max_seen.map_or(modified, |seen| seen.max(modified)));
        }

        let newer = match (max_seen, self.last_modification) {
            (Some(seen), Some(previous)) => seen > previous,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let changed = newer || count != self.file_count;

        if newer {
            self.last_modification = max_seen;
        }
        if changed {
            debug!(files = count, "source change detected");
            self.file_count = count;
        }

        changed
    }
}
