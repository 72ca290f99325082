// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collecting results from report documents on disk.

use crate::{
    errors::CollectError,
    helpers::plural,
    parser::ReportParser,
    record::ResultRecord,
};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// The file extension of report documents.
pub const REPORT_EXTENSION: &str = "xml";

/// Finds report documents under a set of paths and parses them.
#[derive(Clone, Debug, Default)]
pub struct ResultCollector {
    parser: ReportParser,
}

impl ResultCollector {
    /// Creates a new collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects results from every report document found under `paths`.
    ///
    /// Each path may be a report document or a directory. Directories are searched recursively in
    /// lexical order. Files that aren't `.xml` are skipped.
    ///
    /// If any document fails to be read or parsed, the whole collection fails.
    pub fn collect<'a>(
        &self,
        paths: impl IntoIterator<Item = &'a Utf8Path>,
    ) -> Result<Vec<ResultRecord>, CollectError> {
        let mut records = Vec::new();
        let mut documents = 0;

        for path in paths {
            if path.is_file() {
                if is_report(path) {
                    records.extend(self.parse_document(path)?);
                    documents += 1;
                } else {
                    debug!("skipping `{path}`: not a report");
                }
            } else if path.is_dir() {
                documents += self.collect_dir(path, &mut records)?;
            } else {
                return Err(CollectError::PathNotFound {
                    path: path.to_owned(),
                });
            }
        }

        debug!(
            "collected {} {} from {} {}",
            records.len(),
            plural::results_str(records.len()),
            documents,
            plural::reports_str(documents),
        );
        Ok(records)
    }

    fn collect_dir(
        &self,
        root: &Utf8Path,
        records: &mut Vec<ResultRecord>,
    ) -> Result<usize, CollectError> {
        let mut documents = 0;
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|err| CollectError::Walk {
                root: root.to_owned(),
                err,
            })?;
            // Symlinks to files are reports too, but symlinked directories aren't descended into.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let path = Utf8PathBuf::try_from(entry.into_path()).map_err(|err| {
                CollectError::NonUtf8Path {
                    path: err.into_path_buf(),
                }
            })?;
            if !is_report(&path) {
                continue;
            }

            records.extend(self.parse_document(&path)?);
            documents += 1;
        }

        Ok(documents)
    }

    fn parse_document(&self, path: &Utf8Path) -> Result<Vec<ResultRecord>, CollectError> {
        let contents =
            fs_err::read_to_string(path).map_err(|err| CollectError::ReadDocument {
                path: path.to_owned(),
                err,
            })?;
        let records = self
            .parser
            .parse_str(&contents)
            .map_err(|err| CollectError::ParseDocument {
                path: path.to_owned(),
                err,
            })?;

        debug!(
            "parsed {} {} from `{path}`",
            records.len(),
            plural::results_str(records.len()),
        );
        Ok(records)
    }
}

/// Collects results from every report document found under `paths`.
///
/// This is a shortcut for [`ResultCollector::collect`].
pub fn collect_results<'a>(
    paths: impl IntoIterator<Item = &'a Utf8Path>,
) -> Result<Vec<ResultRecord>, CollectError> {
    ResultCollector::new().collect(paths)
}

fn is_report(path: &Utf8Path) -> bool {
    path.extension() == Some(REPORT_EXTENSION)
}
