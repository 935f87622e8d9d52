//! Full rebuild pipeline: scan, dedup, classify, assemble, publish.
//!
//! Single-threaded and run-to-completion; every build is a full rebuild from
//! a fresh filesystem scan.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::catalog::{build_catalog, build_document};
use crate::config::AppConfig;
use crate::dedup::group_versions;
use crate::models::Catalog;
use crate::scanner::{build_globset, scan};
use crate::snapshot;

#[derive(Debug)]
pub struct BuildSummary {
    pub raw_files: usize,
    pub indexed: usize,
    pub snapshot_path: PathBuf,
}

/// Runs one full rebuild and atomically publishes the snapshot. Failure to
/// write the snapshot is fatal; scan-level problems are skipped entries.
pub fn run(cfg: &AppConfig) -> anyhow::Result<BuildSummary> {
    let catalog = build(cfg)?;
    let summary = BuildSummary {
        raw_files: catalog.total_raw_files,
        indexed: catalog.total_indexed_latest,
        snapshot_path: PathBuf::from(&cfg.snapshot.path),
    };

    snapshot::write(&catalog, &summary.snapshot_path).context("publish snapshot")?;
    info!(
        path = %summary.snapshot_path.display(),
        raw = summary.raw_files,
        indexed = summary.indexed,
        "snapshot published"
    );
    Ok(summary)
}

/// Builds the catalog in memory without publishing it.
pub fn build(cfg: &AppConfig) -> anyhow::Result<Catalog> {
    let excludes = build_globset(&cfg.scan.exclude).context("scan exclude patterns")?;
    let qual_folder = cfg.scan.qualification_folder.to_lowercase();

    info!(root = %cfg.scan.root, "starting scan");
    let records = scan(Path::new(&cfg.scan.root), &excludes);
    let raw_files = records.len();
    info!(files = raw_files, "scan complete");

    let groups = group_versions(records);
    info!(groups = groups.len(), "version dedup complete");

    let documents = groups
        .iter()
        .map(|group| build_document(group, &qual_folder))
        .collect();

    Ok(build_catalog(&cfg.scan.root, raw_files, documents))
}
