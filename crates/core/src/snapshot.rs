//! Snapshot persistence. Writes are all-or-nothing: the catalog is written
//! to a sibling temp file and renamed into place, so a concurrent reader
//! never observes a truncated snapshot.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::models::Catalog;

pub fn write(catalog: &Catalog, path: &Path) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec(catalog).context("serialize catalog")?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(".").to_path_buf());
    fs::create_dir_all(&parent)
        .with_context(|| format!("create snapshot dir {}", parent.display()))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("snapshot");
    let tmp_path = parent.join(format!(".{}.tmp-{}", file_name, std::process::id()));

    {
        let mut file = File::create(&tmp_path)
            .with_context(|| format!("create {}", tmp_path.display()))?;
        file.write_all(&bytes)
            .with_context(|| format!("write {}", tmp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("sync {}", tmp_path.display()))?;
    }

    fs::rename(&tmp_path, path)
        .with_context(|| format!("publish {}", path.display()))?;
    Ok(())
}

pub fn load(path: &Path) -> anyhow::Result<Catalog> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}
