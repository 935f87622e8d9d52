//! Walks the shared document tree and produces flat file records.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::models::FileRecord;

pub fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}

/// Scans `root` recursively. Excluded directories are pruned before descent
/// so their contents are never visited; only the exclude patterns prune,
/// so a hidden directory outside them is still traversed. Dot-prefixed file
/// names and non-regular files are skipped; entries that fail to stat are
/// skipped with a debug log and the walk continues.
pub fn scan(root: &Path, excludes: &GlobSet) -> Vec<FileRecord> {
    let mut records = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !excludes.is_match(e.path()));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping entry without metadata");
                continue;
            }
        };
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };
        if name.starts_with('.') {
            continue;
        }
        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        records.push(FileRecord {
            ext: extension_of(&name),
            name,
            path: path.to_string_lossy().into_owned(),
            mtime,
            size: meta.len(),
        });
    }
    records
}

fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn default_excludes() -> GlobSet {
        build_globset(&[
            "**/.git".to_string(),
            "**/.stfolder".to_string(),
            "**/.stversions".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn skips_control_dirs_and_hidden_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::create_dir_all(temp.path().join(".stversions/old")).unwrap();
        fs::create_dir_all(temp.path().join("项目")).unwrap();
        fs::write(temp.path().join(".git/config"), "x").unwrap();
        fs::write(temp.path().join(".stversions/old/方案.docx"), "x").unwrap();
        fs::write(temp.path().join(".hidden.txt"), "x").unwrap();
        fs::write(temp.path().join("项目/方案.docx"), "x").unwrap();

        let records = scan(temp.path(), &default_excludes());
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["方案.docx"]);
    }

    #[test]
    fn hidden_dirs_outside_excludes_are_still_traversed() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join(".backup")).unwrap();
        fs::write(temp.path().join(".backup/归档方案.docx"), "x").unwrap();
        fs::write(temp.path().join(".backup/.draft.docx"), "x").unwrap();

        let records = scan(temp.path(), &default_excludes());
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        // Only the exclude patterns prune directories; dot-prefixed file
        // names are skipped wherever they live.
        assert_eq!(names, vec!["归档方案.docx"]);
    }

    #[test]
    fn records_carry_lowercased_extension() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("Report.PDF"), "x").unwrap();
        fs::write(temp.path().join("noext"), "x").unwrap();

        let mut records = scan(temp.path(), &default_excludes());
        records.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(records[0].ext, ".pdf");
        assert_eq!(records[1].ext, "");
        assert!(records[0].size > 0);
        assert!(records[0].mtime > 0);
    }
}
