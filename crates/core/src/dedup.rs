//! Groups scanned files into version families and picks the canonical copy.

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::debug;

use crate::models::FileRecord;
use crate::normalize::normalize_name;

/// One version family. `canonical` is the most recently modified record;
/// `history` holds the superseded ones, newest first.
#[derive(Debug, Clone)]
pub struct DedupGroup {
    pub canonical: FileRecord,
    pub history: Vec<FileRecord>,
}

/// Groups records by (normalized name, extension) and orders each group by
/// modify-time descending. The sort is stable, so mtime ties keep scan
/// encounter order. Group output order is first-encounter order, which keeps
/// repeated builds over an unchanged tree byte-identical.
pub fn group_versions(records: Vec<FileRecord>) -> Vec<DedupGroup> {
    let mut order: Vec<Vec<FileRecord>> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for record in records {
        let key = (normalize_name(&record.name), record.ext.clone());
        match index.get(&key) {
            Some(&i) => order[i].push(record),
            None => {
                index.insert(key, order.len());
                order.push(vec![record]);
            }
        }
    }

    order
        .into_iter()
        .map(|mut family| {
            family.sort_by_key(|r| Reverse(r.mtime));
            let canonical = family.remove(0);
            warn_on_size_divergence(&canonical, &family);
            DedupGroup {
                canonical,
                history: family,
            }
        })
        .collect()
}

// Normalized-name collisions between unrelated documents are an accepted
// heuristic risk; a wildly diverging size is the one cheap signal we have.
fn warn_on_size_divergence(canonical: &FileRecord, history: &[FileRecord]) {
    for old in history {
        let (big, small) = if canonical.size >= old.size {
            (canonical.size, old.size)
        } else {
            (old.size, canonical.size)
        };
        if small > 0 && big / small >= 50 {
            debug!(
                canonical = %canonical.path,
                history = %old.path,
                "dedup group members differ widely in size; possible name collision"
            );
        }
    }
}
