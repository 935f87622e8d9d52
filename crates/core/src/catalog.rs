//! Assembles classified documents into the persisted catalog snapshot.

use chrono::{DateTime, Datelike, Local, TimeZone};

use crate::classifier::{detect_category, detect_industry, project_name};
use crate::dedup::DedupGroup;
use crate::models::{Catalog, CategoryCount, Document, OrderedMap};
use crate::taxonomy::{CATCH_ALL_CATEGORY, CATEGORY_ORDER, OTHER_INDUSTRY, OTHER_SUBTAG, TAG_TREE};

/// Substituted when an mtime does not convert to a sane calendar date.
pub const FALLBACK_DATE: &str = "2025-12-30";
pub const FALLBACK_TIMESTAMP: &str = "2025-12-30 00:00:00";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts a raw mtime to (date, timestamp, fallback flag). Epoch-zero and
/// far-future sentinels would otherwise float to the top of the recency sort.
pub fn calendar_from_mtime(mtime: i64) -> (String, String, bool) {
    let converted: Option<DateTime<Local>> = Local.timestamp_opt(mtime, 0).single();
    match converted {
        Some(dt) if (1990..=2100).contains(&dt.year()) => (
            dt.format(DATE_FORMAT).to_string(),
            dt.format(TIMESTAMP_FORMAT).to_string(),
            false,
        ),
        _ => (FALLBACK_DATE.to_string(), FALLBACK_TIMESTAMP.to_string(), true),
    }
}

/// Builds one document from a dedup group's canonical record.
pub fn build_document(group: &DedupGroup, qual_folder: &str) -> Document {
    let canonical = &group.canonical;
    let category = detect_category(&canonical.path, &canonical.ext, &canonical.name, qual_folder);
    let (time, updated_at, timestamp_fallback) = calendar_from_mtime(canonical.mtime);
    let (primary, secondary) = detect_industry(&canonical.path, &canonical.name);

    Document {
        title: canonical.name.clone(),
        project_name: project_name(&canonical.path, &canonical.name, category),
        category: category.to_string(),
        industry_type: primary.clone(),
        industry_primary: primary,
        industry_secondary: secondary,
        time,
        presale_name: String::new(),
        updated_at,
        timestamp_fallback,
        history_versions: group.history.iter().map(|r| r.path.clone()).collect(),
        file_path: canonical.path.clone(),
        size: canonical.size,
        ext: canonical.ext.clone(),
    }
}

/// Groups documents into the fixed-order category buckets, sorts each bucket
/// by updated_at descending and computes the summary counts.
pub fn build_catalog(root: &str, total_raw_files: usize, documents: Vec<Document>) -> Catalog {
    let total_indexed_latest = documents.len();

    let mut by_category: OrderedMap<Vec<Document>> = OrderedMap::new();
    for category in CATEGORY_ORDER {
        by_category.insert(category, Vec::new());
    }
    for doc in documents {
        match by_category.get_mut(&doc.category) {
            Some(bucket) => bucket.push(doc),
            // The classifier is total over CATEGORY_ORDER, but an unknown
            // label still has a home in the catch-all bucket.
            None => by_category
                .get_mut(CATCH_ALL_CATEGORY)
                .expect("catch-all bucket")
                .push(doc),
        }
    }
    for category in CATEGORY_ORDER {
        if let Some(bucket) = by_category.get_mut(category) {
            bucket.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        }
    }

    let categories = CATEGORY_ORDER
        .iter()
        .map(|c| CategoryCount {
            name: c.to_string(),
            count: by_category.get(c).map(|b| b.len()).unwrap_or(0),
        })
        .collect();

    let mut tag_tree: OrderedMap<Vec<String>> = OrderedMap::new();
    for primary in TAG_TREE {
        let mut subs: Vec<String> = primary.sub_tags.iter().map(|s| s.name.to_string()).collect();
        if primary.name != OTHER_INDUSTRY {
            subs.push(OTHER_SUBTAG.to_string());
        }
        tag_tree.insert(primary.name, subs);
    }

    Catalog {
        generated_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        root: root.to_string(),
        total_raw_files,
        total_indexed_latest,
        categories,
        tag_tree,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileRecord;

    fn group(name: &str, path: &str, ext: &str, mtime: i64) -> DedupGroup {
        DedupGroup {
            canonical: FileRecord {
                name: name.to_string(),
                path: path.to_string(),
                ext: ext.to_string(),
                mtime,
                size: 10,
            },
            history: Vec::new(),
        }
    }

    #[test]
    fn epoch_zero_mtime_uses_fallback_timestamp() {
        let doc = build_document(&group("方案.docx", "/kb/方案.docx", ".docx", 0), "");
        assert!(doc.timestamp_fallback);
        assert_eq!(doc.time, FALLBACK_DATE);
        assert_eq!(doc.updated_at, FALLBACK_TIMESTAMP);
    }

    #[test]
    fn far_future_mtime_uses_fallback_timestamp() {
        // Year 2103.
        let (_, _, fallback) = calendar_from_mtime(4_200_000_000);
        assert!(fallback);
    }

    #[test]
    fn sane_mtime_is_not_flagged() {
        let (date, ts, fallback) = calendar_from_mtime(1_700_000_000);
        assert!(!fallback);
        assert!(ts.starts_with(&date));
    }

    #[test]
    fn buckets_follow_fixed_order_and_counts_match() {
        let docs = vec![
            build_document(&group("a.pptx", "/kb/a.pptx", ".pptx", 1_700_000_000), ""),
            build_document(&group("招标书.docx", "/kb/招标书.docx", ".docx", 1_700_000_000), ""),
            build_document(&group("b.pptx", "/kb/b.pptx", ".pptx", 1_700_100_000), ""),
        ];
        let catalog = build_catalog("/kb", 3, docs);

        let keys: Vec<&str> = catalog.by_category.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, CATEGORY_ORDER.to_vec());

        assert_eq!(catalog.categories[0].name, "汇报PPT");
        assert_eq!(catalog.categories[0].count, 2);
        let tender = catalog.categories.iter().find(|c| c.name == "招标文档").unwrap();
        assert_eq!(tender.count, 1);
        assert_eq!(catalog.total_indexed_latest, 3);
        assert_eq!(catalog.total_raw_files, 3);
    }

    #[test]
    fn buckets_are_sorted_by_updated_at_descending() {
        let docs = vec![
            build_document(&group("a.pptx", "/kb/a.pptx", ".pptx", 1_700_000_000), ""),
            build_document(&group("b.pptx", "/kb/b.pptx", ".pptx", 1_700_100_000), ""),
        ];
        let catalog = build_catalog("/kb", 2, docs);
        let ppt = catalog.by_category.get("汇报PPT").unwrap();
        assert_eq!(ppt[0].title, "b.pptx");
        assert_eq!(ppt[1].title, "a.pptx");
    }

    #[test]
    fn tag_tree_lists_subtags_with_trailing_other() {
        let catalog = build_catalog("/kb", 0, Vec::new());
        let ai = catalog.tag_tree.get("AI赋能").unwrap();
        assert_eq!(ai.last().map(String::as_str), Some("其他"));
        assert!(ai.contains(&"AI视频分析一体机".to_string()));
        assert_eq!(catalog.tag_tree.get("其他行业").unwrap().len(), 0);
    }
}
