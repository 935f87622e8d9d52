//! Filename normalization for version dedup.
//!
//! Produces a lowercase key in which version markers, dates, "final/copy"
//! suffixes and punctuation are stripped, so that "方案v2.docx" and
//! "方案V3.docx" collapse onto the same key. The key is never displayed.

use once_cell::sync::Lazy;
use regex::Regex;

// Strip order matters: the version and date patterns must run before the
// catch-all noise strip, which would otherwise destroy their separators.
static VERSION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\(（\[]?(v|ver|版本)?\s*\d+(\.\d+)*[\)）\]]?").unwrap());
static DATE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}[-_/年]?\d{1,2}[-_/月]?\d{1,2}[日]?").unwrap());
static COPY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(终版|最终版|定稿|副本|copy|new)").unwrap());
static NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\u{4e00}-\u{9fff}]").unwrap());

/// Dedup key for a filename. Two names map to the same key iff they differ
/// only in version/date/copy noise and incidental punctuation; unrelated
/// stems that coincide after stripping will collide, which is accepted.
pub fn normalize_name(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    let base = stem.to_lowercase();
    let base = VERSION_MARKER.replace_all(&base, "");
    let base = DATE_MARKER.replace_all(&base, "");
    let base = COPY_MARKER.replace_all(&base, "");
    let base = NOISE.replace_all(&base, "");
    base.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_suffixes_collapse() {
        assert_eq!(normalize_name("方案v2.docx"), normalize_name("方案V3.docx"));
        assert_eq!(normalize_name("方案(v1.2).docx"), normalize_name("方案.docx"));
        assert_eq!(normalize_name("平台ver 3.pptx"), normalize_name("平台.pptx"));
        assert_eq!(normalize_name("规划版本2.doc"), normalize_name("规划.doc"));
    }

    #[test]
    fn dates_are_stripped() {
        assert_eq!(
            normalize_name("汇报2024-06-01.pptx"),
            normalize_name("汇报.pptx")
        );
        assert_eq!(
            normalize_name("汇报2024年6月1日.pptx"),
            normalize_name("汇报.pptx")
        );
    }

    #[test]
    fn copy_markers_are_stripped() {
        assert_eq!(normalize_name("方案终版.docx"), normalize_name("方案.docx"));
        assert_eq!(
            normalize_name("方案-副本.docx"),
            normalize_name("方案.docx")
        );
        assert_eq!(
            normalize_name("Plan copy.docx"),
            normalize_name("plan.docx")
        );
    }

    #[test]
    fn punctuation_is_noise() {
        assert_eq!(
            normalize_name("智慧园区（平台）.pdf"),
            normalize_name("智慧园区平台.pdf")
        );
    }

    #[test]
    fn unrelated_stems_stay_distinct() {
        assert_ne!(normalize_name("招标文件.docx"), normalize_name("投标文件.docx"));
    }

    #[test]
    fn extensionless_names_keep_whole_stem() {
        assert_eq!(normalize_name("README"), "readme");
    }
}
