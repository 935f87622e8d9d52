//! Keyword-driven classification: document category, two-level industry tag,
//! qualification group and project name.
//!
//! All rule sets are ordered decision tables evaluated top to bottom; the
//! first satisfied rule wins regardless of later matches.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::taxonomy::{
    primary_tag, AI_FILE_KEYWORDS, AI_PRIMARY, CATCH_ALL_CATEGORY, DOC_EXT, EXCEL_EXT,
    OTHER_INDUSTRY, OTHER_SUBTAG, PPT_EXT, QUALIFICATION_CATEGORY, QUALIFICATION_GROUPS,
    QUALIFICATION_MARKER, STRUCTURED_PRIMARIES, VIDEO_EXT,
};

pub struct CategoryInput<'a> {
    /// Lowercased "{path} {name}".
    pub text: &'a str,
    /// Lowercased path alone.
    pub path: &'a str,
    /// Lowercased extension with dot.
    pub ext: &'a str,
    /// Lowercased qualification-folder hint from config; empty disables it.
    pub qual_folder: &'a str,
}

struct CategoryRule {
    label: &'static str,
    matches: fn(&CategoryInput<'_>) -> bool,
}

// Order is load-bearing: 招标 outranks the spreadsheet quotation rule, so a
// tender spreadsheet lands in 招标文档 rather than 报价文档. Unmatched
// spreadsheets fall to 其他, not 解决方案文档.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        label: QUALIFICATION_CATEGORY,
        matches: |inp| {
            (!inp.qual_folder.is_empty() && inp.path.contains(inp.qual_folder))
                || inp.text.contains(QUALIFICATION_MARKER)
        },
    },
    CategoryRule {
        label: "招标文档",
        matches: |inp| inp.text.contains("招标"),
    },
    CategoryRule {
        label: "投标文档",
        matches: |inp| inp.text.contains("投标"),
    },
    CategoryRule {
        label: "合同文档",
        matches: |inp| inp.text.contains("合同"),
    },
    CategoryRule {
        label: "报价文档",
        matches: |inp| {
            EXCEL_EXT.contains(&inp.ext)
                && ["报价", "预算", "清单", "分项"]
                    .iter()
                    .any(|k| inp.text.contains(k))
        },
    },
    CategoryRule {
        label: "标准规范",
        matches: |inp| ["标准", "规范", "指南"].iter().any(|k| inp.text.contains(k)),
    },
    CategoryRule {
        label: "汇报PPT",
        matches: |inp| PPT_EXT.contains(&inp.ext),
    },
    CategoryRule {
        label: "视频",
        matches: |inp| VIDEO_EXT.contains(&inp.ext),
    },
    CategoryRule {
        label: "解决方案文档",
        matches: |inp| DOC_EXT.contains(&inp.ext),
    },
    CategoryRule {
        label: CATCH_ALL_CATEGORY,
        matches: |inp| EXCEL_EXT.contains(&inp.ext),
    },
];

/// Category of a canonical file. Total: unmatched files resolve to 其他.
pub fn detect_category(path: &str, ext: &str, name: &str, qual_folder: &str) -> &'static str {
    let text = format!("{path} {name}").to_lowercase();
    let path_lower = path.to_lowercase();
    let input = CategoryInput {
        text: &text,
        path: &path_lower,
        ext,
        qual_folder,
    };
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.matches)(&input))
        .map(|rule| rule.label)
        .unwrap_or(CATCH_ALL_CATEGORY)
}

/// Two-level industry tag for a file. An AI keyword in the filename alone
/// always selects the AI赋能 primary before any other signal is considered.
pub fn detect_industry(path: &str, name: &str) -> (String, String) {
    let file = name.to_lowercase();
    let full = format!("{name} {path}").to_lowercase();

    if AI_FILE_KEYWORDS.iter().any(|k| file.contains(k)) {
        if let Some(primary) = primary_tag(AI_PRIMARY) {
            for sub in primary.sub_tags {
                if sub.keywords.iter().any(|k| full.contains(k)) {
                    return (AI_PRIMARY.to_string(), sub.name.to_string());
                }
            }
        }
        return (AI_PRIMARY.to_string(), OTHER_SUBTAG.to_string());
    }

    for primary_name in STRUCTURED_PRIMARIES {
        if let Some(primary) = primary_tag(primary_name) {
            for sub in primary.sub_tags {
                if sub.keywords.iter().any(|k| full.contains(k)) {
                    return (primary_name.to_string(), sub.name.to_string());
                }
            }
        }
        // Bare primary name with no sub-tag hit still claims the file.
        if full.contains(primary_name) {
            return (primary_name.to_string(), OTHER_SUBTAG.to_string());
        }
    }

    fallback_industry(&full)
        .unwrap_or_else(|| (OTHER_INDUSTRY.to_string(), String::new()))
}

// The structured taxonomy is intentionally narrow; these broader synonym
// groups recover recall, refining to a specific sub-tag where possible.
fn fallback_industry(full: &str) -> Option<(String, String)> {
    const SAFETY: [&str; 4] = ["安全生产", "隐患", "双重预防", "重大危险源"];
    const PARK: [&str; 5] = ["智慧园区", "园区", "数字孪生", "化工园区", "经开区"];
    const EMERGENCY: [&str; 4] = ["应急指挥", "应急演练", "应急推演", "应急"];
    const TRANSPORT: [&str; 10] = [
        "车路协同",
        "智慧高速",
        "智慧隧道",
        "智慧桥梁",
        "智慧服务区",
        "智慧收费站",
        "智慧停车场",
        "无人驾驶训练场",
        "无人驾驶训练厂",
        "v2x",
    ];

    if SAFETY.iter().any(|k| full.contains(k)) {
        return Some(("安全生产".to_string(), OTHER_SUBTAG.to_string()));
    }
    if PARK.iter().any(|k| full.contains(k)) {
        let sub = if full.contains("化工园区") {
            "化工园区"
        } else if full.contains("经开区") || full.contains("开发区") {
            "经开区"
        } else {
            OTHER_SUBTAG
        };
        return Some(("智慧园区".to_string(), sub.to_string()));
    }
    if EMERGENCY.iter().any(|k| full.contains(k)) {
        let sub = if full.contains("应急指挥") {
            "应急指挥"
        } else if full.contains("应急演练") {
            "应急演练"
        } else if full.contains("应急推演") {
            "应急推演"
        } else {
            OTHER_SUBTAG
        };
        return Some(("应急管理".to_string(), sub.to_string()));
    }
    if TRANSPORT.iter().any(|k| full.contains(k)) {
        if let Some(primary) = primary_tag("车路协同") {
            for sub in primary.sub_tags {
                if full.contains(sub.name) {
                    return Some(("车路协同".to_string(), sub.name.to_string()));
                }
            }
        }
        return Some(("车路协同".to_string(), OTHER_SUBTAG.to_string()));
    }
    None
}

/// Qualification sub-group, used as the project name of 图安资质 documents.
pub fn qualification_group(path: &str, name: &str) -> &'static str {
    let text = format!("{path} {name}").to_lowercase();
    QUALIFICATION_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(group, _)| *group)
        .unwrap_or(OTHER_SUBTAG)
}

static LEADING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[【\[].*?[】\]]").unwrap());
static CJK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]+").unwrap());
static NAME_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_—（(]").unwrap());

/// Best-effort project name. Qualification documents use their group name;
/// everything else extracts CJK runs from the filename stem, falling back to
/// the parent directory, the stem's first separator-delimited segment, the
/// parent directory name, and finally a sentinel.
pub fn project_name(path: &str, name: &str, category: &str) -> String {
    if category == QUALIFICATION_CATEGORY {
        return qualification_group(path, name).to_string();
    }

    let stem = stem_of(name);
    let cleaned = LEADING_TAG.replace(stem, "");
    let cleaned = cleaned.trim();

    let cjk = cjk_runs(cleaned);
    if cjk.chars().count() >= 2 {
        return cjk;
    }

    let parent = Path::new(path)
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let cjk_parent = cjk_runs(parent);
    if cjk_parent.chars().count() >= 2 {
        return cjk_parent;
    }

    let head = NAME_SEPARATOR
        .split(cleaned)
        .next()
        .unwrap_or("")
        .trim();
    if !head.is_empty() {
        head.to_string()
    } else if !parent.is_empty() {
        parent.to_string()
    } else {
        "未命名项目".to_string()
    }
}

fn cjk_runs(text: &str) -> String {
    CJK_RUN.find_iter(text).map(|m| m.as_str()).collect()
}

fn stem_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
