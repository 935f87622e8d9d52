//! Request-time scoring of catalog documents against a free-text query.

use crate::models::Document;

/// A document with its relevance score. Only positive scores are ranked.
#[derive(Debug, Clone)]
pub struct Ranked<'a> {
    pub doc: &'a Document,
    pub score: i64,
}

/// Additive, case-insensitive score. The full query is matched as a
/// substring of each field, then the query is tokenized on
/// whitespace/hyphen/underscore and each token scored again.
pub fn score_document(query: &str, doc: &Document) -> i64 {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return 0;
    }
    let title = doc.title.to_lowercase();
    let project = doc.project_name.to_lowercase();
    let category = doc.category.to_lowercase();
    let industry = doc.industry_type.to_lowercase();
    let path = doc.file_path.to_lowercase();

    let mut score = 0;
    if title.contains(&q) {
        score += 8;
    }
    if project.contains(&q) {
        score += 7;
    }
    if path.contains(&q) {
        score += 4;
    }
    if category.contains(&q) {
        score += 2;
    }
    if industry.contains(&q) {
        score += 2;
    }

    for token in q
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|t| !t.is_empty())
    {
        if title.contains(token) {
            score += 2;
        }
        if project.contains(token) {
            score += 2;
        }
        if path.contains(token) {
            score += 1;
        }
    }
    score
}

/// Full ranked result set: zero-score documents are filtered out entirely,
/// the rest sorted by (score desc, updated_at desc). Truncation to a top-K
/// window is the caller's business.
pub fn rank<'a>(query: &str, docs: impl Iterator<Item = &'a Document>) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = docs
        .filter_map(|doc| {
            let score = score_document(query, doc);
            (score > 0).then_some(Ranked { doc, score })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.doc.updated_at.cmp(&a.doc.updated_at))
    });
    ranked
}
