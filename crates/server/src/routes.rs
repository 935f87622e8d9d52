//! HTTP handlers: search, chat-bot search, download/preview, raw snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use tuankb_core::models::Document;
use tuankb_core::search::rank;
use tuankb_core::taxonomy::VIDEO_EXT;

use crate::AppState;

/// Window returned to API consumers; the ranker itself is unbounded.
const TOP_K: usize = 5;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub doc: Document,
    pub score: i64,
    pub download_url: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub top: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct BotSearchResponse {
    #[serde(flatten)]
    pub search: SearchResponse,
    pub reply_text: String,
}

fn ranked_hits(state: &AppState, query: &str) -> SearchResponse {
    let catalog = state.cache.current();
    let ranked = rank(query, catalog.documents());
    let count = ranked.len();
    let top = ranked
        .into_iter()
        .take(TOP_K)
        .map(|hit| SearchHit {
            download_url: format!(
                "/download?path={}",
                utf8_percent_encode(&hit.doc.file_path, NON_ALPHANUMERIC)
            ),
            score: hit.score,
            doc: hit.doc.clone(),
        })
        .collect();
    SearchResponse {
        query: query.to_string(),
        count,
        top,
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    Json(ranked_hits(&state, params.q.trim()))
}

/// Search variant for the chat-bot bridge: same payload plus a numbered
/// plain-text reply with absolute download links.
pub async fn bot_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<BotSearchResponse> {
    let query = params.q.trim();
    let search = ranked_hits(&state, query);

    let mut lines = vec![format!("图安检索：{query}")];
    if search.top.is_empty() {
        lines.push("未找到相关文件".to_string());
    } else {
        for (i, hit) in search.top.iter().enumerate() {
            lines.push(format!(
                "{}. {} | 项目：{} | 下载：{}{}",
                i + 1,
                hit.doc.title,
                if hit.doc.project_name.is_empty() {
                    "-"
                } else {
                    &hit.doc.project_name
                },
                state.base_url,
                hit.download_url,
            ));
        }
    }

    Json(BotSearchResponse {
        reply_text: lines.join("\n"),
        search,
    })
}

#[derive(Debug, Deserialize)]
pub struct FileParams {
    #[serde(default)]
    pub path: String,
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileParams>,
) -> Response {
    serve_file(&state, &params.path, "attachment").await
}

pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileParams>,
) -> Response {
    serve_file(&state, &params.path, "inline").await
}

async fn serve_file(state: &AppState, raw_path: &str, disposition: &str) -> Response {
    let Some(path) = resolve_under_root(&state.root, raw_path) else {
        return (StatusCode::NOT_FOUND, "file not found").into_response();
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(_) => return (StatusCode::NOT_FOUND, "file not found").into_response(),
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&file_name)),
    );
    let value = format!(
        "{disposition}; filename*=UTF-8''{}",
        utf8_percent_encode(&file_name, NON_ALPHANUMERIC)
    );
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    (headers, bytes).into_response()
}

/// Directory-traversal guard: the requested path must canonicalize to a
/// regular file inside the served root.
pub fn resolve_under_root(root: &Path, raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let requested = Path::new(raw).canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    (requested.starts_with(&root) && requested.is_file()).then_some(requested)
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = match file_name.rfind('.') {
        Some(idx) => file_name[idx..].to_lowercase(),
        None => String::new(),
    };
    if ext == ".pdf" {
        "application/pdf"
    } else if VIDEO_EXT.contains(&ext.as_str()) {
        "video/mp4"
    } else {
        "application/octet-stream"
    }
}

/// Raw snapshot for the web UI, with a short shared cache window.
pub async fn snapshot_raw(State(state): State<Arc<AppState>>) -> Response {
    match tokio::fs::read(state.cache.path()).await {
        Ok(bytes) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=120"),
            );
            (headers, bytes).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "kb.json not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn traversal_outside_root_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("tree");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("方案.docx"), "x").unwrap();
        fs::write(temp.path().join("secret.txt"), "x").unwrap();

        let inside = root.join("方案.docx");
        assert!(resolve_under_root(&root, &inside.to_string_lossy()).is_some());

        let escape = root.join("../secret.txt");
        assert!(resolve_under_root(&root, &escape.to_string_lossy()).is_none());
        assert!(resolve_under_root(&root, "").is_none());
        // Directories are not served.
        assert!(resolve_under_root(&root, &root.to_string_lossy()).is_none());
    }

    #[test]
    fn content_types_cover_pdf_and_video() {
        assert_eq!(content_type_for("方案.pdf"), "application/pdf");
        assert_eq!(content_type_for("宣传片.MP4"), "video/mp4");
        assert_eq!(content_type_for("清单.xlsx"), "application/octet-stream");
    }
}
