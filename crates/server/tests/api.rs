use std::fs;
use std::sync::Arc;

use axum::extract::{Query, State};
use filetime::{set_file_mtime, FileTime};

use tuankb_core::config::{AppConfig, ScanConfig, ServerConfig, SnapshotConfig};
use tuankb_core::{pipeline, snapshot};
use tuankb_server::routes::{self, SearchParams};
use tuankb_server::AppState;

fn touch(path: &std::path::Path, mtime: i64) {
    fs::write(path, "x").unwrap();
    set_file_mtime(path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

fn build_state(temp: &tempfile::TempDir) -> Arc<AppState> {
    let root = temp.path().join("tree");
    fs::create_dir_all(&root).unwrap();
    touch(&root.join("智慧园区方案.docx"), 1_700_000_000);
    touch(&root.join("应急演练纪录.mp4"), 1_700_100_000);

    let cfg = AppConfig {
        scan: ScanConfig {
            root: root.to_string_lossy().into_owned(),
            exclude: vec!["**/.git".to_string()],
            qualification_folder: String::new(),
        },
        snapshot: SnapshotConfig {
            path: temp
                .path()
                .join("data/kb.json")
                .to_string_lossy()
                .into_owned(),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 18893,
            public_base_url: Some("http://kb.example".to_string()),
        },
    };

    let catalog = pipeline::build(&cfg).unwrap();
    snapshot::write(&catalog, std::path::Path::new(&cfg.snapshot.path)).unwrap();
    Arc::new(AppState::from_config(&cfg))
}

#[tokio::test]
async fn search_returns_scored_hits_with_download_urls() {
    let temp = tempfile::tempdir().unwrap();
    let state = build_state(&temp);

    let response = routes::search(
        State(state),
        Query(SearchParams {
            q: "园区".to_string(),
        }),
    )
    .await;

    assert_eq!(response.0.count, 1);
    assert_eq!(response.0.top.len(), 1);
    let hit = &response.0.top[0];
    assert_eq!(hit.doc.title, "智慧园区方案.docx");
    assert!(hit.score > 0);
    assert!(hit.download_url.starts_with("/download?path="));
}

#[tokio::test]
async fn bot_search_renders_numbered_reply_lines() {
    let temp = tempfile::tempdir().unwrap();
    let state = build_state(&temp);

    let response = routes::bot_search(
        State(state),
        Query(SearchParams {
            q: "园区".to_string(),
        }),
    )
    .await;

    let reply = &response.0.reply_text;
    assert!(reply.starts_with("图安检索：园区"));
    assert!(reply.contains("1. 智慧园区方案.docx"));
    assert!(reply.contains("下载：http://kb.example/download?path="));
}

#[tokio::test]
async fn bot_search_reports_no_results() {
    let temp = tempfile::tempdir().unwrap();
    let state = build_state(&temp);

    let response = routes::bot_search(
        State(state),
        Query(SearchParams {
            q: "不存在的词".to_string(),
        }),
    )
    .await;

    assert_eq!(response.0.search.count, 0);
    assert!(response.0.reply_text.contains("未找到相关文件"));
}

#[tokio::test]
async fn search_with_missing_snapshot_fails_open() {
    let temp = tempfile::tempdir().unwrap();
    let cfg = AppConfig {
        scan: ScanConfig {
            root: temp.path().to_string_lossy().into_owned(),
            exclude: Vec::new(),
            qualification_folder: String::new(),
        },
        snapshot: SnapshotConfig {
            path: temp
                .path()
                .join("missing/kb.json")
                .to_string_lossy()
                .into_owned(),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 18893,
            public_base_url: None,
        },
    };
    let state = Arc::new(AppState::from_config(&cfg));

    let response = routes::search(
        State(state),
        Query(SearchParams {
            q: "园区".to_string(),
        }),
    )
    .await;
    assert_eq!(response.0.count, 0);
    assert!(response.0.top.is_empty());
}
