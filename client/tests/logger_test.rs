//! 应用日志集成测试
//!
//! 存储、导出与远程投递三个输出端的端到端行为。

mod common;

use std::sync::Arc;

use common::MockTransport;
use reqwest::Method;
use satoyama_dogrun::models::{LogEntry, LogLevel};
use satoyama_dogrun::services::storage::keys;
use satoyama_dogrun::services::{
    AppLogger, FileStore, HeadlessPlatform, KeyValueStore, LoggerConfig, MemoryStore, RequestBody,
};
use serde_json::json;

fn quiet_config() -> LoggerConfig {
    LoggerConfig {
        enable_console: false,
        ..LoggerConfig::default()
    }
}

fn logger_with(store: Arc<dyn KeyValueStore>, config: LoggerConfig) -> AppLogger {
    AppLogger::new(
        config,
        store,
        Arc::new(HeadlessPlatform::new("http://dogrun.test").with_path("/mypage")),
    )
}

#[test]
fn test_entries_carry_session_and_location() {
    let store = Arc::new(MemoryStore::new());
    let logger = logger_with(store, quiet_config());

    logger.log_user_action("check_in", Some(json!({ "dog_id": 3 })));

    let logs = logger.stored_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].message, "User action: check_in");
    assert_eq!(logs[0].session_id, logger.session_id());
    assert!(logger.session_id().starts_with("session_"));
    assert_eq!(logs[0].url.as_deref(), Some("http://dogrun.test/mypage"));
    assert_eq!(logs[0].data.as_ref().unwrap()["details"]["dog_id"], 3);
}

#[test]
fn test_levels_are_ordered() {
    let store = Arc::new(MemoryStore::new());
    let logger = logger_with(
        store,
        LoggerConfig {
            level: LogLevel::Warn,
            ..quiet_config()
        },
    );

    logger.debug("d", None);
    logger.info("i", None);
    logger.warn("w", None);
    logger.error("e", None);
    logger.fatal("f", None);

    let levels: Vec<LogLevel> = logger.stored_logs().iter().map(|e| e.level).collect();
    assert_eq!(levels, vec![LogLevel::Warn, LogLevel::Error, LogLevel::Fatal]);
}

#[test]
fn test_logs_survive_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let logger = logger_with(store, quiet_config());
        logger.info("before restart", None);
    }

    let store = Arc::new(FileStore::open(dir.path()).unwrap());
    let logger = logger_with(store, quiet_config());
    logger.info("after restart", None);

    let messages: Vec<String> = logger
        .stored_logs()
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(messages, vec!["before restart", "after restart"]);
}

#[test]
fn test_export_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let logger = logger_with(store, quiet_config());
    logger.error("payment failed", Some(json!({ "code": "E01" })));

    let path = logger.export_logs_to(dir.path()).unwrap();

    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("dogrun-logs-"));
    assert!(file_name.ends_with(".json"));

    let exported: Vec<LogEntry> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(exported, logger.stored_logs());
}

#[test]
fn test_clear_logs_removes_storage_key() {
    let store = Arc::new(MemoryStore::new());
    let logger = logger_with(store.clone(), quiet_config());
    logger.info("x", None);
    assert!(store.get(keys::LOGS).unwrap().is_some());

    logger.clear_logs();

    assert_eq!(store.get(keys::LOGS).unwrap(), None);
    assert_eq!(logger.export_logs(), "[]");
}

#[tokio::test]
async fn test_remote_sink_posts_entry() {
    let store = Arc::new(MemoryStore::new());
    let transport = MockTransport::new();
    transport.push_raw(204, "");
    let logger = logger_with(
        store,
        LoggerConfig {
            enable_storage: false,
            enable_remote: true,
            remote_endpoint: Some("http://logs.dogrun.test/ingest".into()),
            ..quiet_config()
        },
    )
    .with_remote_transport(transport.clone());

    logger.warn("slow checkout", None);

    for _ in 0..10 {
        if !transport.requests().is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }

    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, "http://logs.dogrun.test/ingest");
    match request.body {
        RequestBody::Json(body) => {
            assert_eq!(body["level"], "WARN");
            assert_eq!(body["message"], "slow checkout");
        }
        other => panic!("expected JSON body, got {:?}", other),
    }
    assert!(logger.stored_logs().is_empty());
}

#[test]
fn test_remote_without_runtime_is_dropped_quietly() {
    let store = Arc::new(MemoryStore::new());
    let transport = MockTransport::new();
    let logger = logger_with(
        store,
        LoggerConfig {
            enable_remote: true,
            remote_endpoint: Some("http://logs.dogrun.test/ingest".into()),
            ..quiet_config()
        },
    )
    .with_remote_transport(transport.clone());

    logger.error("offline", None);

    assert!(transport.requests().is_empty());
    assert_eq!(logger.stored_logs().len(), 1);
}

#[test]
fn test_concurrent_appends_are_all_kept() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 50;

    let store = Arc::new(MemoryStore::new());
    let logger = Arc::new(logger_with(
        store,
        LoggerConfig {
            max_entries: THREADS * PER_THREAD,
            ..quiet_config()
        },
    ));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(&format!("t{}-{}", t, i), None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(logger.stored_logs().len(), THREADS * PER_THREAD);
}
