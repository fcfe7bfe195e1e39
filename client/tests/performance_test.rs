//! 性能监控集成测试
//!
//! 通过假数据源模拟平台推送,验证订阅、缓冲上限与报告。

mod common;

use std::sync::Arc;

use common::{FakePerformanceSource, Harness, BASE_URL};
use satoyama_dogrun::models::{MetricUnit, NavigationTiming, PerformanceEntry, PerformanceReport};
use satoyama_dogrun::services::performance_monitor::MAX_METRICS;
use satoyama_dogrun::services::{ApiClient, DogrunApi, PerformanceMonitor, TokenStore};
use serde_json::json;

fn navigation() -> NavigationTiming {
    NavigationTiming {
        navigation_start: 0.0,
        dom_content_loaded_event_start: 800.0,
        dom_content_loaded_event_end: 850.0,
        load_event_start: 1200.0,
        load_event_end: 1250.0,
    }
}

#[test]
fn test_navigation_timing_recorded_on_startup() {
    let source = FakePerformanceSource::with_navigation(navigation());
    let monitor = PerformanceMonitor::new(&source);

    let report = monitor.generate_report();
    let names: Vec<&str> = report.page_load.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "page_load_dom_content_loaded",
            "page_load_complete",
            "page_load_total"
        ]
    );
    // (50 + 50 + 1250) / 3
    assert_eq!(report.summary.average_page_load, 450.0);
}

#[test]
fn test_observed_entries_flow_into_buffer() {
    let source = FakePerformanceSource::default();
    let monitor = PerformanceMonitor::new(&source);
    assert_eq!(monitor.observer_count(), 3);

    source.emit(PerformanceEntry::Paint {
        name: "first-contentful-paint".into(),
        start_time: 640.0,
    });
    source.emit(PerformanceEntry::Resource {
        name: "https://cdn.dogrun.test/hero.jpg".into(),
        initiator_type: "img".into(),
        duration: 320.0,
        transfer_size: Some(120_000),
    });
    source.emit(PerformanceEntry::Resource {
        name: "https://cdn.dogrun.test/icon.svg".into(),
        initiator_type: "img".into(),
        duration: 12.0,
        transfer_size: None,
    });
    source.emit(PerformanceEntry::Interaction {
        event_type: "click".into(),
        target: Some("BUTTON".into()),
        capture_at: 100.0,
        bubble_at: 116.0,
    });

    let names: Vec<String> = monitor.metrics().into_iter().map(|m| m.name).collect();
    assert_eq!(
        names,
        vec![
            "paint_first-contentful-paint",
            "resource_https://cdn.dogrun.test/hero.jpg",
            "interaction_click",
        ]
    );

    let report = monitor.generate_report();
    assert_eq!(report.resources[0].metadata.as_ref().unwrap()["size"], 120_000);
    assert_eq!(report.interactions[0].value, 16.0);
    assert_eq!(report.summary.total_metrics, 3);
    // 绘制指标不参与最慢操作的比较
    assert_eq!(report.summary.slowest_operation.unwrap().value, 320.0);
}

#[test]
fn test_destroy_disconnects_every_observer() {
    let source = FakePerformanceSource::default();
    let monitor = PerformanceMonitor::new(&source);
    monitor.record_custom_metric("render", 5.0, MetricUnit::Ms, None);

    monitor.destroy();
    monitor.destroy();

    assert_eq!(source.disconnect_count(), 3);
    assert!(monitor.is_empty());
}

#[test]
fn test_entries_after_drop_are_ignored() {
    let source = FakePerformanceSource::default();
    let monitor = PerformanceMonitor::new(&source);
    drop(monitor);

    source.emit(PerformanceEntry::Paint {
        name: "first-paint".into(),
        start_time: 10.0,
    });

    assert_eq!(source.disconnect_count(), 3);
}

#[test]
fn test_overflow_keeps_newest_half() {
    let monitor = PerformanceMonitor::new(&FakePerformanceSource::default());

    for i in 0..=MAX_METRICS {
        monitor.record_custom_metric(&format!("m{}", i), i as f64, MetricUnit::Count, None);
    }

    let metrics = monitor.metrics();
    assert_eq!(metrics.len(), MAX_METRICS / 2);
    assert_eq!(metrics.last().unwrap().name, format!("custom_m{}", MAX_METRICS));
    assert_eq!(metrics[0].name, format!("custom_m{}", MAX_METRICS / 2 + 1));
}

#[test]
fn test_api_averages() {
    let monitor = PerformanceMonitor::new(&FakePerformanceSource::default());
    for duration in [100.0, 200.0, 300.0] {
        monitor.record_api_call("GET", "/dogs", duration, 200);
    }

    let report = monitor.generate_report();

    assert_eq!(report.summary.average_api_response, 200.0);
    assert_eq!(report.summary.average_page_load, 0.0);
    let slowest = report.summary.slowest_operation.unwrap();
    assert_eq!(slowest.value, 300.0);
    assert_eq!(slowest.name, "api_GET /dogs");
    assert!(monitor.check_performance_warnings().is_empty());
}

#[test]
fn test_slow_page_load_warns() {
    let source = FakePerformanceSource::with_navigation(NavigationTiming {
        navigation_start: 0.0,
        dom_content_loaded_event_start: 0.0,
        dom_content_loaded_event_end: 9000.0,
        load_event_start: 0.0,
        load_event_end: 9000.0,
    });
    let monitor = PerformanceMonitor::new(&source);

    let warnings = monitor.check_performance_warnings();

    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("page load"));
}

#[test]
fn test_report_serializes_in_camel_case() {
    let monitor = PerformanceMonitor::new(&FakePerformanceSource::default());
    monitor.record_api_call("POST", "/posts", 42.0, 201);

    let value = serde_json::to_value(monitor.generate_report()).unwrap();

    assert_eq!(value["summary"]["averageApiResponse"], 42.0);
    assert_eq!(value["apiCalls"][0]["unit"], "ms");
    let back: PerformanceReport = serde_json::from_value(value).unwrap();
    assert_eq!(back.api_calls.len(), 1);
}

#[test]
fn test_export_metrics_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let monitor = PerformanceMonitor::new(&FakePerformanceSource::default());
    monitor.record_custom_metric("boot", 12.5, MetricUnit::Ms, None);

    let path = monitor.export_metrics_to(dir.path()).unwrap();

    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("performance-metrics-"));
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(exported[0]["name"], "custom_boot");
}

#[tokio::test]
async fn test_api_client_records_latency() {
    let h = Harness::new();
    let monitor = Arc::new(PerformanceMonitor::new(&FakePerformanceSource::default()));
    let client = ApiClient::new(
        BASE_URL,
        h.transport.clone(),
        TokenStore::new(h.store.clone()),
        h.platform.clone(),
    )
    .with_performance(monitor.clone());
    let api = DogrunApi::new(Arc::new(client));
    h.transport.push_json(200, json!([]));
    h.transport.push_json(500, json!({ "detail": "boom" }));

    api.list_tags().await.unwrap();
    api.list_tags().await.unwrap_err();

    let calls = monitor.generate_report().api_calls;
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|m| m.name == "api_GET /tags"));
    assert_eq!(calls[1].metadata.as_ref().unwrap()["status"], 500);
}
