//! 性能监控服务
//!
//! 机会式采集计时样本,按需生成报告:
//! - 构造时读取一次导航计时,订阅绘制/资源/交互条目
//! - 缓冲区超过上限时一次性丢弃较旧的一半
//! - 报告与告警每次都从缓冲区全量计算
//!
//! 平台不提供相应能力时对应采集项直接跳过。

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use crate::models::performance::prefixes;
use crate::models::{
    MetricUnit, NavigationTiming, ObservedEntryKind, PerformanceEntry, PerformanceMetric,
    PerformanceReport, ReportSummary, StorageError,
};
use crate::utils::time_utils::{export_file_name, round2};

/// 缓冲区上限
pub const MAX_METRICS: usize = 1000;

/// 只记录耗时超过该值的资源加载 (毫秒)
pub const RESOURCE_DURATION_THRESHOLD_MS: f64 = 100.0;

/// 页面加载均值告警阈值 (毫秒)
pub const SLOW_PAGE_LOAD_MS: f64 = 3000.0;

/// API响应均值告警阈值 (毫秒)
pub const SLOW_API_MS: f64 = 1000.0;

/// 慢资源判定阈值 (毫秒)
pub const SLOW_RESOURCE_MS: f64 = 500.0;

/// 慢资源数量超过该值时告警
pub const SLOW_RESOURCE_LIMIT: usize = 5;

/// 导出文件名前缀
pub const METRICS_EXPORT_PREFIX: &str = "performance-metrics";

/// 平台推送条目的回调
pub type EntrySink = Arc<dyn Fn(PerformanceEntry) + Send + Sync>;

/// 订阅句柄,断开后不再推送
pub trait ObserverHandle: Send {
    fn disconnect(&mut self);
}

/// 性能数据来源
///
/// 浏览器中对应 Navigation Timing、PerformanceObserver 与 DOM 事件监听。
pub trait PerformanceSource: Send + Sync {
    fn navigation_timing(&self) -> Option<NavigationTiming>;

    /// 订阅某类条目,平台不支持时返回 `None`
    fn observe(&self, kind: ObservedEntryKind, sink: EntrySink) -> Option<Box<dyn ObserverHandle>>;
}

/// 不提供任何性能数据的来源
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPerformanceSource;

impl PerformanceSource for NoPerformanceSource {
    fn navigation_timing(&self) -> Option<NavigationTiming> {
        None
    }

    fn observe(&self, _kind: ObservedEntryKind, _sink: EntrySink) -> Option<Box<dyn ObserverHandle>> {
        None
    }
}

struct MonitorInner {
    metrics: Mutex<Vec<PerformanceMetric>>,
}

impl MonitorInner {
    fn push(&self, metric: PerformanceMetric) {
        let mut metrics = self.metrics.lock();
        metrics.push(metric);
        if metrics.len() > MAX_METRICS {
            let keep = MAX_METRICS / 2;
            let drop = metrics.len() - keep;
            metrics.drain(..drop);
        }
    }

    fn ingest(&self, entry: PerformanceEntry) {
        match entry {
            PerformanceEntry::Paint { name, start_time } => {
                self.push(PerformanceMetric::new(
                    format!("{}{}", prefixes::PAINT, name),
                    start_time,
                    MetricUnit::Ms,
                ));
            }
            PerformanceEntry::Resource {
                name,
                initiator_type,
                duration,
                transfer_size,
            } => {
                if duration <= RESOURCE_DURATION_THRESHOLD_MS {
                    return;
                }
                let mut metadata = HashMap::new();
                metadata.insert("type".to_string(), initiator_type.into());
                if let Some(size) = transfer_size {
                    metadata.insert("size".to_string(), size.into());
                }
                self.push(
                    PerformanceMetric::new(
                        format!("{}{}", prefixes::RESOURCE, name),
                        duration,
                        MetricUnit::Ms,
                    )
                    .with_metadata(metadata),
                );
            }
            PerformanceEntry::Interaction {
                event_type,
                target,
                capture_at,
                bubble_at,
            } => {
                let mut metadata = HashMap::new();
                if let Some(target) = target {
                    metadata.insert("target".to_string(), target.into());
                }
                self.push(
                    PerformanceMetric::new(
                        format!("{}{}", prefixes::INTERACTION, event_type),
                        (bubble_at - capture_at).max(0.0),
                        MetricUnit::Ms,
                    )
                    .with_metadata(metadata),
                );
            }
        }
    }
}

/// 性能监控器
pub struct PerformanceMonitor {
    inner: Arc<MonitorInner>,
    observers: Mutex<Vec<Box<dyn ObserverHandle>>>,
}

impl PerformanceMonitor {
    /// 创建监控器并尽力挂接平台能力
    pub fn new(source: &dyn PerformanceSource) -> Self {
        let monitor = Self {
            inner: Arc::new(MonitorInner {
                metrics: Mutex::new(Vec::new()),
            }),
            observers: Mutex::new(Vec::new()),
        };

        if let Some(timing) = source.navigation_timing() {
            monitor.record_navigation(&timing);
        }

        let mut observers = Vec::new();
        for kind in [
            ObservedEntryKind::Paint,
            ObservedEntryKind::Resource,
            ObservedEntryKind::Interaction,
        ] {
            // 回调只持有弱引用,避免与平台注册表形成环
            let weak: Weak<MonitorInner> = Arc::downgrade(&monitor.inner);
            let sink: EntrySink = Arc::new(move |entry| {
                if let Some(inner) = weak.upgrade() {
                    inner.ingest(entry);
                }
            });
            match source.observe(kind, sink) {
                Some(handle) => observers.push(handle),
                None => tracing::debug!(kind = ?kind, "Performance observer unavailable"),
            }
        }
        *monitor.observers.lock() = observers;

        monitor
    }

    fn record_navigation(&self, timing: &NavigationTiming) {
        let dom_content_loaded =
            timing.dom_content_loaded_event_end - timing.dom_content_loaded_event_start;
        let load_complete = timing.load_event_end - timing.load_event_start;
        let total = timing.load_event_end - timing.navigation_start;

        self.record_metric(format!("{}dom_content_loaded", prefixes::PAGE_LOAD), dom_content_loaded, MetricUnit::Ms, None);
        self.record_metric(format!("{}complete", prefixes::PAGE_LOAD), load_complete, MetricUnit::Ms, None);
        self.record_metric(format!("{}total", prefixes::PAGE_LOAD), total, MetricUnit::Ms, None);
    }

    /// 追加一个指标
    pub fn record_metric(
        &self,
        name: impl Into<String>,
        value: f64,
        unit: MetricUnit,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        let mut metric = PerformanceMetric::new(name, value, unit);
        metric.metadata = metadata;
        self.inner.push(metric);
    }

    /// 平台条目的直接入口
    pub fn observe_entry(&self, entry: PerformanceEntry) {
        self.inner.ingest(entry);
    }

    /// 记录一次API调用耗时
    pub fn record_api_call(&self, method: &str, url: &str, duration_ms: f64, status: u16) {
        let mut metadata = HashMap::new();
        metadata.insert("method".to_string(), method.into());
        metadata.insert("url".to_string(), url.into());
        metadata.insert("status".to_string(), status.into());
        self.record_metric(
            format!("{}{} {}", prefixes::API, method, url),
            duration_ms,
            MetricUnit::Ms,
            Some(metadata),
        );
    }

    /// 记录自定义指标
    pub fn record_custom_metric(
        &self,
        name: &str,
        value: f64,
        unit: MetricUnit,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        self.record_metric(format!("{}{}", prefixes::CUSTOM, name), value, unit, metadata);
    }

    /// 当前缓冲区快照
    pub fn metrics(&self) -> Vec<PerformanceMetric> {
        self.inner.metrics.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.metrics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.metrics.lock().is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// 生成报告
    pub fn generate_report(&self) -> PerformanceReport {
        let metrics = self.metrics();
        let by_prefix = |prefix: &str| -> Vec<PerformanceMetric> {
            metrics
                .iter()
                .filter(|m| m.name.starts_with(prefix))
                .cloned()
                .collect()
        };

        let page_load = by_prefix(prefixes::PAGE_LOAD);
        let api_calls = by_prefix(prefixes::API);
        let interactions = by_prefix(prefixes::INTERACTION);
        let resources = by_prefix(prefixes::RESOURCE);

        let slowest_operation = page_load
            .iter()
            .chain(&api_calls)
            .chain(&interactions)
            .chain(&resources)
            .fold(None::<&PerformanceMetric>, |slowest, m| match slowest {
                Some(s) if s.value >= m.value => Some(s),
                _ => Some(m),
            })
            .cloned();

        PerformanceReport {
            generated_at: Utc::now(),
            summary: ReportSummary {
                total_metrics: metrics.len(),
                average_page_load: mean(&page_load),
                average_api_response: mean(&api_calls),
                slowest_operation,
            },
            page_load,
            api_calls,
            interactions,
            resources,
        }
    }

    /// 固定阈值的性能告警
    pub fn check_performance_warnings(&self) -> Vec<String> {
        let report = self.generate_report();
        let mut warnings = Vec::new();

        if report.summary.average_page_load > SLOW_PAGE_LOAD_MS {
            warnings.push(format!(
                "Average page load time is high: {}ms",
                report.summary.average_page_load
            ));
        }

        if report.summary.average_api_response > SLOW_API_MS {
            warnings.push(format!(
                "Average API response time is high: {}ms",
                report.summary.average_api_response
            ));
        }

        let slow_resources = report
            .resources
            .iter()
            .filter(|m| m.value > SLOW_RESOURCE_MS)
            .count();
        if slow_resources > SLOW_RESOURCE_LIMIT {
            warnings.push(format!(
                "{} resources took longer than {}ms to load",
                slow_resources, SLOW_RESOURCE_MS
            ));
        }

        warnings
    }

    /// 导出缓冲区为格式化JSON
    pub fn export_metrics(&self) -> String {
        serde_json::to_string_pretty(&self.metrics()).unwrap_or_else(|_| "[]".to_string())
    }

    /// 导出到目录,文件名带当天日期
    pub fn export_metrics_to(&self, dir: &Path) -> Result<PathBuf, StorageError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(METRICS_EXPORT_PREFIX, Utc::now().date_naive()));
        std::fs::write(&path, self.export_metrics())?;
        tracing::info!(path = %path.display(), "Performance metrics exported");
        Ok(path)
    }

    /// 断开所有订阅并清空缓冲区,可重复调用
    pub fn destroy(&self) {
        let mut observers = std::mem::take(&mut *self.observers.lock());
        for observer in observers.iter_mut() {
            observer.disconnect();
        }
        self.inner.metrics.lock().clear();
    }
}

impl Drop for PerformanceMonitor {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn mean(metrics: &[PerformanceMetric]) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    let sum: f64 = metrics.iter().map(|m| m.value).sum();
    round2(sum / metrics.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> PerformanceMonitor {
        PerformanceMonitor::new(&NoPerformanceSource)
    }

    #[test]
    fn test_api_only_report() {
        let monitor = monitor();
        for value in [100.0, 200.0, 300.0] {
            monitor.record_api_call("GET", "/events", value, 200);
        }
        let report = monitor.generate_report();
        assert_eq!(report.summary.average_api_response, 200.0);
        assert_eq!(report.summary.average_page_load, 0.0);
        assert_eq!(report.summary.slowest_operation.unwrap().value, 300.0);
        assert_eq!(report.api_calls.len(), 3);
    }

    #[test]
    fn test_overflow_halves_buffer() {
        let monitor = monitor();
        for i in 0..1001 {
            monitor.record_custom_metric("tick", i as f64, MetricUnit::Count, None);
        }
        let metrics = monitor.metrics();
        assert_eq!(metrics.len(), 500);
        assert_eq!(metrics.first().unwrap().value, 501.0);
        assert_eq!(metrics.last().unwrap().value, 1000.0);
    }

    #[test]
    fn test_small_resources_are_skipped() {
        let monitor = monitor();
        monitor.observe_entry(PerformanceEntry::Resource {
            name: "logo.png".into(),
            initiator_type: "img".into(),
            duration: 40.0,
            transfer_size: None,
        });
        monitor.observe_entry(PerformanceEntry::Resource {
            name: "hero.jpg".into(),
            initiator_type: "img".into(),
            duration: 450.0,
            transfer_size: Some(1024),
        });
        let report = monitor.generate_report();
        assert_eq!(report.resources.len(), 1);
        assert_eq!(report.resources[0].name, "resource_hero.jpg");
    }

    #[test]
    fn test_interaction_uses_phase_delta() {
        let monitor = monitor();
        monitor.observe_entry(PerformanceEntry::Interaction {
            event_type: "click".into(),
            target: Some("BUTTON".into()),
            capture_at: 1000.0,
            bubble_at: 1012.5,
        });
        let report = monitor.generate_report();
        assert_eq!(report.interactions[0].name, "interaction_click");
        assert_eq!(report.interactions[0].value, 12.5);
    }

    #[test]
    fn test_warnings() {
        let monitor = monitor();
        assert!(monitor.check_performance_warnings().is_empty());

        monitor.record_metric("page_load_total", 4000.0, MetricUnit::Ms, None);
        monitor.record_api_call("GET", "/posts", 1500.0, 200);
        for i in 0..6 {
            monitor.observe_entry(PerformanceEntry::Resource {
                name: format!("img{}", i),
                initiator_type: "img".into(),
                duration: 800.0,
                transfer_size: None,
            });
        }
        let warnings = monitor.check_performance_warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("page load"));
        assert!(warnings[1].contains("API"));
        assert!(warnings[2].starts_with("6 resources"));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let monitor = monitor();
        monitor.record_custom_metric("x", 1.0, MetricUnit::Count, None);
        monitor.destroy();
        monitor.destroy();
        assert!(monitor.is_empty());
    }
}
