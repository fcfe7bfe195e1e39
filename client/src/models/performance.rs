use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 指标名前缀,报告按前缀分类
pub mod prefixes {
    pub const PAGE_LOAD: &str = "page_load_";
    pub const API: &str = "api_";
    pub const INTERACTION: &str = "interaction_";
    pub const RESOURCE: &str = "resource_";
    pub const PAINT: &str = "paint_";
    pub const CUSTOM: &str = "custom_";
}

/// 指标单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    Ms,
    Bytes,
    Count,
}

/// 单个性能采样
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl PerformanceMetric {
    pub fn new(name: impl Into<String>, value: f64, unit: MetricUnit) -> Self {
        Self {
            name: name.into(),
            value,
            unit,
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// 报告摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_metrics: usize,
    pub average_page_load: f64,
    pub average_api_response: f64,
    pub slowest_operation: Option<PerformanceMetric>,
}

/// 性能报告
///
/// 每次调用都从当前缓冲区全量重新计算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub page_load: Vec<PerformanceMetric>,
    pub api_calls: Vec<PerformanceMetric>,
    pub interactions: Vec<PerformanceMetric>,
    pub resources: Vec<PerformanceMetric>,
}

/// 浏览器导航计时(毫秒,相对导航开始)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub dom_content_loaded_event_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_start: f64,
    pub load_event_end: f64,
}

/// 可观察的性能条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservedEntryKind {
    Paint,
    Resource,
    Interaction,
}

/// 平台推送的性能条目
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceEntry {
    Paint {
        name: String,
        start_time: f64,
    },
    Resource {
        name: String,
        initiator_type: String,
        duration: f64,
        transfer_size: Option<u64>,
    },
    /// 同一次交互在捕获阶段与冒泡阶段的时间点
    Interaction {
        event_type: String,
        target: Option<String>,
        capture_at: f64,
        bubble_at: f64,
    },
}

impl PerformanceEntry {
    pub fn kind(&self) -> ObservedEntryKind {
        match self {
            PerformanceEntry::Paint { .. } => ObservedEntryKind::Paint,
            PerformanceEntry::Resource { .. } => ObservedEntryKind::Resource,
            PerformanceEntry::Interaction { .. } => ObservedEntryKind::Interaction,
        }
    }
}
