//! 测试公共模块
//!
//! 提供Mock传输层与假性能数据源,避免依赖真实网络与浏览器。
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use satoyama_dogrun::models::{
    NavigationTiming, ObservedEntryKind, PerformanceEntry, TransportError,
};
use satoyama_dogrun::services::{
    ApiClient, AppLogger, DogrunApi, EntrySink, HeadlessPlatform, HttpRequest, HttpResponse,
    HttpTransport, LoggerConfig, MemoryStore, ObserverHandle, PerformanceSource, TokenStore,
};

pub const BASE_URL: &str = "http://dogrun.test/api";

/// Mock传输层
///
/// 按顺序返回预设响应,记录收到的所有请求。
/// 预设耗尽时返回404。
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::json(status, &body)));
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::json(404, &serde_json::json!({ "detail": "Not Found" }))))
    }
}

/// 测试装置: 内存存储 + Mock传输 + 无界面平台
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub transport: Arc<MockTransport>,
    pub platform: Arc<HeadlessPlatform>,
    pub logger: Arc<AppLogger>,
    pub api: DogrunApi,
}

impl Harness {
    pub fn new() -> Self {
        Self::at_path("/")
    }

    pub fn at_path(path: &str) -> Self {
        let store = Arc::new(MemoryStore::new());
        let transport = MockTransport::new();
        let platform = Arc::new(HeadlessPlatform::new("http://dogrun.test").with_path(path));
        let logger = Arc::new(AppLogger::new(
            LoggerConfig {
                enable_console: false,
                ..LoggerConfig::default()
            },
            store.clone(),
            platform.clone(),
        ));
        let client = ApiClient::new(
            BASE_URL,
            transport.clone(),
            TokenStore::new(store.clone()),
            platform.clone(),
        )
        .with_logger(logger.clone());

        Self {
            store,
            transport,
            platform,
            logger,
            api: DogrunApi::new(Arc::new(client)),
        }
    }
}

struct FakeHandle {
    disconnects: Arc<AtomicUsize>,
}

impl ObserverHandle for FakeHandle {
    fn disconnect(&mut self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

/// 假性能数据源
///
/// 保存订阅回调,测试通过 [`FakePerformanceSource::emit`] 推送条目。
#[derive(Default)]
pub struct FakePerformanceSource {
    pub navigation: Option<NavigationTiming>,
    sinks: Mutex<Vec<(ObservedEntryKind, EntrySink)>>,
    pub disconnects: Arc<AtomicUsize>,
}

impl FakePerformanceSource {
    pub fn with_navigation(navigation: NavigationTiming) -> Self {
        Self {
            navigation: Some(navigation),
            ..Self::default()
        }
    }

    pub fn emit(&self, entry: PerformanceEntry) {
        let kind = entry.kind();
        let sinks: Vec<EntrySink> = self
            .sinks
            .lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, s)| s.clone())
            .collect();
        for sink in sinks {
            sink(entry.clone());
        }
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

impl PerformanceSource for FakePerformanceSource {
    fn navigation_timing(&self) -> Option<NavigationTiming> {
        self.navigation
    }

    fn observe(&self, kind: ObservedEntryKind, sink: EntrySink) -> Option<Box<dyn ObserverHandle>> {
        self.sinks.lock().push((kind, sink));
        Some(Box::new(FakeHandle {
            disconnects: self.disconnects.clone(),
        }))
    }
}
