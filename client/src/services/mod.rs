//! 服务层模块
//!
//! - `transport`: HTTP传输抽象与reqwest实现
//! - `api_client`: 所有出站请求的唯一出口 (令牌、请求ID、错误归类)
//! - `dogrun_api` / `admin_api`: 按REST资源划分的业务门面
//! - `token_store`: 用户/管理员令牌的持久化
//! - `storage`: 键值存储抽象 (内存/文件)
//! - `platform`: 运行环境能力 (当前位置、UA、跳转)
//! - `logger_service`: 分级、可持久化的应用日志
//! - `performance_monitor`: 性能指标采集与报告
//! - `session_manager`: 客户端侧会话记录 (默认不启用)
//! - `config_service`: 环境变量配置
//!
//! # 服务架构
//!
//! ```text
//! ┌──────────────┐
//! │   UI / CLI   │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────────────────────┐      ┌─────────────────────┐
//! │ DogrunApi ── AdminApi        │      │ AppLogger           │
//! └──────┬───────────────────────┘      │ PerformanceMonitor  │
//!        ▼                              └──────────▲──────────┘
//! ┌──────────────────────────────┐                 │
//! │ ApiClient (Bearer/X-Request-ID/401) ───────────┘
//! └──────┬───────────────┬───────┘
//!        ▼               ▼
//!  HttpTransport     TokenStore ── KeyValueStore
//! ```
//!
//! # 使用示例
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use satoyama_dogrun::services::{
//!     ApiClient, DogrunApi, HeadlessPlatform, MemoryStore, ReqwestTransport, TokenStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(10))?);
//! let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
//! let client = ApiClient::new(
//!     "http://localhost:8000",
//!     transport,
//!     tokens,
//!     Arc::new(HeadlessPlatform::default()),
//! );
//! let api = DogrunApi::new(Arc::new(client));
//!
//! api.login("taro@example.jp", "secret").await?;
//! let events = api.list_events().await?;
//! println!("{} events", events.len());
//! # Ok(())
//! # }
//! ```

pub mod admin_api;
pub mod api_client;
pub mod config_service;
pub mod dogrun_api;
pub mod logger_service;
pub mod performance_monitor;
pub mod platform;
pub mod session_manager;
pub mod storage;
pub mod token_store;
pub mod transport;

// 重导出常用类型,简化外部引用
pub use admin_api::AdminApi;
pub use api_client::ApiClient;
pub use config_service::{ClientConfig, ConfigService};
pub use dogrun_api::DogrunApi;
pub use logger_service::{AppLogger, LoggerConfig};
pub use performance_monitor::{
    EntrySink, NoPerformanceSource, ObserverHandle, PerformanceMonitor, PerformanceSource,
};
pub use platform::{HeadlessPlatform, Platform};
pub use session_manager::SessionManager;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use token_store::TokenStore;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody};
