//! 里山ドッグラン 客户端核心
//!
//! 会员端与管理后台共用的API访问层:
//! - 统一的HTTP出口,附加令牌与请求关联ID,归类错误,401时清空会话
//! - 按REST资源划分的强类型业务门面
//! - 分级、有上限、可导出的应用日志
//! - 性能指标采集与报告
//!
//! 所有组件都是在启动时显式构造的实例,见 [`state::AppState`]。

pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use models::{ApiError, LogEntry, LogLevel, PerformanceMetric, PerformanceReport};
pub use services::{AppLogger, DogrunApi, PerformanceMonitor};
pub use state::AppState;
