//! 数据模型模块
//!
//! 包含所有核心数据结构:
//! - errors: 错误类型定义 (API、传输、存储、配置、应用级错误)
//! - session: 令牌作用域、角色、管理员与会话
//! - log_entry: 应用日志条目
//! - performance: 性能指标与报告
//! - auth / dog / post / event / entry / admin: REST资源的请求与响应
//! - upload: multipart上传
//!
//! # 设计原则
//!
//! 1. **类型即契约**: 请求/响应均为强类型,未知字段忽略,缺失字段取默认值
//! 2. **错误处理**: 所有可失败操作返回 Result,附带完整上下文
//! 3. **角色安全**: 角色为枚举,权限判断穷尽匹配

pub mod admin;
pub mod auth;
pub mod dog;
pub mod entry;
pub mod errors;
pub mod event;
pub mod log_entry;
pub mod performance;
pub mod post;
pub mod session;
pub mod upload;

// 重导出常用类型,简化外部引用
pub use admin::{
    AdminListQuery, AdminLoginRequest, AdminLoginResponse, Application, ApplicationQuery,
    ApplicationStats, ApplicationStatus, ApproveRequest, DashboardStats, RejectRequest,
};
pub use auth::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, ProfileUpdate, RegisterRequest,
    RegisterResponse, TokenResponse, User,
};
pub use dog::{Dog, DogUpdate, NewDog};
pub use entry::{EnterRequest, EntryRecord, ScanRequest, ScanResult};
pub use errors::{ApiError, AppError, ConfigError, StorageError, TransportError};
pub use event::{CalendarMonth, Event, Notice};
pub use log_entry::{LogEntry, LogLevel};
pub use performance::{
    MetricUnit, NavigationTiming, ObservedEntryKind, PerformanceEntry, PerformanceMetric,
    PerformanceReport, ReportSummary,
};
pub use post::{Comment, LikeResult, NewComment, NewPost, Post, PostQuery, Tag};
pub use session::{AdminUser, Role, TokenScope, UserSession};
pub use upload::{FileUpload, MultipartForm};
