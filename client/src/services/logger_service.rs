//! 应用日志服务
//!
//! 分级、可持久化、有容量上限的结构化日志:
//! - 低于阈值的日志在任何输出之前即被丢弃
//! - 控制台输出: 通过 tracing 同步输出
//! - 存储输出: 追加到 `app_logs` 数组,超出上限时从头部批量截断
//! - 远程输出: 后台任务POST单条日志,失败只告警
//!
//! 任何输出端的失败都在本地处理,绝不影响调用方。

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use reqwest::Method;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::{AdminUser, LogEntry, LogLevel, StorageError};
use crate::services::platform::Platform;
use crate::services::storage::{keys, KeyValueStore};
use crate::services::transport::{HttpRequest, HttpTransport, RequestBody};
use crate::utils::time_utils::export_file_name;

/// 导出文件名前缀
pub const LOG_EXPORT_PREFIX: &str = "dogrun-logs";

/// 日志配置,可在运行期整体替换
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub max_entries: usize,
    pub enable_console: bool,
    pub enable_storage: bool,
    pub enable_remote: bool,
    pub remote_endpoint: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            max_entries: 1000,
            enable_console: true,
            enable_storage: true,
            enable_remote: false,
            remote_endpoint: None,
        }
    }
}

/// 应用日志器
pub struct AppLogger {
    config: RwLock<LoggerConfig>,
    store: Arc<dyn KeyValueStore>,
    /// `app_logs` 的读-改-写必须串行,否则并发追加会互相覆盖
    append_lock: Mutex<()>,
    platform: Arc<dyn Platform>,
    remote: Option<Arc<dyn HttpTransport>>,
    session_id: String,
    user_id: Option<String>,
}

impl AppLogger {
    /// 创建日志器
    ///
    /// 用户ID仅在构造时从 `admin_user` 读取一次。
    pub fn new(
        config: LoggerConfig,
        store: Arc<dyn KeyValueStore>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        let user_id = store
            .get(keys::ADMIN_USER)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str::<AdminUser>(&raw).ok())
            .map(|user| user.id.to_string());

        let session_id = format!("session_{}", uuid::Uuid::new_v4().simple());

        tracing::debug!(
            session_id = %session_id,
            user_id = ?user_id,
            level = %config.level,
            "Application logger initialized"
        );

        Self {
            config: RwLock::new(config),
            store,
            append_lock: Mutex::new(()),
            platform,
            remote: None,
            session_id,
            user_id,
        }
    }

    /// 远程输出使用的传输通道
    pub fn with_remote_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.remote = Some(transport);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    pub fn set_config(&self, config: LoggerConfig) {
        *self.config.write() = config;
    }

    pub fn log(&self, level: LogLevel, message: &str, data: Option<serde_json::Value>) {
        self.log_with_request(level, message, data, None);
    }

    /// 记录一条日志并分发到启用的输出端
    pub fn log_with_request(
        &self,
        level: LogLevel,
        message: &str,
        data: Option<serde_json::Value>,
        request_id: Option<&str>,
    ) {
        let config = self.config.read().clone();
        if level < config.level {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            data,
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
            request_id: request_id.map(str::to_string),
            url: self.platform.current_url(),
            user_agent: self.platform.user_agent(),
        };

        if config.enable_console {
            Self::write_console(&entry);
        }

        if config.enable_storage {
            if let Err(e) = self.append_to_storage(&entry, config.max_entries) {
                tracing::warn!(error = %e, "Failed to persist log entry");
            }
        }

        if config.enable_remote {
            match config.remote_endpoint {
                Some(ref endpoint) => self.send_remote(endpoint, &entry),
                None => tracing::warn!("Remote logging enabled without endpoint"),
            }
        }
    }

    pub fn debug(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Debug, message, data);
    }

    pub fn info(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Info, message, data);
    }

    pub fn warn(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Warn, message, data);
    }

    pub fn error(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, data);
    }

    pub fn fatal(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Fatal, message, data);
    }

    /// 记录用户操作
    pub fn log_user_action(&self, action: &str, data: Option<serde_json::Value>) {
        self.log(
            LogLevel::Info,
            &format!("User action: {}", action),
            Some(serde_json::json!({ "action": action, "details": data })),
        );
    }

    /// 记录API错误
    pub fn log_api_error(
        &self,
        method: &str,
        url: &str,
        status: u16,
        message: &str,
        request_id: &str,
    ) {
        self.log_with_request(
            LogLevel::Error,
            &format!("API error: {} {}", method, url),
            Some(serde_json::json!({
                "method": method,
                "url": url,
                "status": status,
                "message": message,
            })),
            Some(request_id),
        );
    }

    fn write_console(entry: &LogEntry) {
        let data = entry.data.as_ref().map(|d| d.to_string());
        match entry.level {
            LogLevel::Fatal => tracing::error!(
                source = "app",
                fatal = true,
                session_id = %entry.session_id,
                request_id = ?entry.request_id,
                data = ?data,
                "{}",
                entry.message
            ),
            LogLevel::Error => tracing::error!(
                source = "app",
                session_id = %entry.session_id,
                request_id = ?entry.request_id,
                data = ?data,
                "{}",
                entry.message
            ),
            LogLevel::Warn => tracing::warn!(
                source = "app",
                request_id = ?entry.request_id,
                data = ?data,
                "{}",
                entry.message
            ),
            LogLevel::Info => tracing::info!(
                source = "app",
                data = ?data,
                "{}",
                entry.message
            ),
            LogLevel::Debug => tracing::debug!(
                source = "app",
                data = ?data,
                "{}",
                entry.message
            ),
        }
    }

    fn append_to_storage(&self, entry: &LogEntry, max_entries: usize) -> Result<(), StorageError> {
        let _guard = self.append_lock.lock();
        let mut entries = self.read_entries()?;
        entries.push(entry.clone());
        if entries.len() > max_entries {
            let overflow = entries.len() - max_entries;
            entries.drain(..overflow);
        }
        let json = serde_json::to_string(&entries)?;
        self.store.set(keys::LOGS, &json)
    }

    fn read_entries(&self) -> Result<Vec<LogEntry>, StorageError> {
        match self.store.get(keys::LOGS)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// 后台投递单条日志
    ///
    /// 没有tokio运行时或未配置传输通道时跳过,投递失败只告警。
    fn send_remote(&self, endpoint: &str, entry: &LogEntry) {
        let Some(transport) = self.remote.clone() else {
            tracing::warn!("Remote logging enabled without transport");
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, remote log dropped");
            return;
        };
        let body = match serde_json::to_value(entry) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize remote log entry");
                return;
            }
        };

        let request = HttpRequest::new(Method::POST, endpoint).body(RequestBody::Json(body));
        handle.spawn(async move {
            match transport.send(request).await {
                Ok(resp) if resp.is_success() => {}
                Ok(resp) => tracing::warn!(status = resp.status, "Remote log rejected"),
                Err(e) => tracing::warn!(error = %e, "Failed to send remote log"),
            }
        });
    }

    /// 读取全部已存储日志,存储损坏时返回空列表
    pub fn stored_logs(&self) -> Vec<LogEntry> {
        self.read_entries().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read stored logs");
            Vec::new()
        })
    }

    pub fn clear_logs(&self) {
        let _guard = self.append_lock.lock();
        if let Err(e) = self.store.remove(keys::LOGS) {
            tracing::warn!(error = %e, "Failed to clear stored logs");
        }
    }

    /// 导出为格式化JSON
    pub fn export_logs(&self) -> String {
        serde_json::to_string_pretty(&self.stored_logs()).unwrap_or_else(|_| "[]".to_string())
    }

    /// 导出到目录,文件名带当天日期
    pub fn export_logs_to(&self, dir: &Path) -> Result<PathBuf, StorageError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(LOG_EXPORT_PREFIX, Utc::now().date_naive()));
        std::fs::write(&path, self.export_logs())?;
        tracing::info!(path = %path.display(), "Logs exported");
        Ok(path)
    }
}
