use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{ConfigError, LogLevel};
use crate::services::logger_service::LoggerConfig;

/// API基础地址
pub const ENV_API_URL: &str = "NEXT_PUBLIC_API_URL";
/// 单次请求超时 (秒)
pub const ENV_REQUEST_TIMEOUT: &str = "DOGRUN_REQUEST_TIMEOUT_SECS";
/// 持久化目录
pub const ENV_STORAGE_DIR: &str = "DOGRUN_STORAGE_DIR";
/// 应用日志阈值
pub const ENV_LOG_LEVEL: &str = "DOGRUN_LOG_LEVEL";
/// 已存储日志上限
pub const ENV_LOG_MAX_ENTRIES: &str = "DOGRUN_LOG_MAX_ENTRIES";
/// 远程日志地址,设置即启用
pub const ENV_REMOTE_LOG_URL: &str = "DOGRUN_REMOTE_LOG_URL";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 客户端配置
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub storage_dir: PathBuf,
    pub logger: LoggerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            storage_dir: default_storage_dir(),
            logger: LoggerConfig::default(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("satoyama-dogrun"))
        .unwrap_or_else(|| PathBuf::from(".dogrun"))
}

/// 配置服务
///
/// 职责单一: 从环境变量(及可选的 .env 文件)读取客户端配置。
/// 未设置的项使用默认值,已设置但格式错误的项返回 [`ConfigError`]。
pub struct ConfigService;

impl ConfigService {
    /// 加载 .env 后读取进程环境变量
    pub fn load() -> Result<ClientConfig, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
        }

        let vars: HashMap<String, String> = [
            ENV_API_URL,
            ENV_REQUEST_TIMEOUT,
            ENV_STORAGE_DIR,
            ENV_LOG_LEVEL,
            ENV_LOG_MAX_ENTRIES,
            ENV_REMOTE_LOG_URL,
        ]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
        .collect();

        Self::from_vars(&vars)
    }

    /// 从显式的键值表构造配置
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<ClientConfig, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let mut config = ClientConfig::default();

        if let Some(raw) = vars.get(ENV_API_URL) {
            let url = raw.trim().trim_end_matches('/');
            if url.is_empty() {
                return Err(ConfigError::Missing(ENV_API_URL.to_string()));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: ENV_API_URL.to_string(),
                    value: raw.clone(),
                });
            }
            config.api_base_url = url.to_string();
        }

        if let Some(raw) = get(ENV_REQUEST_TIMEOUT) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| invalid(ENV_REQUEST_TIMEOUT, raw))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = get(ENV_STORAGE_DIR) {
            config.storage_dir = PathBuf::from(raw);
        }

        if let Some(raw) = get(ENV_LOG_LEVEL) {
            config.logger.level = raw
                .parse::<LogLevel>()
                .map_err(|_| invalid(ENV_LOG_LEVEL, raw))?;
        }

        if let Some(raw) = get(ENV_LOG_MAX_ENTRIES) {
            config.logger.max_entries = raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid(ENV_LOG_MAX_ENTRIES, raw))?;
        }

        if let Some(raw) = get(ENV_REMOTE_LOG_URL) {
            config.logger.enable_remote = true;
            config.logger.remote_endpoint = Some(raw.to_string());
        }

        tracing::info!(
            api_base_url = %config.api_base_url,
            timeout_secs = config.request_timeout.as_secs(),
            storage_dir = %config.storage_dir.display(),
            log_level = %config.logger.level,
            remote_logging = config.logger.enable_remote,
            "Client configuration loaded"
        );

        Ok(config)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
