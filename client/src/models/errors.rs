use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 服务端未提供 `detail` 时的兜底提示
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// 无响应(断网/超时)时的固定提示
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// API调用相关错误
///
/// 传输层是唯一检查和归类错误的地方,业务门面层原样向上传递。
/// 是否重试由调用方根据 [`ApiError::is_retryable`] 自行决定,本层不做自动重试。
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ApiError {
    /// 服务端返回了非2xx响应
    ///
    /// `payload` 保留原始响应体,无法解析为JSON时为字符串或 `null`
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        payload: serde_json::Value,
    },

    /// 未收到任何响应
    ///
    /// 可能原因:
    /// - 网络连接中断
    /// - 服务器不可达
    /// - 请求超时 (与其他连接故障不作区分)
    #[error("{message}")]
    Network { message: String, cause: String },

    /// 2xx响应体无法解析为期望的类型
    #[error("响应数据解析失败 (状态码 {status}): {message}")]
    Decode { status: u16, message: String },

    /// 请求参数在发出前即被判定无效
    #[error("无效的请求参数: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// 由传输失败构造网络错误
    pub fn network(cause: impl Into<String>) -> Self {
        ApiError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            cause: cause.into(),
        }
    }

    /// HTTP状态码,未收到响应时为0
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Http { status, .. } | ApiError::Decode { status, .. } => *status,
            ApiError::Network { .. } | ApiError::InvalidRequest(_) => 0,
        }
    }

    /// 面向用户的错误信息
    pub fn message(&self) -> &str {
        match self {
            ApiError::Http { message, .. }
            | ApiError::Network { message, .. }
            | ApiError::Decode { message, .. } => message,
            ApiError::InvalidRequest(message) => message,
        }
    }

    /// 服务端原始响应体
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Http { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// 是否值得重试
    ///
    /// 仅由状态码决定: 5xx 与网络错误可重试,其余不可重试。
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http { status, .. } => (500..600).contains(status),
            ApiError::Network { .. } => true,
            ApiError::Decode { .. } | ApiError::InvalidRequest(_) => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }
}

/// 底层HTTP传输错误
///
/// 只描述"没有拿到响应"的情况,有响应的错误由 `ApiClient` 归类为 [`ApiError::Http`]。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("请求超时")]
    Timeout,

    #[error("无法连接到服务器: {0}")]
    Connect(String),

    #[error("请求构造失败: {0}")]
    Request(String),

    #[error("传输失败: {0}")]
    Other(String),
}

/// 实现从reqwest::Error到TransportError的转换
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_builder() {
            TransportError::Request(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// 键值存储相关错误
///
/// 日志与性能监控内部遇到的存储错误只在本地告警,绝不向调用方传播。
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum StorageError {
    /// 文件读写失败
    #[error("存储I/O失败: {0}")]
    Io(String),

    /// 序列化/反序列化失败
    #[error("数据序列化失败: {0}")]
    Serialization(String),

    /// 超出存储配额
    #[error("存储空间不足: 需要 {required} 字节, 上限 {limit} 字节")]
    QuotaExceeded { required: usize, limit: usize },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// 配置错误
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ConfigError {
    /// 必填值为空
    #[error("配置项 {0} 不能为空")]
    Missing(String),

    /// 值格式不正确
    #[error("配置项 {key} 的值无效: {value}")]
    InvalidValue { key: String, value: String },
}

/// 应用级错误
///
/// 仅用于启动装配阶段,运行期错误使用各自的细分类型。
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: "boom".into(),
            payload: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_retryable_only_for_server_errors() {
        assert!(http(500).is_retryable());
        assert!(http(503).is_retryable());
        assert!(!http(404).is_retryable());
        assert!(!http(401).is_retryable());
        assert!(!http(600).is_retryable());
    }

    #[test]
    fn test_network_error_shape() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.status(), 0);
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
        assert!(err.is_retryable());
        assert!(err.payload().is_none());
    }

    #[test]
    fn test_error_serialization_is_tagged() {
        let json = serde_json::to_value(http(418)).unwrap();
        assert_eq!(json["error"], "Http");
        assert_eq!(json["details"]["status"], 418);
    }
}
