use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::models::errors::FALLBACK_ERROR_MESSAGE;
use crate::models::{ApiError, MultipartForm, TransportError};
use crate::services::logger_service::AppLogger;
use crate::services::performance_monitor::PerformanceMonitor;
use crate::services::platform::Platform;
use crate::services::token_store::TokenStore;
use crate::services::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::utils::time_utils::generate_request_id;

/// 请求关联ID头
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// 管理后台路径前缀
pub const ADMIN_PATH_PREFIX: &str = "/admin";

/// 管理后台入口,管理端收到401后强制跳转到这里
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// API客户端
///
/// 所有出站HTTP调用的唯一出口:
/// - 附加 `Authorization: Bearer <token>` 与 `X-Request-ID`
/// - 记录响应日志与API耗时
/// - 把失败归类为 [`ApiError`],401时清空会话
///
/// 本层不做任何自动重试。
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    platform: Arc<dyn Platform>,
    logger: Option<Arc<AppLogger>>,
    performance: Option<Arc<PerformanceMonitor>>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        tokens: TokenStore,
        platform: Arc<dyn Platform>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::info!(base_url = %base_url, "API client initialized");
        Self {
            base_url,
            transport,
            tokens,
            platform,
            logger: None,
            performance: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<AppLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_performance(mut self, performance: Arc<PerformanceMonitor>) -> Self {
        self.performance = Some(performance);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, RequestBody::Empty).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, json_body(body)?).await
    }

    /// 无请求体的POST (如点赞、离园)
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestBody::Empty).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, json_body(body)?).await
    }

    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::PUT, path, RequestBody::Empty).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, RequestBody::Empty).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestBody::Multipart(form))
            .await
    }

    /// 发送请求并解码响应
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T, ApiError> {
        let url = self.url_for(path);
        let request_id = generate_request_id();
        let request = self.prepare(method.clone(), &url, &request_id, body);

        tracing::debug!(
            method = %method,
            url = %url,
            request_id = %request_id,
            "API request"
        );

        let started = Instant::now();
        let result = self.transport.send(request).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let response = match result {
            Ok(response) => response,
            // 请求在本地就无法构造(如非法的MIME类型),重试没有意义
            Err(TransportError::Request(reason)) => {
                tracing::error!(
                    method = %method,
                    url = %url,
                    request_id = %request_id,
                    error = %reason,
                    "Request could not be built"
                );
                return Err(ApiError::InvalidRequest(reason));
            }
            Err(e) => {
                tracing::error!(
                    method = %method,
                    url = %url,
                    request_id = %request_id,
                    error = %e,
                    "Network error"
                );
                let err = ApiError::network(e.to_string());
                if let Some(ref logger) = self.logger {
                    logger.log_api_error(method.as_str(), &url, 0, err.message(), &request_id);
                }
                return Err(err);
            }
        };

        if let Some(ref performance) = self.performance {
            performance.record_api_call(method.as_str(), path, elapsed_ms, response.status);
        }

        if !response.is_success() {
            return Err(self.handle_error_response(&method, &url, &request_id, response));
        }

        tracing::info!(
            method = %method,
            url = %url,
            status = response.status,
            request_id = %request_id,
            "API response"
        );

        decode_body(&response)
    }

    /// 组装请求: 令牌 + 请求ID
    fn prepare(&self, method: Method, url: &str, request_id: &str, body: RequestBody) -> HttpRequest {
        let mut request = HttpRequest::new(method, url)
            .header(REQUEST_ID_HEADER, request_id)
            .header("Accept", "application/json")
            .body(body);

        match self.tokens.bearer_token() {
            Ok(Some((_, token))) => {
                request = request.header("Authorization", format!("Bearer {}", token));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read access token, sending anonymously");
            }
        }

        request
    }

    fn handle_error_response(
        &self,
        method: &Method,
        url: &str,
        request_id: &str,
        response: HttpResponse,
    ) -> ApiError {
        let payload = parse_payload(&response.body);
        let message = extract_error_message(&payload);

        tracing::error!(
            method = %method,
            url = %url,
            status = response.status,
            request_id = %request_id,
            message = %message,
            "API error"
        );
        if let Some(ref logger) = self.logger {
            logger.log_api_error(method.as_str(), url, response.status, &message, request_id);
        }

        if response.status == 401 {
            self.handle_unauthorized();
        }

        ApiError::Http {
            status: response.status,
            message,
            payload,
        }
    }

    /// 401: 清空所有令牌,管理后台页面强制跳回登录页
    fn handle_unauthorized(&self) {
        if let Err(e) = self.tokens.clear_all() {
            tracing::warn!(error = %e, "Failed to clear session after 401");
        }
        tracing::warn!("Session cleared after 401");

        let in_admin = self
            .platform
            .current_path()
            .map(|p| p.starts_with(ADMIN_PATH_PREFIX))
            .unwrap_or(false);
        if in_admin {
            self.platform.navigate(ADMIN_LOGIN_PATH);
        }
    }
}

fn json_body<B: Serialize>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

/// 空响应体按JSON `null` 解码,使 `()` 等类型可以直接使用
fn decode_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        status: response.status,
        message: e.to_string(),
    })
}

/// 响应体解析为JSON,失败时保留为字符串
fn parse_payload(body: &[u8]) -> serde_json::Value {
    if body.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// 优先使用服务端的 `detail` 字段
///
/// 字符串原样返回;非字符串(如字段校验错误列表)按JSON文本返回。
pub fn extract_error_message(payload: &serde_json::Value) -> String {
    match payload.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Null) | None => FALLBACK_ERROR_MESSAGE.to_string(),
        Some(other) => other.to_string(),
    }
}
