use std::sync::Arc;

use crate::models::{
    ApiError, CalendarMonth, Comment, Dog, DogUpdate, EnterRequest, EntryRecord, Event,
    ForgotPasswordRequest, LikeResult, LoginRequest, MessageResponse, NewComment, NewDog, NewPost,
    Notice, Post, PostQuery, ProfileUpdate, RegisterRequest, RegisterResponse, ScanRequest,
    ScanResult, Tag, TokenResponse, TokenScope, User,
};
use crate::services::admin_api::AdminApi;
use crate::services::api_client::ApiClient;
use crate::utils::time_utils::validate_year_month;

/// Dogrun业务API门面
///
/// 每个后端操作对应一个方法,只负责拼装路径与请求体,
/// 错误由 [`ApiClient`] 归类后原样向上传递。
///
/// 含文件的操作(注册、登记犬只、发帖)使用 multipart,其余使用 JSON。
#[derive(Clone)]
pub struct DogrunApi {
    client: Arc<ApiClient>,
}

impl DogrunApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// 管理端命名空间
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(&self.client)
    }

    // ---- 认证 ----

    /// 登录,成功后把令牌保存到用户作用域
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token: TokenResponse = self.client.post("/auth/login", &request).await?;

        if let Err(e) = self
            .client
            .tokens()
            .save_token(TokenScope::User, &token.access_token)
        {
            tracing::warn!(error = %e, "Failed to persist access token");
        }

        Ok(token)
    }

    /// 提交入会申请 (附疫苗证明),记录返回的申请ID
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let response: RegisterResponse = self
            .client
            .post_multipart::<Option<RegisterResponse>>("/auth/register", request.into_form())
            .await?
            .unwrap_or_default();

        if let Some(id) = response.application_id {
            if let Err(e) = self.client.tokens().save_application_id(&id.to_string()) {
                tracing::warn!(error = %e, "Failed to persist application id");
            }
        }

        Ok(response)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        let response: Option<MessageResponse> =
            self.client.post("/auth/forgot-password", &request).await?;
        Ok(response.unwrap_or_default())
    }

    /// 本地登出,仅删除用户令牌
    pub fn logout(&self) {
        if let Err(e) = self.client.tokens().clear(TokenScope::User) {
            tracing::warn!(error = %e, "Failed to clear access token");
        }
        tracing::info!("User logged out");
    }

    pub fn is_logged_in(&self) -> bool {
        self.client.tokens().is_authenticated(TokenScope::User)
    }

    /// 最近一次提交的入会申请ID
    pub fn last_application_id(&self) -> Option<String> {
        self.client.tokens().application_id().ok().flatten()
    }

    // ---- 会员 ----

    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get("/users/me").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.client.put("/users/profile", update).await
    }

    // ---- 犬只 ----

    pub async fn list_dogs(&self) -> Result<Vec<Dog>, ApiError> {
        self.client.get("/dogs").await
    }

    pub async fn get_dog(&self, id: i64) -> Result<Dog, ApiError> {
        self.client.get(&format!("/dogs/{}", id)).await
    }

    pub async fn create_dog(&self, dog: NewDog) -> Result<Dog, ApiError> {
        self.client.post_multipart("/dogs", dog.into_form()).await
    }

    pub async fn update_dog(&self, id: i64, update: &DogUpdate) -> Result<Dog, ApiError> {
        self.client.put(&format!("/dogs/{}", id), update).await
    }

    pub async fn delete_dog(&self, id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self.client.delete(&format!("/dogs/{}", id)).await?;
        Ok(())
    }

    // ---- 帖子 ----

    pub async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>, ApiError> {
        self.client
            .get(&format!("/posts{}", query.to_query_string()))
            .await
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, ApiError> {
        self.client.get(&format!("/posts/{}", id)).await
    }

    pub async fn create_post(&self, post: NewPost) -> Result<Post, ApiError> {
        self.client.post_multipart("/posts", post.into_form()).await
    }

    pub async fn like_post(&self, id: i64) -> Result<LikeResult, ApiError> {
        self.client.post_empty(&format!("/posts/{}/like", id)).await
    }

    pub async fn comment_on_post(&self, id: i64, content: &str) -> Result<Comment, ApiError> {
        let comment = NewComment {
            content: content.to_string(),
        };
        self.client
            .post(&format!("/posts/{}/comments", id), &comment)
            .await
    }

    // ---- 活动与日历 ----

    pub async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/events").await
    }

    /// 月历,月份不在 1..=12 时不发请求直接报错
    pub async fn calendar(&self, year: i32, month: u32) -> Result<CalendarMonth, ApiError> {
        if validate_year_month(year, month).is_none() {
            return Err(ApiError::InvalidRequest(format!(
                "invalid calendar month: {}-{}",
                year, month
            )));
        }
        self.client
            .get(&format!("/calendar/{}/{}", year, month))
            .await
    }

    // ---- 公告 ----

    pub async fn list_notices(&self) -> Result<Vec<Notice>, ApiError> {
        self.client.get("/notices").await
    }

    pub async fn mark_notice_read(&self, id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .put_empty(&format!("/notices/{}/read", id))
            .await?;
        Ok(())
    }

    // ---- 入离园 ----

    pub async fn scan_qr(&self, qr_code: &str) -> Result<ScanResult, ApiError> {
        let request = ScanRequest {
            qr_code: qr_code.to_string(),
        };
        self.client.post("/entry/scan", &request).await
    }

    pub async fn enter(&self, dog_ids: &[i64]) -> Result<EntryRecord, ApiError> {
        let request = EnterRequest {
            dog_ids: dog_ids.to_vec(),
        };
        self.client.post("/entry/enter", &request).await
    }

    pub async fn exit(&self) -> Result<EntryRecord, ApiError> {
        self.client.post_empty("/entry/exit").await
    }

    // ---- 标签 ----

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.client.get("/tags").await
    }
}
