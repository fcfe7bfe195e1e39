use crate::models::{
    AdminListQuery, AdminLoginRequest, AdminLoginResponse, Application, ApplicationQuery,
    ApplicationStats, ApproveRequest, DashboardStats, Dog, Event, Post, RejectRequest, TokenScope,
    User,
};
use crate::models::ApiError;
use crate::services::api_client::ApiClient;

/// 管理端API命名空间
///
/// 结构与会员端一致,登录令牌保存在管理员作用域。
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// 管理员登录,保存令牌与管理员信息
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminLoginResponse, ApiError> {
        let request = AdminLoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: AdminLoginResponse = self.client.post("/admin/login", &request).await?;

        let tokens = self.client.tokens();
        if let Err(e) = tokens.save_token(TokenScope::Admin, &response.access_token) {
            tracing::warn!(error = %e, "Failed to persist admin token");
        }
        if let Some(ref admin) = response.admin {
            if let Err(e) = tokens.save_admin_user(admin) {
                tracing::warn!(error = %e, "Failed to persist admin user");
            }
            tracing::info!(admin_id = admin.id, role = ?admin.role, "Admin logged in");
        }

        Ok(response)
    }

    /// 本地登出,删除管理员令牌与管理员信息
    pub fn logout(&self) {
        if let Err(e) = self.client.tokens().clear(TokenScope::Admin) {
            tracing::warn!(error = %e, "Failed to clear admin token");
        }
        tracing::info!("Admin logged out");
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.client.get("/admin/dashboard/stats").await
    }

    pub async fn users(&self, query: &AdminListQuery) -> Result<Vec<User>, ApiError> {
        self.client
            .get(&format!("/admin/users{}", query.to_query_string()))
            .await
    }

    pub async fn dogs(&self, query: &AdminListQuery) -> Result<Vec<Dog>, ApiError> {
        self.client
            .get(&format!("/admin/dogs{}", query.to_query_string()))
            .await
    }

    pub async fn posts(&self, query: &AdminListQuery) -> Result<Vec<Post>, ApiError> {
        self.client
            .get(&format!("/admin/posts{}", query.to_query_string()))
            .await
    }

    pub async fn events(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/admin/events").await
    }

    // ---- 入会申请 ----

    pub async fn applications(&self, query: &ApplicationQuery) -> Result<Vec<Application>, ApiError> {
        self.client
            .get(&format!("/admin/applications{}", query.to_query_string()))
            .await
    }

    pub async fn application(&self, id: i64) -> Result<Application, ApiError> {
        self.client
            .get(&format!("/admin/applications/{}", id))
            .await
    }

    pub async fn approve_application(
        &self,
        id: i64,
        note: Option<&str>,
    ) -> Result<Application, ApiError> {
        let request = ApproveRequest {
            note: note.map(str::to_string),
        };
        self.client
            .post(&format!("/admin/applications/{}/approve", id), &request)
            .await
    }

    /// 驳回申请,理由不能为空
    pub async fn reject_application(&self, id: i64, reason: &str) -> Result<Application, ApiError> {
        if reason.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "rejection reason must not be empty".to_string(),
            ));
        }
        let request = RejectRequest {
            reason: reason.to_string(),
        };
        self.client
            .post(&format!("/admin/applications/{}/reject", id), &request)
            .await
    }

    pub async fn application_stats(&self) -> Result<ApplicationStats, ApiError> {
        self.client.get("/admin/applications/stats").await
    }
}
