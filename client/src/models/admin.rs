use serde::{Deserialize, Serialize};

use crate::models::AdminUser;

/// 管理员登录请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

/// 管理员登录响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub admin: Option<AdminUser>,
}

/// 后台仪表盘统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_dogs: u64,
    #[serde(default)]
    pub pending_applications: u64,
    #[serde(default)]
    pub current_visitors: u64,
    #[serde(default)]
    pub today_entries: u64,
    #[serde(default)]
    pub upcoming_events: u64,
}

/// 入会申请状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// 入会申请
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub applicant_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub dog_name: Option<String>,
    #[serde(default)]
    pub vaccine_certificate_url: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<String>,
    #[serde(default)]
    pub review_note: Option<String>,
}

/// 申请列表查询参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ApplicationQuery {
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(format!("status={}", status.as_str()));
        }
        if let Some(page) = self.page {
            pairs.push(format!("page={}", page));
        }
        if let Some(limit) = self.limit {
            pairs.push(format!("limit={}", limit));
        }
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

/// 审批通过
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApproveRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// 驳回,必须给出理由
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// 申请统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub rejected: u64,
}

/// 管理端用户列表查询
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl AdminListQuery {
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(ref search) = self.search {
            pairs.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(page) = self.page {
            pairs.push(format!("page={}", page));
        }
        if let Some(limit) = self.limit {
            pairs.push(format!("limit={}", limit));
        }
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_query_string() {
        let query = ApplicationQuery {
            status: Some(ApplicationStatus::Pending),
            page: Some(1),
            limit: Some(20),
        };
        assert_eq!(query.to_query_string(), "?status=pending&page=1&limit=20");
    }
}
