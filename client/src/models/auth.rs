use serde::{Deserialize, Serialize};

use crate::models::{FileUpload, MultipartForm, Role};

/// 登录请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录成功后服务端返回的令牌
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// 会员注册申请
///
/// 必须附带狂犬病等疫苗接种证明,以 multipart 形式提交。
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: Option<String>,
    pub dog_name: String,
    pub dog_breed: Option<String>,
    pub dog_weight: Option<f64>,
    pub vaccine_certificate: FileUpload,
}

impl RegisterRequest {
    pub fn into_form(self) -> MultipartForm {
        MultipartForm::new()
            .text("name", self.name)
            .text("email", self.email)
            .text("password", self.password)
            .text("phone", self.phone)
            .optional_text("address", self.address)
            .text("dog_name", self.dog_name)
            .optional_text("dog_breed", self.dog_breed)
            .optional_text("dog_weight", self.dog_weight)
            .file("vaccine_certificate", self.vaccine_certificate)
    }
}

/// 注册申请受理结果
///
/// 服务端可能以空响应体受理申请,此时各字段取默认值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 忘记密码请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// 只包含提示信息的通用响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// 会员信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_role() -> Role {
    Role::User
}

/// 个人资料更新,仅发送有值的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
