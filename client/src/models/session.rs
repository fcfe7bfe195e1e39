use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::services::storage::keys;

/// 令牌作用域
///
/// 同一个存储中可以同时持有一个用户令牌和一个管理员令牌,二者使用不同的键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    User,
    Admin,
}

impl TokenScope {
    /// 附加Authorization头时的检查顺序,先出现者生效
    pub const PRIORITY: [TokenScope; 2] = [TokenScope::User, TokenScope::Admin];

    /// 该作用域令牌的持久化键
    pub fn storage_key(self) -> &'static str {
        match self {
            TokenScope::User => keys::ACCESS_TOKEN,
            TokenScope::Admin => keys::ADMIN_TOKEN,
        }
    }
}

/// 用户角色
///
/// 未知的角色字符串在反序列化时直接失败,新增角色必须在这里显式声明,
/// 所有权限判断都是穷尽匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// 能否进入管理后台
    pub fn is_admin(self) -> bool {
        match self {
            Role::User => false,
            Role::Admin | Role::SuperAdmin => true,
        }
    }

    /// 能否管理其他管理员账号
    pub fn can_manage_admins(self) -> bool {
        match self {
            Role::User | Role::Admin => false,
            Role::SuperAdmin => true,
        }
    }

    /// 能否审核入会申请
    pub fn can_review_applications(self) -> bool {
        match self {
            Role::User => false,
            Role::Admin | Role::SuperAdmin => true,
        }
    }
}

/// 已登录的管理员信息
///
/// 以JSON形式持久化在 `admin_user` 键下,日志模块从这里读取用户ID。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

/// 会话管理器持久化的用户会话
///
/// 与令牌相互独立: 令牌的有效性完全由服务端决定,
/// 这里仅记录客户端侧的活跃时间用于闲置超时判断。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: i64,
    pub role: Role,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: i64, role: Role) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            role,
            started_at: now,
            last_activity_at: now,
        }
    }

    /// 在给定时刻是否已超过闲置时长
    pub fn is_idle_at(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_activity_at > idle_timeout
    }

    /// 会话持续秒数
    pub fn duration_seconds(&self) -> i64 {
        (self.last_activity_at - self.started_at).num_seconds()
    }
}
