use std::sync::Arc;

use crate::models::{AdminUser, StorageError, TokenScope};
use crate::services::storage::{keys, KeyValueStore};

/// 令牌存储
///
/// 令牌在客户端不追踪过期时间: 存在即视为已登录,
/// 显式登出或收到第一个401时立即销毁。
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save_token(&self, scope: TokenScope, token: &str) -> Result<(), StorageError> {
        self.store.set(scope.storage_key(), token)?;
        tracing::info!(scope = ?scope, "Access token stored");
        Ok(())
    }

    pub fn token(&self, scope: TokenScope) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(scope.storage_key())?
            .filter(|t| !t.is_empty()))
    }

    /// 按固定优先级取第一个存在的令牌
    ///
    /// 用户令牌优先于管理员令牌。同一存储中两者并存时,
    /// 管理端请求也会携带用户令牌。
    pub fn bearer_token(&self) -> Result<Option<(TokenScope, String)>, StorageError> {
        for scope in TokenScope::PRIORITY {
            if let Some(token) = self.token(scope)? {
                return Ok(Some((scope, token)));
            }
        }
        Ok(None)
    }

    pub fn is_authenticated(&self, scope: TokenScope) -> bool {
        matches!(self.token(scope), Ok(Some(_)))
    }

    pub fn clear(&self, scope: TokenScope) -> Result<(), StorageError> {
        self.store.remove(scope.storage_key())?;
        if scope == TokenScope::Admin {
            self.store.remove(keys::ADMIN_USER)?;
        }
        Ok(())
    }

    /// 删除所有已知令牌及管理员信息
    ///
    /// 每个键独立删除,某个键失败不影响其余键,最终返回第一个错误。
    pub fn clear_all(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in [keys::ACCESS_TOKEN, keys::ADMIN_TOKEN, keys::ADMIN_USER] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key = key, error = %e, "Failed to remove session key");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn save_admin_user(&self, user: &AdminUser) -> Result<(), StorageError> {
        let json = serde_json::to_string(user)?;
        self.store.set(keys::ADMIN_USER, &json)
    }

    /// 读取管理员信息,内容损坏时视为不存在
    pub fn admin_user(&self) -> Option<AdminUser> {
        let raw = self.store.get(keys::ADMIN_USER).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save_application_id(&self, id: &str) -> Result<(), StorageError> {
        self.store.set(keys::APPLICATION_ID, id)
    }

    pub fn application_id(&self) -> Result<Option<String>, StorageError> {
        self.store.get(keys::APPLICATION_ID)
    }
}
