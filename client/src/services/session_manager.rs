//! 会员会话管理器
//!
//! 职责: 在 `dogrun_session` 键下维护客户端侧的会话记录
//! 策略: 闲置超时 - 超过时长未活动的会话在下一次读取时被清除
//!
//! 默认不参与请求流程,令牌的有效性仍以服务端为准。

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::models::{Role, StorageError, UserSession};
use crate::services::storage::{keys, KeyValueStore};

/// 默认闲置超时 (分钟)
pub const DEFAULT_IDLE_MINUTES: i64 = 30;

/// 会话管理器
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    idle_timeout: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_idle_timeout(store, Duration::minutes(DEFAULT_IDLE_MINUTES))
    }

    pub fn with_idle_timeout(store: Arc<dyn KeyValueStore>, idle_timeout: Duration) -> Self {
        Self {
            store,
            idle_timeout,
        }
    }

    /// 开始新会话,覆盖旧会话
    pub fn start(&self, user_id: i64, role: Role) -> Result<UserSession, StorageError> {
        let session = UserSession::new(user_id, role);

        match self.load()? {
            Some(old) => tracing::info!(
                old_user_id = old.user_id,
                new_user_id = user_id,
                "Replacing existing session"
            ),
            None => tracing::info!(user_id = user_id, "Starting session"),
        }

        self.save(&session)?;
        Ok(session)
    }

    /// 当前有效会话,已闲置超时的会话会被清除
    pub fn current(&self) -> Result<Option<UserSession>, StorageError> {
        let Some(session) = self.load()? else {
            return Ok(None);
        };

        if session.is_idle_at(Utc::now(), self.idle_timeout) {
            tracing::info!(
                user_id = session.user_id,
                duration_seconds = session.duration_seconds(),
                "Session expired after inactivity"
            );
            self.end()?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// 刷新活跃时间
    pub fn touch(&self) -> Result<Option<UserSession>, StorageError> {
        let Some(mut session) = self.current()? else {
            return Ok(None);
        };
        session.last_activity_at = Utc::now();
        self.save(&session)?;
        Ok(Some(session))
    }

    pub fn end(&self) -> Result<(), StorageError> {
        self.store.remove(keys::SESSION)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.current(), Ok(Some(_)))
    }

    fn load(&self) -> Result<Option<UserSession>, StorageError> {
        match self.store.get(keys::SESSION)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable session record");
                    self.store.remove(keys::SESSION)?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn save(&self, session: &UserSession) -> Result<(), StorageError> {
        let json = serde_json::to_string(session)?;
        self.store.set(keys::SESSION, &json)
    }
}
