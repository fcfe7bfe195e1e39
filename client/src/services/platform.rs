//! 运行环境能力
//!
//! 替代 `window.location` 与 `navigator` 的全局访问。
//! 非浏览器环境下使用 [`HeadlessPlatform`],缺失的能力一律视为空操作。

use parking_lot::RwLock;

/// 运行环境抽象
pub trait Platform: Send + Sync {
    /// 当前完整URL
    fn current_url(&self) -> Option<String>;

    /// 当前路径 (如 `/admin/users`)
    fn current_path(&self) -> Option<String>;

    fn user_agent(&self) -> Option<String>;

    /// 强制跳转 (浏览器中为整页跳转)
    fn navigate(&self, location: &str);
}

/// 无界面运行环境
///
/// 维护一个可变的"当前位置",记录所有跳转,既用于命令行也用于测试。
#[derive(Debug)]
pub struct HeadlessPlatform {
    origin: String,
    user_agent: String,
    path: RwLock<String>,
    navigations: RwLock<Vec<String>>,
}

impl HeadlessPlatform {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            user_agent: format!("satoyama-dogrun/{}", env!("CARGO_PKG_VERSION")),
            path: RwLock::new("/".to_string()),
            navigations: RwLock::new(Vec::new()),
        }
    }

    pub fn with_path(self, path: impl Into<String>) -> Self {
        *self.path.write() = path.into();
        self
    }

    pub fn set_path(&self, path: impl Into<String>) {
        *self.path.write() = path.into();
    }

    /// 迄今为止的所有跳转目标
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.read().clone()
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new("app://dogrun")
    }
}

impl Platform for HeadlessPlatform {
    fn current_url(&self) -> Option<String> {
        Some(format!("{}{}", self.origin, self.path.read()))
    }

    fn current_path(&self) -> Option<String> {
        Some(self.path.read().clone())
    }

    fn user_agent(&self) -> Option<String> {
        Some(self.user_agent.clone())
    }

    fn navigate(&self, location: &str) {
        tracing::info!(location = %location, "Navigating");
        self.navigations.write().push(location.to_string());
        *self.path.write() = location.to_string();
    }
}
