use std::sync::Arc;

use crate::models::AppError;
use crate::services::{
    ApiClient, AppLogger, ClientConfig, DogrunApi, FileStore, HeadlessPlatform, HttpTransport,
    KeyValueStore, NoPerformanceSource, PerformanceMonitor, PerformanceSource, Platform,
    ReqwestTransport, SessionManager, TokenStore,
};

/// 应用状态
///
/// 启动时显式构造的全部实例,取代模块级单例:
/// - store: 持久化存储
/// - platform: 运行环境能力
/// - logger: 应用日志
/// - performance: 性能监控
/// - api: 业务API门面 (内含唯一的 `ApiClient`)
/// - sessions: 会话管理器 (默认不参与请求流程)
pub struct AppState {
    pub config: ClientConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub platform: Arc<dyn Platform>,
    pub logger: Arc<AppLogger>,
    pub performance: Arc<PerformanceMonitor>,
    pub api: DogrunApi,
    pub sessions: SessionManager,
}

impl AppState {
    /// 按配置装配生产实例
    ///
    /// # 错误处理
    /// 存储目录不可用或HTTP客户端无法创建时启动失败
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_dir)?);
        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(config.request_timeout)?);
        let platform: Arc<dyn Platform> = Arc::new(HeadlessPlatform::default());

        Ok(Self::from_parts(
            config,
            store,
            transport,
            platform,
            &NoPerformanceSource,
        ))
    }

    /// 使用注入的依赖装配,测试中传入假实现
    pub fn from_parts(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn HttpTransport>,
        platform: Arc<dyn Platform>,
        performance_source: &dyn PerformanceSource,
    ) -> Self {
        let logger = Arc::new(
            AppLogger::new(config.logger.clone(), store.clone(), platform.clone())
                .with_remote_transport(transport.clone()),
        );
        let performance = Arc::new(PerformanceMonitor::new(performance_source));

        let client = ApiClient::new(
            config.api_base_url.clone(),
            transport,
            TokenStore::new(store.clone()),
            platform.clone(),
        )
        .with_logger(logger.clone())
        .with_performance(performance.clone());

        let api = DogrunApi::new(Arc::new(client));
        let sessions = SessionManager::new(store.clone());

        tracing::info!(
            api_base_url = %config.api_base_url,
            session_id = %logger.session_id(),
            observers = performance.observer_count(),
            "AppState initialized"
        );

        Self {
            config,
            store,
            platform,
            logger,
            performance,
            api,
            sessions,
        }
    }

    /// 退出前释放性能监控订阅
    pub fn shutdown(&self) {
        self.performance.destroy();
        tracing::info!("AppState shut down");
    }
}
