use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化诊断日志
///
/// - JSON格式文件: 按天轮转,文件名 `dogrun.YYYY-MM-DD.log`
/// - 控制台: 人类可读格式
/// - 环境变量控制: RUST_LOG=debug 可调整级别,默认 info
///
/// 返回的guard必须由调用者保存到进程退出,否则文件写入器会被关闭。
/// 这里的诊断日志与 `AppLogger` 的持久化应用日志相互独立。
pub fn init(log_dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("dogrun")
        .filename_suffix("log")
        .build(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 文件层: JSON格式,便于日志分析工具解析
    let file_layer = fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false);

    // 控制台层: 输出到stderr,不干扰命令行的标准输出
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let result = init(dir.path());
        assert!(result.is_ok());
        let _guard = result.unwrap();

        tracing::info!(request_id = "req_1_test", "structured log smoke test");

        // 全局subscriber只能安装一次
        assert!(init(dir.path()).is_err());
    }
}
