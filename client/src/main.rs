use std::path::PathBuf;

use satoyama_dogrun::services::ConfigService;
use satoyama_dogrun::utils::logger;
use satoyama_dogrun::AppState;

const USAGE: &str = "usage: dogrun <events|notices|tags|perf-report|export-logs <dir>>";

/// 命令行子命令
#[derive(Debug, PartialEq)]
enum Command {
    Events,
    Notices,
    Tags,
    PerfReport,
    ExportLogs(PathBuf),
}

impl Command {
    /// 未知或缺失的子命令返回用法说明
    fn parse(args: &[String]) -> Result<Self, &'static str> {
        match args.first().map(String::as_str) {
            Some("events") => Ok(Command::Events),
            Some("notices") => Ok(Command::Notices),
            Some("tags") => Ok(Command::Tags),
            Some("perf-report") => Ok(Command::PerfReport),
            Some("export-logs") => args
                .get(1)
                .map(|dir| Command::ExportLogs(PathBuf::from(dir)))
                .ok_or(USAGE),
            _ => Err(USAGE),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let config = ConfigService::load()?;

    // 诊断日志与应用存储放在同一目录下
    let _guard = logger::init(&config.storage_dir.join("logs"))?;

    let state = AppState::new(config)?;

    let result = run(&state, command).await;
    state.shutdown();
    result
}

async fn run(
    state: &AppState,
    command: Command,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match command {
        Command::Events => {
            for event in state.api.list_events().await? {
                println!("{}  {}", event.date, event.title);
            }
        }
        Command::Notices => {
            for notice in state.api.list_notices().await? {
                let mark = if notice.is_read { " " } else { "*" };
                println!("{} {}", mark, notice.title);
            }
        }
        Command::Tags => {
            let names: Vec<String> = state
                .api
                .list_tags()
                .await?
                .into_iter()
                .map(|t| t.name)
                .collect();
            println!("{}", names.join(", "));
        }
        Command::PerfReport => {
            let report = state.performance.generate_report();
            println!("{}", serde_json::to_string_pretty(&report)?);
            for warning in state.performance.check_performance_warnings() {
                eprintln!("warning: {}", warning);
            }
        }
        Command::ExportLogs(dir) => {
            let path = state.logger.export_logs_to(&dir)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_commands() {
        assert_eq!(Command::parse(&args(&["tags"])), Ok(Command::Tags));
        assert_eq!(
            Command::parse(&args(&["export-logs", "/tmp/out"])),
            Ok(Command::ExportLogs(PathBuf::from("/tmp/out")))
        );
    }

    #[test]
    fn test_bad_invocation_is_an_error() {
        assert_eq!(Command::parse(&args(&[])), Err(USAGE));
        assert_eq!(Command::parse(&args(&["walk"])), Err(USAGE));
        assert_eq!(Command::parse(&args(&["export-logs"])), Err(USAGE));
    }
}
