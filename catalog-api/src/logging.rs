use crate::config::LoggingConfig;
use crate::error::StartupError;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer, Registry};

/// 输出格式, 未知取值按 pretty 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }

    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        match self {
            LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
            LogFormat::Compact => fmt::layer().compact().boxed(),
            LogFormat::Pretty => fmt::layer().pretty().boxed(),
        }
    }
}

/// `RUST_LOG` 优先; 否则使用配置级别, 并附带请求追踪日志
pub fn build_filter(level: &str, rust_log: Option<&str>) -> Result<EnvFilter, StartupError> {
    let directives = match rust_log.filter(|v| !v.trim().is_empty()) {
        Some(directives) => directives.to_string(),
        None => format!("{level},tower_http=debug"),
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| StartupError::Logging(format!("Invalid log filter `{}`: {}", directives, e)))
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), StartupError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(&config.level, rust_log.as_deref())?;

    registry()
        .with(LogFormat::parse(&config.format).layer())
        .with(filter)
        .try_init()
        .map_err(|e| StartupError::Logging(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("COMPACT"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("whatever"), LogFormat::Pretty);
    }

    #[test]
    fn test_filter_from_config_level() {
        let filter = build_filter("warn", None).unwrap();
        assert!(filter.to_string().contains("warn"));
        assert!(filter.to_string().contains("tower_http=debug"));
    }

    #[test]
    fn test_rust_log_wins() {
        let filter = build_filter("warn", Some("catalog_api=trace")).unwrap();
        assert_eq!(filter.to_string(), "catalog_api=trace");
    }

    #[test]
    fn test_invalid_filter() {
        let result = build_filter("info", Some("catalog_api=loud"));
        assert!(matches!(result, Err(StartupError::Logging(_))));
    }
}
