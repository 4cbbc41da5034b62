use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

use crate::capture::default_capture_dir;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 运行配置
///
/// 不读取配置文件，全部来自命令行参数和默认值
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// 未指定目录时的保存位置
    pub default_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "default_dir={}, log_level={}",
            self.storage.default_dir.display(),
            self.logging.level
        )
    }
}

impl Config {
    /// 用命令行参数覆盖默认配置
    pub fn from_args(log_level: Option<String>, default_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(level) = log_level {
            config.logging.level = level.trim().to_lowercase();
        }
        if let Some(dir) = default_dir {
            config.storage.default_dir = dir;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "日志等级 {} 无效，可选: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.storage.default_dir.as_os_str().is_empty() {
            anyhow::bail!("默认保存目录不能为空");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                default_dir: default_capture_dir(),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::DEFAULT_DIR_NAME;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "warn");
        assert!(config.storage.default_dir.ends_with(DEFAULT_DIR_NAME));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_args_overrides() {
        let config = Config::from_args(
            Some(" DEBUG ".to_string()),
            Some(PathBuf::from("/tmp/caps")),
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.default_dir, PathBuf::from("/tmp/caps"));
    }

    #[test]
    fn test_validate_invalid_level() {
        assert!(Config::from_args(Some("verbose".to_string()), None).is_err());
    }

    #[test]
    fn test_validate_empty_dir() {
        let mut config = Config::default();
        config.storage.default_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display() {
        let config = Config::from_args(None, Some(PathBuf::from("/tmp/caps"))).unwrap();
        assert_eq!(config.to_string(), "default_dir=/tmp/caps, log_level=warn");
    }
}
