//! 注入包设置
//!
//! 设置从可选的配置文件 (toml / json / yaml) 加载, 再由带前缀的环境变量覆盖。

use infrastructure_common::{ConfigError, Stage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// 默认配置文件位置 (不含扩展名)
pub const DEFAULT_SETTINGS_PATH: &str = "config/bundle";

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "BUNDLE";

/// 注入包设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleSettings {
    /// 注入器构建阶段
    pub stage: Stage,
    /// 是否启用 servlet 支持
    pub use_servlet_support: bool,
    /// 自动配置的基础包, 为空时不启用
    pub auto_config_packages: Vec<String>,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            stage: Stage::Production,
            use_servlet_support: true,
            auto_config_packages: Vec::new(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl BundleSettings {
    /// 从默认位置加载
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_SETTINGS_PATH, DEFAULT_ENV_PREFIX)
    }

    /// 从指定文件 (可以不存在) 与环境变量加载
    ///
    /// 环境变量形如 `{PREFIX}_STAGE`、`{PREFIX}_USE_SERVLET_SUPPORT`。
    pub fn load_from<P: AsRef<Path>>(path: P, env_prefix: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("加载注入包设置: {}, 环境变量前缀: {}", path.display(), env_prefix);

        let builder = config::Config::builder()
            .add_source(config::File::with_name(&path.to_string_lossy()).required(false));
        Self::finish(builder, env_prefix)
    }

    /// 从必须存在的文件与环境变量加载
    pub fn from_file<P: AsRef<Path>>(path: P, env_prefix: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        info!("加载注入包设置文件: {}", path.display());
        let builder = config::Config::builder().add_source(config::File::from(path).required(true));
        Self::finish(builder, env_prefix)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        env_prefix: &str,
    ) -> Result<Self, ConfigError> {
        let settings: Self = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auto_config_packages"),
            )
            .build()
            .and_then(|built| built.try_deserialize::<Self>())
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// 校验设置
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level()?;
        if let Some(blank) = self
            .auto_config_packages
            .iter()
            .find(|package| package.trim().is_empty())
        {
            return Err(ConfigError::ValidationError {
                message: format!("自动配置基础包不能为空: '{}'", blank),
            });
        }
        Ok(())
    }

    /// 解析日志级别
    pub fn level(&self) -> Result<tracing::Level, ConfigError> {
        tracing::Level::from_str(self.log_level.trim()).map_err(|_| ConfigError::ValidationError {
            message: format!("未知的日志级别: {}", self.log_level),
        })
    }

    /// 是否配置了自动配置
    pub fn auto_config_enabled(&self) -> bool {
        !self.auto_config_packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::fs;
    use tempfile::TempDir;

    /// 读取或修改进程环境变量的测试必须串行执行
    static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

    /// 测试期间设置的环境变量, 析构时移除
    struct ScopedEnv(Vec<&'static str>);

    impl ScopedEnv {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
            Self(vars.iter().map(|(key, _)| *key).collect())
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            for key in &self.0 {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let _env = ENV_LOCK.lock();
        let dir = TempDir::new().unwrap();
        let settings =
            BundleSettings::load_from(dir.path().join("absent"), "BUNDLE_TEST_DEFAULTS").unwrap();
        assert_eq!(settings, BundleSettings::default());
        assert!(!settings.auto_config_enabled());
    }

    #[test]
    fn test_toml_file_is_loaded() {
        let _env = ENV_LOCK.lock();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.toml");
        fs::write(
            &path,
            r#"
stage = "development"
use_servlet_support = false
auto_config_packages = ["my_app.resources"]
log_level = "debug"
"#,
        )
        .unwrap();

        let settings = BundleSettings::from_file(&path, "BUNDLE_TEST_TOML").unwrap();
        assert_eq!(settings.stage, Stage::Development);
        assert!(!settings.use_servlet_support);
        assert_eq!(settings.auto_config_packages, vec!["my_app.resources"]);
        assert_eq!(settings.level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_environment_overrides_file() {
        let _env = ENV_LOCK.lock();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.json");
        fs::write(&path, r#"{ "stage": "production", "log_json": false }"#).unwrap();

        let settings = {
            let _vars = ScopedEnv::set(&[
                ("BUNDLE_TEST_ENV_STAGE", "tool"),
                ("BUNDLE_TEST_ENV_LOG_JSON", "true"),
            ]);
            BundleSettings::from_file(&path, "BUNDLE_TEST_ENV").unwrap()
        };
        assert!(std::env::var("BUNDLE_TEST_ENV_STAGE").is_err());

        assert_eq!(settings.stage, Stage::Tool);
        assert!(settings.log_json);
    }

    #[test]
    fn test_required_file_must_exist() {
        let _env = ENV_LOCK.lock();
        let dir = TempDir::new().unwrap();
        let result = BundleSettings::from_file(dir.path().join("missing.toml"), "BUNDLE_TEST_MISSING");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let settings = BundleSettings {
            log_level: "loud".to_string(),
            ..BundleSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
