//! 错误类型定义

use crate::lifecycle::BundleState;
use thiserror::Error;

/// 装箱的通用错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed { type_name: String, source: BoxError },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("组件类型不匹配: {type_name}")]
    TypeMismatch { type_name: String },

    #[error("重复绑定: {type_name}, 模块: {module}")]
    DuplicateBinding { type_name: String, module: String },

    #[error("模块配置失败: {module}, 原因: {message}")]
    ModuleConfigurationFailed { module: String, message: String },

    #[error("注入器创建失败, 共 {count} 个错误: {joined}", count = .errors.len(), joined = .errors.join("; "))]
    InjectorCreationFailed { errors: Vec<String> },

    #[error("注入器已被释放")]
    InjectorReleased,
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(type_name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }
}

/// 注入包错误类型
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("注入包至少需要一个模块")]
    NoModules,

    #[error("自动配置已启用")]
    AutoConfigAlreadyEnabled,

    #[error("自动配置至少需要一个基础包")]
    EmptyBasePackages,

    #[error("基础包名称无效: '{package}'")]
    InvalidBasePackage { package: String },

    #[error("注入器仅在 initialize() 调用之后可用")]
    NotInitialized,

    #[error("生命周期状态非法: 期望 {expected}, 实际 {actual}")]
    InvalidState {
        expected: BundleState,
        actual: BundleState,
    },

    #[error("环境数据已设置, 不能重复写入")]
    EnvironmentAlreadySet,

    #[error("环境数据尚未设置, 需要在 run() 之后解析")]
    EnvironmentNotSet,

    #[error("定位器桥接已安装")]
    BridgeAlreadyInstalled,

    #[error("自动配置 {phase} 阶段失败: {source}")]
    AutoConfigFailed {
        phase: &'static str,
        source: BoxError,
    },

    #[error("日志初始化失败: {message}")]
    LoggingInitFailed { message: String },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },

    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type BundleResult<T> = Result<T, BundleError>;

/// 展开错误的完整原因链
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![error.to_string()];
    let mut current = error.source();
    while let Some(cause) = current {
        chain.push(cause.to_string());
        current = cause.source();
    }
    chain
}
