//! 生命周期相关类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 注入器构建阶段
///
/// 决定单例绑定是在启动时立即创建 (快速失败) 还是在首次解析时创建。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// 工具模式 - 与开发模式相同, 单例在首次解析时创建
    Tool,
    /// 开发模式 - 单例延迟创建
    Development,
    /// 生产模式 - 单例在注入器创建时立即实例化
    Production,
}

impl Stage {
    /// 是否在注入器创建时立即实例化单例
    pub fn eager_singletons(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tool => "tool",
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Production
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tool" => Ok(Self::Tool),
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("未知的构建阶段: {}", other)),
        }
    }
}

/// 绑定生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// 单例模式 - 拥有该绑定的注入器内只创建一个实例
    Singleton,
    /// 瞬时模式 - 每次解析都创建新实例
    Transient,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::Transient
    }
}

/// 注入包生命周期状态
///
/// 只能按 `Created -> Initialized -> Running` 单向推进。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleState {
    /// 已创建, 尚未初始化
    Created,
    /// 根注入器已创建, 定位器桥接已安装
    Initialized,
    /// 已接入运行中的服务器
    Running,
}

impl Default for BundleState {
    fn default() -> Self {
        Self::Created
    }
}

impl fmt::Display for BundleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "Created",
            Self::Initialized => "Initialized",
            Self::Running => "Running",
        };
        f.write_str(name)
    }
}

/// 注入器作用域
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: uuid::Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Scope {
    /// 创建新作用域
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            created_at: chrono::Utc::now(),
        }
    }

    /// 创建根作用域
    pub fn root() -> Self {
        Self::new("root")
    }

    /// 创建子作用域
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self::new(format!("{}.{}", self.name, name.into()))
    }

    /// 作用域深度, 根作用域为 0
    pub fn depth(&self) -> usize {
        self.name.matches('.').count()
    }
}
