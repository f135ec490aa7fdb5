//! 绑定定义
//!
//! 一个绑定把 [`BindingKey`] 映射到一个提供者函数

use crate::injector::Injector;
use infrastructure_common::{BindingKey, ComponentRole, DependencyError, Lifetime};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 提供者函数
///
/// 以拥有该绑定的注入器作为参数, 因此只能看到该注入器及其祖先的绑定。
pub type ProviderFn = Arc<dyn Fn(&dyn Injector) -> Result<Instance, DependencyError> + Send + Sync>;

/// 单个绑定
#[derive(Clone)]
pub struct Binding {
    pub key: BindingKey,
    pub provider: ProviderFn,
    pub lifetime: Lifetime,
    pub role: ComponentRole,
    /// 声明该绑定的模块名称
    pub source: String,
}

impl Binding {
    /// 创建新的绑定
    pub fn new(key: BindingKey, provider: ProviderFn, lifetime: Lifetime) -> Self {
        Self {
            key,
            provider,
            lifetime,
            role: ComponentRole::default(),
            source: String::new(),
        }
    }

    /// 设置组件角色
    pub fn with_role(mut self, role: ComponentRole) -> Self {
        self.role = role;
        self
    }

    /// 设置来源模块
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("lifetime", &self.lifetime)
            .field("role", &self.role)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
