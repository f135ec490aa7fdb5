//! servlet 支持

use di_abstractions::{Binder, BinderExt, Module};
use host_abstractions::{DispatcherType, FilterRegistration};
use infrastructure_common::DependencyError;

/// 请求过滤器的注册名称
pub const INJECTION_FILTER_NAME: &str = "Injection Filter";

/// 当前注入器是否接入了 servlet 请求作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServletIntegration {
    pub enabled: bool,
}

/// 把请求交给注入器处理的过滤器描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionFilter {
    name: String,
}

impl InjectionFilter {
    pub fn new() -> Self {
        Self {
            name: INJECTION_FILTER_NAME.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 覆盖上下文路径下全部 URL 的注册信息
    pub fn registration(&self, context_path: &str) -> FilterRegistration {
        FilterRegistration {
            name: self.name.clone(),
            url_patterns: vec![format!("{}*", context_path)],
            dispatchers: vec![DispatcherType::Request],
            match_after: false,
        }
    }
}

impl Default for InjectionFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// 根注入器上的 servlet 支持模块
#[derive(Debug, Clone, Copy, Default)]
pub struct ServletSupportModule;

impl Module for ServletSupportModule {
    fn name(&self) -> &str {
        "ServletSupportModule"
    }

    fn configure(&self, binder: &mut dyn Binder) -> Result<(), DependencyError> {
        binder.bind_instance(ServletIntegration { enabled: true })?;
        binder.bind_instance(InjectionFilter::new())
    }
}
