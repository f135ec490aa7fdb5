//! 运行时环境
//!
//! 宿主在 `run` 阶段提供的运行时设施: HTTP 资源注册表与 servlet 过滤器链。

use infrastructure_common::{BindingKey, ComponentRole};
use parking_lot::RwLock;
use tracing::warn;

/// 运行中的服务器环境
#[derive(Debug)]
pub struct Environment {
    name: String,
    context_path: String,
    jersey: JerseyEnvironment,
    servlets: ServletEnvironment,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context_path: "/".to_string(),
            jersey: JerseyEnvironment::default(),
            servlets: ServletEnvironment::default(),
        }
    }

    /// 设置应用上下文路径
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// HTTP 资源注册表
    pub fn jersey(&self) -> &JerseyEnvironment {
        &self.jersey
    }

    /// servlet 过滤器链
    pub fn servlets(&self) -> &ServletEnvironment {
        &self.servlets
    }
}

/// 已注册到路由的组件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredComponent {
    pub key: BindingKey,
    pub role: ComponentRole,
}

/// HTTP 资源注册表
///
/// 只登记组件类型, 实例在请求时通过服务定位器获取。
#[derive(Debug, Default)]
pub struct JerseyEnvironment {
    components: RwLock<Vec<RegisteredComponent>>,
}

impl JerseyEnvironment {
    /// 注册组件, 已注册时返回 false
    pub fn register(&self, component: RegisteredComponent) -> bool {
        let mut components = self.components.write();
        if components.iter().any(|existing| existing.key == component.key) {
            warn!("组件已注册, 忽略: {}", component.key);
            return false;
        }
        components.push(component);
        true
    }

    pub fn is_registered(&self, key: &BindingKey) -> bool {
        self.components.read().iter().any(|c| &c.key == key)
    }

    pub fn registered(&self) -> Vec<RegisteredComponent> {
        self.components.read().clone()
    }
}

/// 过滤器分派类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatcherType {
    Request,
    Forward,
    Include,
    Async,
    Error,
}

/// 过滤器注册信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRegistration {
    pub name: String,
    pub url_patterns: Vec<String>,
    pub dispatchers: Vec<DispatcherType>,
    /// 是否排在已声明过滤器之后
    pub match_after: bool,
}

/// servlet 过滤器链
#[derive(Debug, Default)]
pub struct ServletEnvironment {
    filters: RwLock<Vec<FilterRegistration>>,
}

impl ServletEnvironment {
    /// 添加过滤器, 同名过滤器已存在时返回 false
    pub fn add_filter(&self, registration: FilterRegistration) -> bool {
        let mut filters = self.filters.write();
        if filters.iter().any(|f| f.name == registration.name) {
            warn!("过滤器已存在, 忽略: {}", registration.name);
            return false;
        }
        filters.push(registration);
        true
    }

    pub fn filter(&self, name: &str) -> Option<FilterRegistration> {
        self.filters.read().iter().find(|f| f.name == name).cloned()
    }

    pub fn filters(&self) -> Vec<FilterRegistration> {
        self.filters.read().clone()
    }
}
