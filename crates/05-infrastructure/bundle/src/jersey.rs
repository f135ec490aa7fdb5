//! HTTP 路由注册工具

use crate::servlet::InjectionFilter;
use di_abstractions::{Injector, InjectorExt};
use host_abstractions::{Environment, JerseyEnvironment, RegisteredComponent};
use tracing::{debug, info};

/// 把注入器层级中的 HTTP 资源与提供者注册到路由
///
/// 返回新注册的组件数量。
pub fn register_managed_resources(injector: &dyn Injector, jersey: &JerseyEnvironment) -> usize {
    let mut registered = 0;
    for binding in injector.all_bindings() {
        if !binding.role.is_http_managed() {
            continue;
        }
        debug!("注册托管组件: {} ({:?})", binding.key, binding.role);
        if jersey.register(RegisteredComponent {
            key: binding.key,
            role: binding.role,
        }) {
            registered += 1;
        }
    }
    info!("已注册 {} 个托管组件", registered);
    registered
}

/// 注册把请求交给注入器的过滤器
pub fn register_request_filter(environment: &Environment) -> bool {
    let registration = InjectionFilter::new().registration(environment.context_path());
    debug!("注册请求过滤器: {:?}", registration.url_patterns);
    environment.servlets().add_filter(registration)
}
