//! 模块与绑定器抽象接口
//!
//! 模块是应用提供的绑定配置单元, 在注入器创建时通过 [`Binder`] 贡献绑定。

use crate::binding::{Binding, Instance, ProviderFn};
use crate::injector::Injector;
use infrastructure_common::{BindingKey, ComponentRole, DependencyError, Lifetime, Stage};
use std::sync::Arc;

/// 模块 trait
pub trait Module: Send + Sync {
    /// 模块名称, 用于错误信息与日志
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// 向绑定器贡献绑定
    fn configure(&self, binder: &mut dyn Binder) -> Result<(), DependencyError>;
}

/// 绑定器 trait
pub trait Binder {
    /// 添加绑定
    fn bind(&mut self, binding: Binding) -> Result<(), DependencyError>;

    /// 安装子模块
    fn install(&mut self, module: &dyn Module) -> Result<(), DependencyError>;

    /// 当前构建阶段
    fn stage(&self) -> Stage;
}

/// 绑定器便捷方法
pub trait BinderExt: Binder {
    /// 绑定一个现成的单例实例
    fn bind_instance<T>(&mut self, instance: T) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let instance: Instance = Arc::new(instance);
        self.bind(Binding::new(
            BindingKey::of::<T>(),
            constant(instance),
            Lifetime::Singleton,
        ))
    }

    /// 绑定一个带限定名的单例实例
    fn bind_named_instance<T>(&mut self, name: &str, instance: T) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let instance: Instance = Arc::new(instance);
        self.bind(Binding::new(
            BindingKey::named::<T>(name),
            constant(instance),
            Lifetime::Singleton,
        ))
    }

    /// 绑定返回共享指针的提供者, 实例身份由提供者决定
    fn bind_shared<T, F>(&mut self, lifetime: Lifetime, provider: F) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Injector) -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        self.bind(Binding::new(BindingKey::of::<T>(), erase(provider), lifetime))
    }

    /// 绑定工厂函数
    fn bind_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Injector) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        self.bind_shared::<T, _>(lifetime, move |injector| factory(injector).map(Arc::new))
    }

    /// 绑定 HTTP 资源 (单例)
    fn bind_resource<T, F>(&mut self, factory: F) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Injector) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        let provider = erase(move |injector: &dyn Injector| factory(injector).map(Arc::new));
        self.bind(
            Binding::new(BindingKey::of::<T>(), provider, Lifetime::Singleton)
                .with_role(ComponentRole::Resource),
        )
    }

    /// 绑定请求管道提供者 (单例)
    fn bind_provider<T, F>(&mut self, factory: F) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Injector) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        let provider = erase(move |injector: &dyn Injector| factory(injector).map(Arc::new));
        self.bind(
            Binding::new(BindingKey::of::<T>(), provider, Lifetime::Singleton)
                .with_role(ComponentRole::Provider),
        )
    }
}

impl<B: Binder + ?Sized> BinderExt for B {}

fn constant(instance: Instance) -> ProviderFn {
    Arc::new(move |_: &dyn Injector| -> Result<Instance, DependencyError> {
        Ok(Arc::clone(&instance))
    })
}

fn erase<T, F>(provider: F) -> ProviderFn
where
    T: Send + Sync + 'static,
    F: Fn(&dyn Injector) -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
{
    Arc::new(move |injector: &dyn Injector| -> Result<Instance, DependencyError> {
        let instance: Instance = provider(injector)?;
        Ok(instance)
    })
}

/// 由闭包构成的模块
pub struct FnModule<F> {
    name: String,
    configure: F,
}

impl<F> FnModule<F>
where
    F: Fn(&mut dyn Binder) -> Result<(), DependencyError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, configure: F) -> Self {
        Self {
            name: name.into(),
            configure,
        }
    }
}

impl<F> Module for FnModule<F>
where
    F: Fn(&mut dyn Binder) -> Result<(), DependencyError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&self, binder: &mut dyn Binder) -> Result<(), DependencyError> {
        (self.configure)(binder)
    }
}
