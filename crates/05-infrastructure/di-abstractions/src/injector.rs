//! 注入器抽象接口
//!
//! 注入器由模块列表构建, 可以派生子注入器。子注入器继承父注入器的全部绑定,
//! 也可以遮蔽父绑定, 但不会修改父注入器。

use crate::binding::{Binding, Instance};
use crate::module::Module;
use infrastructure_common::{BindingKey, DependencyError, Scope, Stage};
use std::sync::Arc;

/// 注入器 trait
pub trait Injector: Send + Sync {
    /// 按绑定键解析实例 (自身找不到时委托给父注入器)
    fn get_instance(&self, key: &BindingKey) -> Result<Instance, DependencyError>;

    /// 自身或祖先是否存在该绑定
    fn has_binding(&self, key: &BindingKey) -> bool;

    /// 自身声明的绑定, 按声明顺序
    fn bindings(&self) -> Vec<Binding>;

    /// 父注入器
    fn parent(&self) -> Option<Arc<dyn Injector>>;

    /// 注入器作用域
    fn scope(&self) -> &Scope;

    /// 构建阶段
    fn stage(&self) -> Stage;

    /// 获取指向自身的共享句柄
    fn handle(&self) -> Result<Arc<dyn Injector>, DependencyError>;

    /// 以给定模块派生子注入器
    fn create_child_injector(
        &self,
        modules: Vec<Arc<dyn Module>>,
    ) -> Result<Arc<dyn Injector>, DependencyError>;
}

/// 注入器便捷方法
pub trait InjectorExt: Injector {
    /// 解析指定类型
    fn get<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.get_keyed(&BindingKey::of::<T>())
    }

    /// 解析带限定名的类型
    fn get_named<T>(&self, name: &str) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.get_keyed(&BindingKey::named::<T>(name))
    }

    /// 按绑定键解析并向下转型
    fn get_keyed<T>(&self, key: &BindingKey) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.get_instance(key)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                type_name: key.to_string(),
            })
    }

    /// 是否可以解析指定类型
    fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.has_binding(&BindingKey::of::<T>())
    }

    /// 整个注入器层级的绑定, 祖先在前
    fn all_bindings(&self) -> Vec<Binding> {
        let mut chain = Vec::new();
        let mut current = self.parent();
        while let Some(injector) = current {
            current = injector.parent();
            chain.push(injector);
        }

        let mut bindings = Vec::new();
        for ancestor in chain.iter().rev() {
            bindings.extend(ancestor.bindings());
        }
        bindings.extend(self.bindings());
        bindings
    }
}

impl<I: Injector + ?Sized> InjectorExt for I {}
