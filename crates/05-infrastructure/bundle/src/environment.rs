//! 宿主环境绑定
//!
//! 宿主的配置对象与运行时环境在 `run` 阶段才出现, 而根注入器在 `initialize`
//! 阶段就已创建。[`EnvironmentHandle`] 作为一次性写入的单元格把两者连接起来:
//! 模块在创建注入器时绑定读取句柄的提供者, `run` 写入句柄之后这些绑定才可解析。

use di_abstractions::{Binder, BinderExt, Module};
use host_abstractions::{Configuration, Environment};
use infrastructure_common::{BundleError, DependencyError, Lifetime, TypeInfo};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 一次性写入的环境数据
pub struct EnvironmentHandle<C> {
    cell: OnceCell<EnvironmentData<C>>,
}

struct EnvironmentData<C> {
    configuration: Arc<C>,
    environment: Arc<Environment>,
}

impl<C: Configuration> EnvironmentHandle<C> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// 写入环境数据, 只能写入一次
    pub fn set(&self, configuration: Arc<C>, environment: Arc<Environment>) -> Result<(), BundleError> {
        self.cell
            .set(EnvironmentData {
                configuration,
                environment,
            })
            .map_err(|_| BundleError::EnvironmentAlreadySet)?;
        info!("环境数据已写入");
        Ok(())
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }

    /// 宿主配置对象
    pub fn configuration(&self) -> Result<Arc<C>, BundleError> {
        self.cell
            .get()
            .map(|data| Arc::clone(&data.configuration))
            .ok_or(BundleError::EnvironmentNotSet)
    }

    /// 宿主运行时环境
    pub fn environment(&self) -> Result<Arc<Environment>, BundleError> {
        self.cell
            .get()
            .map(|data| Arc::clone(&data.environment))
            .ok_or(BundleError::EnvironmentNotSet)
    }
}

impl<C: Configuration> Default for EnvironmentHandle<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Configuration> fmt::Debug for EnvironmentHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentHandle")
            .field("configuration", &self.cell.get().map(|data| &data.configuration))
            .field("is_set", &self.is_set())
            .finish()
    }
}

/// 把宿主配置与环境暴露为可注入值的模块
///
/// 总是绑定 `Arc<dyn Configuration>` 与 [`Environment`]; 配置类型令牌指向 `C`
/// 时另外绑定具体的 `C`。
pub struct EnvironmentModule<C> {
    handle: Arc<EnvironmentHandle<C>>,
    config_class: Option<TypeInfo>,
}

impl<C: Configuration> EnvironmentModule<C> {
    pub fn new(handle: Arc<EnvironmentHandle<C>>, config_class: Option<TypeInfo>) -> Self {
        Self {
            handle,
            config_class,
        }
    }

    pub fn handle(&self) -> Arc<EnvironmentHandle<C>> {
        Arc::clone(&self.handle)
    }

    /// 是否绑定具体配置类型
    pub fn binds_concrete_configuration(&self) -> bool {
        self.config_class
            .as_ref()
            .is_some_and(|token| token.id == TypeInfo::of::<C>().id)
    }
}

fn unavailable<T: ?Sized + 'static>(error: BundleError) -> DependencyError {
    DependencyError::creation_failed(std::any::type_name::<T>(), error)
}

impl<C: Configuration> Module for EnvironmentModule<C> {
    fn name(&self) -> &str {
        "EnvironmentModule"
    }

    fn configure(&self, binder: &mut dyn Binder) -> Result<(), DependencyError> {
        let handle = Arc::clone(&self.handle);
        binder.bind_shared::<EnvironmentHandle<C>, _>(Lifetime::Singleton, move |_| {
            Ok(Arc::clone(&handle))
        })?;

        let handle = Arc::clone(&self.handle);
        binder.bind_factory::<Arc<dyn Configuration>, _>(Lifetime::Transient, move |_| {
            let configuration: Arc<dyn Configuration> = handle
                .configuration()
                .map_err(unavailable::<dyn Configuration>)?;
            Ok(configuration)
        })?;

        if self.binds_concrete_configuration() {
            debug!("绑定具体配置类型: {}", std::any::type_name::<C>());
            let handle = Arc::clone(&self.handle);
            binder.bind_shared::<C, _>(Lifetime::Transient, move |_| {
                handle.configuration().map_err(unavailable::<C>)
            })?;
        }

        let handle = Arc::clone(&self.handle);
        binder.bind_shared::<Environment, _>(Lifetime::Transient, move |_| {
            handle.environment().map_err(unavailable::<Environment>)
        })
    }
}
