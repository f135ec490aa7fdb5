//! 注入器工厂抽象接口
//!
//! 把 `(阶段, 模块列表)` 转换为根注入器的可替换策略

use crate::injector::Injector;
use crate::module::Module;
use infrastructure_common::{DependencyError, Stage};
use std::sync::Arc;

/// 注入器工厂 trait
///
/// 宿主可以替换默认实现, 例如加入自定义的错误处理策略。
pub trait InjectorFactory: Send + Sync {
    /// 创建根注入器, 绑定无效或冲突时返回错误
    fn create(
        &self,
        stage: Stage,
        modules: Vec<Arc<dyn Module>>,
    ) -> Result<Arc<dyn Injector>, DependencyError>;
}

impl<F> InjectorFactory for F
where
    F: Fn(Stage, Vec<Arc<dyn Module>>) -> Result<Arc<dyn Injector>, DependencyError> + Send + Sync,
{
    fn create(
        &self,
        stage: Stage,
        modules: Vec<Arc<dyn Module>>,
    ) -> Result<Arc<dyn Injector>, DependencyError> {
        self(stage, modules)
    }
}
