//! 宿主配置对象

use std::any::Any;
use std::fmt::Debug;

/// 宿主应用配置 trait
///
/// 宿主在 `run` 阶段把具体的配置对象交给注入包。
pub trait Configuration: Any + Send + Sync + Debug {}

/// 未指定配置类型时使用的默认配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultConfiguration;

impl Configuration for DefaultConfiguration {}
