//! 元数据定义
//!
//! 提供类型信息与绑定键

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完整类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 模块路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        let base = full.split('<').next().unwrap_or(full);
        let module_path = base
            .trim_start_matches("dyn ")
            .rsplit_once("::")
            .map(|(path, _)| path.to_string())
            .unwrap_or_default();

        Self {
            name: full.to_string(),
            id: TypeId::of::<T>(),
            module_path,
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        let base = self.name.split('<').next().unwrap_or(&self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// 类型是否位于指定包内
    ///
    /// 包名可以使用 `.` 或 `::` 分隔, 例如 `my_app.resources`。
    pub fn is_within(&self, package: &str) -> bool {
        let package = package.trim().replace('.', "::");
        if package.is_empty() {
            return false;
        }
        self.module_path == package || self.module_path.starts_with(&format!("{}::", package))
    }
}

/// 组件角色
///
/// 用于区分需要接入 HTTP 路由的绑定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentRole {
    /// 普通服务
    Service,
    /// HTTP 资源
    Resource,
    /// 请求管道提供者 (过滤器、转换器等)
    Provider,
}

impl ComponentRole {
    /// 是否需要注册到 HTTP 路由
    pub fn is_http_managed(&self) -> bool {
        matches!(self, Self::Resource | Self::Provider)
    }
}

impl Default for ComponentRole {
    fn default() -> Self {
        Self::Service
    }
}

/// 绑定键
///
/// 由类型与可选限定名组成, 相等性只比较类型ID与限定名。
#[derive(Debug, Clone)]
pub struct BindingKey {
    pub type_info: TypeInfo,
    pub qualifier: Option<String>,
}

impl BindingKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            qualifier: None,
        }
    }

    /// 创建带限定名的绑定键
    pub fn named<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            qualifier: Some(name.into()),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_info.id
    }
}

impl PartialEq for BindingKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_info.id == other.type_info.id && self.qualifier == other.qualifier
    }
}

impl Eq for BindingKey {}

impl Hash for BindingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_info.id.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}@{}", self.type_info.name, qualifier),
            None => f.write_str(&self.type_info.name),
        }
    }
}
