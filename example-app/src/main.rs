//! # 示例应用程序
//!
//! 演示如何把注入包接入宿主: 构建注入包, 依次执行 `initialize` 与 `run`,
//! 然后像宿主请求管道一样通过定位器子系统获取 HTTP 资源。

use anyhow::{Context, Result};
use clap::Parser;
use di_abstractions::{Binder, BinderExt, FnModule, InjectorExt};
use host_abstractions::{
    generated_locator_name, global_locator_subsystem, Bootstrap, Configuration, ConfiguredBundle,
    Environment, ServiceLocatorExt,
};
use infrastructure_common::{Lifetime, Stage};
use injection_bundle::{init_logging, BundleSettings, InjectionBundle, LoggingConfig};
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "注入包示例应用")]
struct Args {
    /// 设置文件路径 (可以不存在)
    #[arg(short, long, default_value = "config/bundle")]
    settings: String,

    /// 环境变量前缀
    #[arg(long, default_value = "BUNDLE")]
    env_prefix: String,

    /// 覆盖设置中的构建阶段
    #[arg(long)]
    stage: Option<Stage>,

    /// 模拟请求的商品名称
    #[arg(long, default_value = "notebook")]
    item: String,
}

/// 应用配置
#[derive(Debug)]
struct ShopConfig {
    currency: String,
}

impl Configuration for ShopConfig {}

/// 价格服务
#[derive(Debug)]
struct PriceTable {
    unit_price: u32,
}

/// HTTP 资源
#[derive(Debug)]
struct QuoteResource {
    table: Arc<PriceTable>,
    config: Arc<ShopConfig>,
}

impl QuoteResource {
    fn quote(&self, item: &str) -> String {
        let total = self.table.unit_price * item.len() as u32;
        format!("{}: {} {}", item, total, self.config.currency)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = BundleSettings::load_from(&args.settings, &args.env_prefix)
        .with_context(|| format!("加载设置失败: {}", args.settings))?;
    init_logging(&LoggingConfig::from_settings(&settings)?)?;
    let stage = args.stage.unwrap_or(settings.stage);
    info!("启动注入包示例应用, stage={}", stage);

    let mut bundle = InjectionBundle::<ShopConfig>::builder()
        .add_module(FnModule::new("shop", |binder: &mut dyn Binder| {
            binder.bind_instance(PriceTable { unit_price: 120 })?;
            binder.bind_factory(Lifetime::Transient, |injector| {
                Ok(QuoteResource {
                    table: injector.get::<PriceTable>()?,
                    config: injector.get::<ShopConfig>()?,
                })
            })
        }))
        .set_config_class()
        .apply_settings(&settings)?
        .build_with_stage(stage)?;

    // 宿主启动阶段
    bundle.initialize(&Bootstrap::new("example-app"))?;

    // 宿主运行阶段
    let environment = Arc::new(Environment::new("example-app").with_context_path("/shop/"));
    bundle.run(
        Arc::new(ShopConfig {
            currency: "CNY".to_string(),
        }),
        Arc::clone(&environment),
    )?;

    for filter in environment.servlets().filters() {
        info!("已注册过滤器: {} -> {:?}", filter.name, filter.url_patterns);
    }

    // 模拟宿主请求管道: 子系统为请求生成定位器, 再由定位器获取资源
    let locator = global_locator_subsystem().create(&generated_locator_name(), None)?;
    let resource = locator
        .service::<QuoteResource>()?
        .context("资源未绑定到注入器")?;
    info!("定位器 {} 处理请求", locator.name());
    println!("{}", resource.quote(&args.item));

    Ok(())
}
