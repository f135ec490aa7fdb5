//! 注入包端到端测试
//!
//! 模拟宿主: 依次调用 `initialize` 与 `run`, 再通过定位器子系统为请求获取组件。

use anyhow::Result;
use di_abstractions::{Binder, BinderExt, FnModule, Injector, InjectorExt, Module};
use di_impl::Modules;
use host_abstractions::{
    generated_locator_name, global_locator_subsystem, Bootstrap, Configuration, ConfiguredBundle,
    Environment, ServiceLocatorExt,
};
use infrastructure_common::{BindingKey, BoxError, BundleState, Lifetime, Stage};
use injection_bundle::{
    AutoConfigDelegate, BundleSettings, ExitHandler, InjectionBundle, LocatorBridgeRegistry,
    INJECTION_FILTER_NAME,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::task::JoinSet;

#[derive(Debug)]
struct ShopConfig {
    currency: String,
}

impl Configuration for ShopConfig {}

trait PriceService: Send + Sync {
    fn price(&self, item: &str) -> u32;
}

struct FixedPrices;

impl PriceService for FixedPrices {
    fn price(&self, item: &str) -> u32 {
        item.len() as u32 * 100
    }
}

struct DiscountPrices;

impl PriceService for DiscountPrices {
    fn price(&self, item: &str) -> u32 {
        item.len() as u32 * 50
    }
}

/// HTTP 资源: 读取注入的配置与价格服务
struct PriceResource {
    config: Arc<ShopConfig>,
    prices: Arc<Arc<dyn PriceService>>,
}

impl PriceResource {
    fn quote(&self, item: &str) -> String {
        format!("{} {}", self.prices.price(item), self.config.currency)
    }
}

#[derive(Default)]
struct CountingDelegate {
    calls: Mutex<Vec<&'static str>>,
}

impl AutoConfigDelegate for CountingDelegate {
    fn initialize(&self, _bootstrap: &Bootstrap, injector: Arc<dyn Injector>) -> Result<(), BoxError> {
        assert!(injector.parent().is_some());
        self.calls.lock().push("initialize");
        Ok(())
    }

    fn run(&self, _environment: &Environment, injector: Arc<dyn Injector>) -> Result<(), BoxError> {
        assert!(injector.parent().is_none());
        self.calls.lock().push("run");
        Ok(())
    }
}

#[derive(Default)]
struct PanicOnExit;

impl ExitHandler for PanicOnExit {
    fn exit(&self, code: i32) {
        panic!("意外的退出: {}", code);
    }
}

fn pricing_module() -> Arc<dyn Module> {
    Arc::new(FnModule::new("pricing", |binder: &mut dyn Binder| {
        let prices: Arc<dyn PriceService> = Arc::new(FixedPrices);
        binder.bind_instance(prices)
    }))
}

fn resource_module() -> Arc<dyn Module> {
    Arc::new(FnModule::new("resources", |binder: &mut dyn Binder| {
        // 配置在 run 之后才可用, 资源按请求创建
        binder.bind_factory(Lifetime::Transient, |injector| {
            Ok(PriceResource {
                config: injector.get::<ShopConfig>()?,
                prices: injector.get::<Arc<dyn PriceService>>()?,
            })
        })
    }))
}

fn isolated_registry() -> Arc<LocatorBridgeRegistry> {
    Arc::new(LocatorBridgeRegistry::new(Arc::new(
        host_abstractions::DefaultLocatorSubsystem::new(),
    )))
}

#[test]
fn test_end_to_end_with_auto_config() -> Result<()> {
    let delegate = Arc::new(CountingDelegate::default());
    let shared: Arc<dyn AutoConfigDelegate> = delegate.clone();
    let mut bundle = InjectionBundle::<ShopConfig>::builder()
        .add_shared_module(pricing_module())
        .add_shared_module(resource_module())
        .set_config_class()
        .enable_auto_config_with(shared, ["end_to_end_test"])?
        .with_exit_handler(Arc::new(PanicOnExit))
        .with_locator_registry(isolated_registry())
        .build_with_stage(Stage::Production)?;

    bundle.initialize(&Bootstrap::new("shop"))?;
    let configuration = Arc::new(ShopConfig {
        currency: "EUR".to_string(),
    });
    let environment = Arc::new(Environment::new("shop").with_context_path("/shop/"));
    bundle.run(Arc::clone(&configuration), Arc::clone(&environment))?;

    assert_eq!(bundle.state(), BundleState::Running);
    assert_eq!(*delegate.calls.lock(), vec!["initialize", "run"]);

    let root = bundle.root_injector()?;
    assert!(Arc::ptr_eq(&root.get::<Environment>()?, &environment));
    assert!(Arc::ptr_eq(&root.get::<ShopConfig>()?, &configuration));

    let request = bundle.get_injector()?;
    assert_eq!(request.get::<PriceResource>()?.quote("book"), "400 EUR");

    let filter = environment
        .servlets()
        .filter(INJECTION_FILTER_NAME)
        .expect("过滤器应已注册");
    assert_eq!(filter.url_patterns, vec!["/shop/*"]);
    Ok(())
}

#[test]
fn test_override_modules_in_bundle() -> Result<()> {
    let discount = Arc::new(FnModule::new("discount", |binder: &mut dyn Binder| {
        let prices: Arc<dyn PriceService> = Arc::new(DiscountPrices);
        binder.bind_instance(prices)
    }));
    let mut bundle = InjectionBundle::<ShopConfig>::builder()
        .add_shared_module(Modules::override_with(vec![pricing_module()], vec![discount]))
        .add_shared_module(resource_module())
        .set_config_class()
        .with_exit_handler(Arc::new(PanicOnExit))
        .with_locator_registry(isolated_registry())
        .build_with_stage(Stage::Development)?;

    bundle.initialize(&Bootstrap::new("shop"))?;
    bundle.run(
        Arc::new(ShopConfig {
            currency: "USD".to_string(),
        }),
        Arc::new(Environment::new("shop")),
    )?;

    let request = bundle.get_injector()?;
    assert_eq!(request.get::<PriceResource>()?.quote("pen"), "150 USD");
    Ok(())
}

#[test]
fn test_settings_file_drives_bundle() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bundle.toml");
    fs::write(
        &path,
        "stage = \"development\"\nuse_servlet_support = false\nauto_config_packages = [\"end_to_end_test\"]\n",
    )?;
    let settings = BundleSettings::from_file(&path, "SHOP_BUNDLE_E2E")?;

    let mut bundle = InjectionBundle::<ShopConfig>::builder()
        .add_shared_module(pricing_module())
        .apply_settings(&settings)?
        .with_exit_handler(Arc::new(PanicOnExit))
        .with_locator_registry(isolated_registry())
        .build_with_stage(settings.stage)?;

    assert_eq!(bundle.stage(), Stage::Development);
    bundle.initialize(&Bootstrap::new("shop"))?;
    let root = bundle.root_injector()?;
    assert!(!root.has_binding(&BindingKey::of::<injection_bundle::InjectionFilter>()));
    Ok(())
}

/// 进程级注册表只能安装一次, 因此只有这一个测试使用它
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_global_subsystem_serves_concurrent_requests() -> Result<()> {
    let mut bundle = InjectionBundle::<ShopConfig>::builder()
        .add_shared_module(pricing_module())
        .with_exit_handler(Arc::new(PanicOnExit))
        .build_with_stage(Stage::Development)?;
    bundle.initialize(&Bootstrap::new("shop"))?;
    assert!(LocatorBridgeRegistry::global().is_installed());

    let mut requests = JoinSet::new();
    for _ in 0..16 {
        requests.spawn(async {
            let name = generated_locator_name();
            let locator = global_locator_subsystem().create(&name, None)?;
            let prices = locator
                .service::<Arc<dyn PriceService>>()?
                .expect("价格服务应可解析");
            Ok::<_, anyhow::Error>((name, prices.price("cup")))
        });
    }

    let mut names = HashSet::new();
    while let Some(joined) = requests.join_next().await {
        let (name, price) = joined??;
        assert_eq!(price, 300);
        names.insert(name);
    }
    assert_eq!(names.len(), 16);

    let foreign = global_locator_subsystem().create("host-internal", None)?;
    assert!(foreign.service::<Arc<dyn PriceService>>()?.is_none());
    Ok(())
}
