//! Stock Dash 后端服务
//!
//! 股票看板：公司信息、历史走势、移动平均指标与价格预测
//! 数据来源：Yahoo Finance

mod config;     // 配置
mod controller; // 页面视图与交互规则
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::controller::{Controller, Router};
use crate::handlers::assets::AssetsDir;
use crate::services::forecast::{Forecaster, LinearForecaster};
use crate::services::provider::{MarketDataProvider, YahooProvider};

/// 应用程序入口
///
/// 启动 HTTP 服务器，默认监听 0.0.0.0:5000
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    let provider: Arc<dyn MarketDataProvider> = match YahooProvider::new(config.provider.clone()) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            log::error!("初始化行情数据源失败: {:#}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };
    let forecaster: Arc<dyn Forecaster> =
        Arc::new(LinearForecaster::new(provider.clone(), config.forecast.clone()));

    let controller = web::Data::new(Controller::new(provider, forecaster, config.assets.logo_src()));
    let router = web::Data::new(Router::new());
    let assets = web::Data::new(AssetsDir(PathBuf::from(&config.assets.dir)));

    let bind_addr = config.bind_addr();
    log::info!("启动 Stock Dash 服务，监听 {}", bind_addr);
    log::info!("已登记事件: {}", router.events().collect::<Vec<_>>().join(", "));

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(controller.clone())
            .app_data(router.clone())
            .app_data(assets.clone())
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
