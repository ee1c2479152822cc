//! 页面控制器
//!
//! 页面视图、交互规则和事件路由

pub mod router;
pub mod rules;
pub mod view;

use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::services::forecast::Forecaster;
use crate::services::provider::MarketDataProvider;

pub use router::Router;

/// 交互规则的执行环境
///
/// 只持有不可变的外部依赖，可在多个请求间共享
pub struct Controller {
    provider: Arc<dyn MarketDataProvider>,
    forecaster: Arc<dyn Forecaster>,
    /// 占位图访问路径
    logo_src: String,
}

impl Controller {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        forecaster: Arc<dyn Forecaster>,
        logo_src: String,
    ) -> Self {
        Self { provider, forecaster, logo_src }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
