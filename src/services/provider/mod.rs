//! 行情数据源模块
//!
//! 定义数据源接口，默认实现对接 Yahoo Finance

pub mod yahoo;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{CompanyInfo, DateRange, PriceSeries, Ticker};

pub use yahoo::YahooProvider;

/// 行情数据源
///
/// 失败直接返回错误，不做重试
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 获取公司基本信息
    async fn fetch_company_info(&self, ticker: &Ticker) -> Result<CompanyInfo>;

    /// 获取日K线历史数据，`range` 为空时返回全部历史
    async fn fetch_price_series(&self, ticker: &Ticker, range: Option<DateRange>) -> Result<PriceSeries>;
}
