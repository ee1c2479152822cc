//! 价格预测模块
//!
//! 预测模型通过 `Forecaster` 接口接入，可替换

pub mod linear;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Chart, Ticker};

pub use linear::LinearForecaster;

/// 预测策略
#[async_trait]
pub trait Forecaster: Send + Sync {
    /// 预测未来 `horizon_days` 个交易日，返回实际值与预测值的对比图
    async fn forecast(&self, ticker: &Ticker, horizon_days: usize) -> Result<Chart>;
}
