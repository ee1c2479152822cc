//! 线性回归预测
//!
//! 对最近一段收盘价按序号做最小二乘直线拟合，并外推未来交易日

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use plotly::common::Mode;
use plotly::{Plot, Scatter};
use std::sync::Arc;

use super::Forecaster;
use crate::config::ForecastConfig;
use crate::models::{Chart, DateRange, Ticker};
use crate::services::charts::titled_layout;
use crate::services::provider::MarketDataProvider;

/// 基于最小二乘直线的预测器
pub struct LinearForecaster {
    provider: Arc<dyn MarketDataProvider>,
    config: ForecastConfig,
}

impl LinearForecaster {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: ForecastConfig) -> Self {
        Self { provider, config }
    }
}

#[async_trait]
impl Forecaster for LinearForecaster {
    async fn forecast(&self, ticker: &Ticker, horizon_days: usize) -> Result<Chart> {
        if horizon_days == 0 || horizon_days > self.config.max_horizon {
            return Err(anyhow!(
                "预测天数 {} 超出范围 (1..={})",
                horizon_days,
                self.config.max_horizon
            ));
        }

        let today = Utc::now().date_naive();
        let range = DateRange::new(today - Duration::days(self.config.lookback_days), today);

        let series = self.provider.fetch_price_series(ticker, Some(range)).await?;
        let window = series.tail(self.config.window.max(1));
        if window.is_empty() {
            return Err(anyhow!("{} 最近 {} 天没有行情数据，无法预测", ticker, self.config.lookback_days));
        }

        let closes: Vec<f64> = window.iter().map(|r| r.close).collect();
        let (intercept, slope) = fit_line(&closes);

        let n = closes.len();
        let predicted: Vec<f64> = (n..n + horizon_days)
            .map(|i| intercept + slope * i as f64)
            .collect();

        let last_date = window[n - 1].date;
        let future_dates = next_trading_days(last_date, horizon_days);

        log::info!(
            "{} 线性预测: 样本 {} 条, 斜率 {:.4}, 预测 {} 天",
            ticker,
            n,
            slope,
            horizon_days
        );

        let title = format!("Predicted Close Price of next {} days", horizon_days - 1);
        let actual_dates: Vec<String> = window.iter().map(|r| r.date.to_string()).collect();
        let future_dates: Vec<String> = future_dates.iter().map(|d| d.to_string()).collect();

        let mut plot = Plot::new();
        plot.add_trace(Scatter::new(actual_dates, closes).mode(Mode::Lines).name("Actual"));
        plot.add_trace(
            Scatter::new(future_dates, predicted)
                .mode(Mode::LinesMarkers)
                .name("Predicted"),
        );
        plot.set_layout(titled_layout(&title, "Date", "Close Price"));

        Chart::from_plot(&plot)
    }
}

/// 最小二乘拟合 `y = a + b * i`，返回 `(a, b)`
///
/// 只有一个样本时斜率为 0
pub fn fit_line(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        cov += dx * (y - mean_y);
        var += dx * dx;
    }

    let slope = if var == 0.0 { 0.0 } else { cov / var };
    (mean_y - slope * mean_x, slope)
}

/// `after` 之后的 `count` 个工作日（跳过周末）
pub fn next_trading_days(after: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut date = after;
    while days.len() < count {
        date += Duration::days(1);
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(date);
        }
    }
    days
}
