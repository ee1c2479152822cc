//! 测试用的内存数据源与预测器

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use plotly::common::Mode;
use plotly::{Plot, Scatter};
use std::sync::Mutex;

use crate::models::{Chart, CompanyInfo, DateRange, PriceRow, PriceSeries, Ticker};
use crate::services::charts::titled_layout;
use crate::services::forecast::Forecaster;
use crate::services::provider::MarketDataProvider;

/// 记录调用参数的内存数据源
#[derive(Default)]
pub struct StubProvider {
    pub info: Option<CompanyInfo>,
    pub rows: Vec<PriceRow>,
    company_calls: Mutex<Vec<String>>,
    price_calls: Mutex<Vec<(String, Option<DateRange>)>>,
}

impl StubProvider {
    /// `n` 个连续自然日（截至今天）的线性行情
    pub fn linear(n: usize, start: f64, step: f64) -> Self {
        let today = Utc::now().date_naive();
        let first = today - Duration::days(n as i64 - 1);
        Self::from_closes(first, &(0..n).map(|i| start + step * i as f64).collect::<Vec<_>>())
    }

    pub fn from_closes(first: NaiveDate, closes: &[f64]) -> Self {
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceRow {
                date: first + Duration::days(i as i64),
                open: c - 0.5,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 1_000_000,
            })
            .collect();
        Self { rows, ..Self::default() }
    }

    pub fn with_info(mut self, info: CompanyInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn company_calls(&self) -> Vec<String> {
        self.company_calls.lock().unwrap().clone()
    }

    pub fn price_calls(&self) -> Vec<(String, Option<DateRange>)> {
        self.price_calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.company_calls().len() + self.price_calls().len()
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn fetch_company_info(&self, ticker: &Ticker) -> Result<CompanyInfo> {
        self.company_calls.lock().unwrap().push(ticker.to_string());
        self.info
            .clone()
            .ok_or_else(|| anyhow!("Quote not found for ticker symbol: {}", ticker))
    }

    async fn fetch_price_series(&self, ticker: &Ticker, range: Option<DateRange>) -> Result<PriceSeries> {
        self.price_calls.lock().unwrap().push((ticker.to_string(), range));
        let mut series = PriceSeries::new(ticker.clone(), self.rows.clone());
        if let Some(r) = range {
            series.retain_range(&r);
        }
        Ok(series)
    }
}

/// 记录预测天数的预测器
#[derive(Default)]
pub struct StubForecaster {
    calls: Mutex<Vec<(String, usize)>>,
}

impl StubForecaster {
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forecaster for StubForecaster {
    async fn forecast(&self, ticker: &Ticker, horizon_days: usize) -> Result<Chart> {
        self.calls.lock().unwrap().push((ticker.to_string(), horizon_days));
        let mut plot = Plot::new();
        plot.add_trace(
            Scatter::new(vec!["2024-01-02".to_string()], vec![1.0])
                .mode(Mode::Lines)
                .name("Predicted"),
        );
        plot.set_layout(titled_layout("stub forecast", "Date", "Close Price"));
        Chart::from_plot(&plot)
    }
}
