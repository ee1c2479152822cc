//! 股票数据模型
//!
//! 定义股票代码、日期区间、历史行情和公司信息等数据结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 股票代码
///
/// 由输入框原始文本构造，去除首尾空白；空白文本视为未输入。
/// 是否真实存在由数据源判定。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// 从输入文本构造，空白或缺失返回 None
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 页面展示用的大写形式
    pub fn display_name(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 日期区间（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 创建区间，起止颠倒时自动交换
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// 由日期选择器的取值构造
    ///
    /// 只有选择了开始日期才形成区间；结束日期缺省为 `today`。
    /// 返回 None 表示查询全部历史。
    pub fn from_picker(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<Self> {
        start.map(|s| Self::new(s, end.unwrap_or(today)))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// 单日 OHLCV 数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    /// 日期（交易所当地日期）
    pub date: NaiveDate,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价
    pub close: f64,
    /// 成交量
    pub volume: u64,
}

/// 历史行情序列，按日期升序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: Ticker,
    pub rows: Vec<PriceRow>,
}

impl PriceSeries {
    pub fn new(ticker: Ticker, mut rows: Vec<PriceRow>) -> Self {
        rows.sort_by_key(|r| r.date);
        Self { ticker, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.open).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    /// 仅保留区间内的数据
    pub fn retain_range(&mut self, range: &DateRange) {
        self.rows.retain(|r| range.contains(r.date));
    }

    /// 最近 n 条数据
    pub fn tail(&self, n: usize) -> &[PriceRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }
}

/// 公司基本信息
///
/// 每次请求实时获取，不做缓存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompanyInfo {
    /// 股票代码
    pub symbol: String,
    /// 简称
    pub short_name: Option<String>,
    /// 全称
    pub long_name: Option<String>,
    /// 业务简介
    pub long_business_summary: Option<String>,
    /// 行业板块
    pub sector: Option<String>,
    /// 细分行业
    pub industry: Option<String>,
    /// 公司网站
    pub website: Option<String>,
}
