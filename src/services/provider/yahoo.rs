//! Yahoo Finance 行情接口实现
//!
//! - 公司信息: /v10/finance/quoteSummary/<symbol>?modules=assetProfile,price
//! - 日K线: /v8/finance/chart/<symbol>?interval=1d
//!
//! quoteSummary 需要会话 Cookie 和 crumb，每次请求重新获取

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::MarketDataProvider;
use crate::config::ProviderConfig;
use crate::models::{CompanyInfo, DateRange, PriceRow, PriceSeries, Ticker};

const REFERER: &str = "https://finance.yahoo.com/";

/// Yahoo Finance 数据源
pub struct YahooProvider {
    client: Client,
    config: ProviderConfig,
}

impl YahooProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .context("创建 HTTP 客户端失败")?;

        Ok(Self { client, config })
    }

    /// 拼接 `<base_url>/<prefix...>/<symbol>`，股票代码按路径段编码
    fn endpoint(&self, prefix: &[&str], symbol: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .with_context(|| format!("无效的数据源地址: {}", self.config.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("数据源地址不能作为路径前缀: {}", self.config.base_url))?
            .pop_if_empty()
            .extend(prefix)
            .push(symbol);
        Ok(url)
    }

    /// 获取 crumb（先访问 Cookie 地址建立会话）
    async fn fetch_crumb(&self) -> Result<String> {
        // 该地址通常返回 404，但会写入会话 Cookie
        if let Err(e) = self
            .client
            .get(&self.config.cookie_url)
            .header("Referer", REFERER)
            .send()
            .await
        {
            log::warn!("获取 Yahoo 会话 Cookie 失败: {}", e);
        }

        let mut url = Url::parse(&self.config.base_url)?;
        url.set_path("/v1/test/getcrumb");

        let response = self.client.get(url).header("Referer", REFERER).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("获取 crumb 失败: {}", response.status()));
        }

        let body = response.text().await?;
        parse_crumb(&body)
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_company_info(&self, ticker: &Ticker) -> Result<CompanyInfo> {
        let crumb = self.fetch_crumb().await?;

        let mut url = self.endpoint(&["v10", "finance", "quoteSummary"], ticker.as_str())?;
        url.query_pairs_mut()
            .append_pair("modules", "assetProfile,price")
            .append_pair("crumb", &crumb);

        log::debug!("请求公司信息 URL: {}", url);

        let response = self.client.get(url).header("Referer", REFERER).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow!(
                "获取 {} 公司信息失败: {} {}",
                ticker,
                status,
                api_error_description(&text).unwrap_or_default()
            ));
        }

        parse_company_info(&text, ticker)
    }

    async fn fetch_price_series(&self, ticker: &Ticker, range: Option<DateRange>) -> Result<PriceSeries> {
        let mut url = self.endpoint(&["v8", "finance", "chart"], ticker.as_str())?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("interval", "1d");
            match range {
                Some(r) => {
                    query
                        .append_pair("period1", &day_start_timestamp(r.start).to_string())
                        .append_pair("period2", &day_start_timestamp(r.end + Duration::days(1)).to_string());
                }
                None => {
                    query.append_pair("range", "max");
                }
            }
        }

        log::debug!("请求日K线数据 URL: {}", url);

        let response = self.client.get(url).header("Referer", REFERER).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow!(
                "获取 {} 历史数据失败: {} {}",
                ticker,
                status,
                api_error_description(&text).unwrap_or_default()
            ));
        }

        let mut series = parse_chart(&text, ticker)?;
        if let Some(r) = range {
            series.retain_range(&r);
        }

        log::info!("{} 获取到 {} 条日K线", ticker, series.len());
        Ok(series)
    }
}

/// UTC 零点的 Unix 时间戳
fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn parse_crumb(body: &str) -> Result<String> {
    let crumb = body.trim();
    if crumb.is_empty() || crumb.len() >= 100 || crumb.contains(' ') || crumb.contains('<') {
        return Err(anyhow!("无效的 crumb 响应"));
    }
    Ok(crumb.to_string())
}

// ==================== 响应结构 ====================

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooError {
    fn message(&self) -> String {
        match (&self.code, &self.description) {
            (Some(c), Some(d)) => format!("{}: {}", c, d),
            (None, Some(d)) => d.clone(),
            (Some(c), None) => c.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "exchangeTimezoneName", default)]
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    price: Option<SummaryPrice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    #[serde(default)]
    long_business_summary: Option<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryPrice {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
}

/// 从错误响应体中提取错误描述
fn api_error_description(body: &str) -> Option<String> {
    if let Ok(env) = serde_json::from_str::<ChartEnvelope>(body) {
        return env.chart.error.map(|e| e.message());
    }
    if let Ok(env) = serde_json::from_str::<SummaryEnvelope>(body) {
        return env.quote_summary.error.map(|e| e.message());
    }
    None
}

// ==================== 解析 ====================

/// 解析日K线响应
///
/// 时间戳按交易所时区换算为日期，OHLC 任一缺失的行被丢弃
fn parse_chart(body: &str, ticker: &Ticker) -> Result<PriceSeries> {
    let envelope: ChartEnvelope = serde_json::from_str(body).context("解析 Yahoo 日K线响应失败")?;

    if let Some(error) = envelope.chart.error {
        return Err(anyhow!("Yahoo 日K线接口错误: {}", error.message()));
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| anyhow!("股票代码 {} 可能无效或已退市", ticker))?;

    let tz: Tz = result
        .meta
        .and_then(|m| m.exchange_timezone_name)
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC);

    // 新上市或无成交的标的可能没有 timestamp 字段
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close)) =
            (field(&quote.open), field(&quote.high), field(&quote.low), field(&quote.close))
        else {
            continue;
        };

        let Some(utc) = Utc.timestamp_opt(ts, 0).single() else {
            continue;
        };

        rows.push(PriceRow {
            date: utc.with_timezone(&tz).date_naive(),
            open,
            high,
            low,
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0).max(0) as u64,
        });
    }

    Ok(PriceSeries::new(ticker.clone(), rows))
}

/// 解析公司信息响应
fn parse_company_info(body: &str, ticker: &Ticker) -> Result<CompanyInfo> {
    let envelope: SummaryEnvelope = serde_json::from_str(body).context("解析 Yahoo 公司信息响应失败")?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(anyhow!("Yahoo 公司信息接口错误: {}", error.message()));
    }

    let result = envelope
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| anyhow!("股票代码 {} 可能无效或已退市", ticker))?;

    let profile = result.asset_profile.unwrap_or_default();
    let price = result.price.unwrap_or_default();

    Ok(CompanyInfo {
        symbol: price.symbol.unwrap_or_else(|| ticker.display_name()),
        short_name: price.short_name,
        long_name: price.long_name,
        long_business_summary: profile.long_business_summary,
        sector: profile.sector,
        industry: profile.industry,
        website: profile.website,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(Some(s)).unwrap()
    }

    #[test]
    fn test_parse_chart() {
        // 2024-01-02 14:30 UTC 与 2024-01-03 14:30 UTC，纽约时间同日
        let body = r#"{"chart":{"result":[{
            "meta":{"symbol":"AAPL","exchangeTimezoneName":"America/New_York"},
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{
                "open":[187.15,184.22,null],
                "high":[188.44,185.88,183.0],
                "low":[183.89,183.43,180.9],
                "close":[185.64,184.25,181.91],
                "volume":[82488700,58414500,null]
            }]}
        }],"error":null}}"#;

        let series = parse_chart(body, &ticker("AAPL")).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(series.rows[0].open, 187.15);
        assert_eq!(series.rows[1].close, 184.25);
        assert_eq!(series.rows[1].volume, 58414500);
    }

    #[test]
    fn test_parse_chart_uses_exchange_timezone() {
        // 2024-01-02 23:30 UTC 在东京已是 1 月 3 日
        let body = r#"{"chart":{"result":[{
            "meta":{"exchangeTimezoneName":"Asia/Tokyo"},
            "timestamp":[1704238200],
            "indicators":{"quote":[{"open":[1.0],"high":[1.0],"low":[1.0],"close":[1.0],"volume":[1]}]}
        }],"error":null}}"#;

        let series = parse_chart(body, &ticker("7203.T")).unwrap();
        assert_eq!(series.rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_parse_chart_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart(body, &ticker("ZZZZ")).unwrap_err();
        assert!(err.to_string().contains("No data found"));
        assert_eq!(
            api_error_description(body).as_deref(),
            Some("Not Found: No data found, symbol may be delisted")
        );
    }

    #[test]
    fn test_parse_chart_without_timestamps() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = parse_chart(body, &ticker("NEW")).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_company_info() {
        let body = r#"{"quoteSummary":{"result":[{
            "assetProfile":{"longBusinessSummary":"Apple Inc. designs smartphones.","sector":"Technology","industry":"Consumer Electronics","website":"https://www.apple.com"},
            "price":{"symbol":"AAPL","shortName":"Apple Inc.","longName":"Apple Inc."}
        }],"error":null}}"#;

        let info = parse_company_info(body, &ticker("aapl")).unwrap();
        assert_eq!(info.symbol, "AAPL");
        assert_eq!(info.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(info.long_business_summary.as_deref(), Some("Apple Inc. designs smartphones."));
        assert_eq!(info.sector.as_deref(), Some("Technology"));
    }

    #[test]
    fn test_parse_company_info_error() {
        let body = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for ticker symbol: ZZZZ"}}}"#;
        let err = parse_company_info(body, &ticker("ZZZZ")).unwrap_err();
        assert!(err.to_string().contains("Quote not found"));
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("abc.DEF/12\n").unwrap(), "abc.DEF/12");
        assert!(parse_crumb("").is_err());
        assert!(parse_crumb("<html>Too Many Requests</html>").is_err());
    }

    #[test]
    fn test_endpoint_encodes_symbol() {
        let provider = YahooProvider::new(ProviderConfig::default()).unwrap();
        let url = provider.endpoint(&["v8", "finance", "chart"], "BRK/B").unwrap();
        assert_eq!(url.as_str(), "https://query1.finance.yahoo.com/v8/finance/chart/BRK%2FB");
    }

    #[test]
    fn test_day_start_timestamp() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(day_start_timestamp(date), 1704153600);
    }
}
