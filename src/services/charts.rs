//! 图表构建
//!
//! 输入行情序列，输出可渲染的图表

use anyhow::Result;
use plotly::common::{Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};

use crate::models::{Chart, PriceSeries};

/// 指数移动平均的平滑跨度
pub const EWA_SPAN: usize = 20;

/// 横轴日期文本
fn date_labels(series: &PriceSeries) -> Vec<String> {
    series.dates().iter().map(|d| d.to_string()).collect()
}

/// 带标题和坐标轴名称的布局
pub fn titled_layout(title: &str, x_title: &str, y_title: &str) -> Layout {
    Layout::new()
        .title(Title::with_text(title))
        .x_axis(Axis::new().title(Title::with_text(x_title)))
        .y_axis(Axis::new().title(Title::with_text(y_title)))
}

/// 收盘价与开盘价走势图
pub fn build_price_chart(series: &PriceSeries) -> Result<Chart> {
    let dates = date_labels(series);

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(dates.clone(), series.closes())
            .mode(Mode::Lines)
            .name("Close"),
    );
    plot.add_trace(
        Scatter::new(dates, series.opens())
            .mode(Mode::Lines)
            .name("Open"),
    );
    plot.set_layout(titled_layout("Closing and Openning Price vs Date", "Date", "value"));

    Chart::from_plot(&plot)
}

/// 收盘价 20 日指数移动平均图
pub fn build_indicator_chart(series: &PriceSeries) -> Result<Chart> {
    let smoothed = ewma(&series.closes(), EWA_SPAN);

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(date_labels(series), smoothed)
            .mode(Mode::LinesMarkers)
            .name("EWA_20"),
    );
    plot.set_layout(titled_layout("Exponential Moving Average vs Date", "Date", "EWA_20"));

    Chart::from_plot(&plot)
}

/// 指数加权移动平均（不做偏差修正）
///
/// `alpha = 2 / (span + 1)`，`y[0] = x[0]`，
/// `y[t] = (1 - alpha) * y[t-1] + alpha * x[t]`
pub fn ewma(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    let mut prev: Option<f64> = None;
    for &x in values {
        let y = match prev {
            None => x,
            Some(p) => (1.0 - alpha) * p + alpha * x,
        };
        out.push(y);
        prev = Some(y);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceRow, Ticker};
    use chrono::{Duration, NaiveDate};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceRow {
                date: start + Duration::days(i as i64),
                open: c - 1.0,
                high: c + 1.0,
                low: c - 2.0,
                close: c,
                volume: 1000,
            })
            .collect();
        PriceSeries::new(Ticker::parse(Some("AAPL")).unwrap(), rows)
    }

    #[test]
    fn test_price_chart_has_close_and_open() {
        let chart = build_price_chart(&series(&[10.0, 11.0, 12.0])).unwrap();

        assert_eq!(chart.trace_names(), vec!["Close", "Open"]);
        assert_eq!(chart.x_title(), Some("Date"));
        assert_eq!(chart.trace_values("Close").unwrap(), vec![10.0, 11.0, 12.0]);
        assert_eq!(chart.trace_values("Open").unwrap(), vec![9.0, 10.0, 11.0]);
        assert_eq!(chart.trace_dates("Open").unwrap().len(), 3);
        assert_eq!(chart.trace_mode("Close"), Some("lines"));
    }

    #[test]
    fn test_ewma_of_constant_is_constant() {
        let smoothed = ewma(&[42.5; 50], EWA_SPAN);
        assert_eq!(smoothed.len(), 50);
        for v in smoothed {
            assert!((v - 42.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ewma_recursion() {
        // span = 3 => alpha = 0.5
        let smoothed = ewma(&[1.0, 3.0, 5.0], 3);
        assert_eq!(smoothed, vec![1.0, 2.0, 3.5]);
        assert!(ewma(&[], 20).is_empty());
    }

    #[test]
    fn test_indicator_chart() {
        let chart = build_indicator_chart(&series(&[10.0, 10.0, 10.0, 10.0])).unwrap();

        assert_eq!(chart.trace_names(), vec!["EWA_20"]);
        assert_eq!(chart.trace_mode("EWA_20"), Some("lines+markers"));
        assert_eq!(chart.trace_values("EWA_20").unwrap(), vec![10.0; 4]);
        assert_eq!(chart.title(), Some("Exponential Moving Average vs Date"));
    }
}
