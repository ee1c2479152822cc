//! 图表数据模型
//!
//! 图表由 plotly 构建，序列化为 figure JSON 后交给前端 Plotly.newPlot 绘制

use anyhow::{Context, Result};
use chrono::NaiveDate;
use plotly::Plot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 可渲染的图表（plotly figure JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chart(Value);

/// plotly 的标题可能序列化为字符串或 `{"text": ...}`
fn title_text(v: &Value) -> Option<&str> {
    v.as_str().or_else(|| v.get("text").and_then(Value::as_str))
}

impl Chart {
    pub fn from_plot(plot: &Plot) -> Result<Self> {
        let figure = serde_json::from_str(&plot.to_json()).context("序列化图表失败")?;
        Ok(Self(figure))
    }

    pub fn figure(&self) -> &Value {
        &self.0
    }

    pub fn title(&self) -> Option<&str> {
        title_text(self.0.get("layout")?.get("title")?)
    }

    pub fn x_title(&self) -> Option<&str> {
        title_text(self.0.get("layout")?.get("xaxis")?.get("title")?)
    }

    fn traces(&self) -> impl Iterator<Item = &Value> {
        self.0
            .get("data")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
    }

    /// 所有序列名称，按绘制顺序
    pub fn trace_names(&self) -> Vec<&str> {
        self.traces()
            .filter_map(|t| t.get("name").and_then(Value::as_str))
            .collect()
    }

    fn trace(&self, name: &str) -> Option<&Value> {
        self.traces()
            .find(|t| t.get("name").and_then(Value::as_str) == Some(name))
    }

    pub fn trace_mode(&self, name: &str) -> Option<&str> {
        self.trace(name)?.get("mode").and_then(Value::as_str)
    }

    pub fn trace_dates(&self, name: &str) -> Option<Vec<NaiveDate>> {
        self.trace(name)?
            .get("x")?
            .as_array()?
            .iter()
            .map(|v| v.as_str().and_then(|s| s.parse().ok()))
            .collect()
    }

    pub fn trace_values(&self, name: &str) -> Option<Vec<f64>> {
        self.trace(name)?
            .get("y")?
            .as_array()?
            .iter()
            .map(Value::as_f64)
            .collect()
    }
}
