//! 页面交互规则
//!
//! 每条规则只依赖本次提交的输入快照：
//! 返回 `NoUpdate` 时页面保持原样，返回 `Fragment::Empty` 时清空对应区域。

use anyhow::{anyhow, Context, Result};

use super::Controller;
use crate::models::{
    Action, DateRange, Fragment, Patch, RuleOutcome, Slot, Ticker, UiInputs,
};
use crate::services::charts::{build_indicator_chart, build_price_chart};

/// 未搜索时的提示语
pub const PLACEHOLDER_MESSAGE: &str = "Hey there! Please enter a legitimate stock code to get details.";
/// 未搜索时的标题
pub const PLACEHOLDER_TITLE: &str = "Stocks";

/// 搜索后重置的按钮
const RESET_ACTIONS: [Action; 3] = [Action::Stock, Action::Indicators, Action::Forecast];

fn company_patches(description: String, logo: String, title: String) -> RuleOutcome {
    let mut patches = vec![
        Patch::set(Slot::Description, Fragment::Text(description)),
        Patch::set(Slot::Logo, Fragment::Image { src: logo }),
        Patch::set(Slot::TickerTitle, Fragment::Text(title)),
    ];
    patches.extend(RESET_ACTIONS.iter().map(|a| Patch::reset(*a)));
    RuleOutcome::Update(patches)
}

impl Controller {
    fn date_range(&self, inputs: &UiInputs) -> Option<DateRange> {
        DateRange::from_picker(inputs.start_date, inputs.end_date, self.today())
    }

    /// 公司信息：描述、图标、名称，并重置三个操作按钮
    pub async fn company_info_rule(&self, inputs: &UiInputs) -> Result<RuleOutcome> {
        if !inputs.submit.is_requested() {
            return Ok(company_patches(
                PLACEHOLDER_MESSAGE.to_string(),
                self.logo_src.clone(),
                PLACEHOLDER_TITLE.to_string(),
            ));
        }

        let Some(ticker) = Ticker::parse(inputs.ticker.as_deref()) else {
            return Ok(RuleOutcome::NoUpdate);
        };

        let info = self.provider.fetch_company_info(&ticker).await?;
        log::info!("获取 {} 公司信息成功", ticker);

        Ok(company_patches(
            info.long_business_summary.unwrap_or_default(),
            self.logo_src.clone(),
            info.short_name.unwrap_or_else(|| ticker.display_name()),
        ))
    }

    /// 开盘价/收盘价走势图
    pub async fn price_chart_rule(&self, inputs: &UiInputs) -> Result<RuleOutcome> {
        if !inputs.stock.is_requested() {
            return Ok(RuleOutcome::single(Slot::GraphsContent, Fragment::Empty));
        }

        let Some(ticker) = Ticker::parse(inputs.ticker.as_deref()) else {
            return Ok(RuleOutcome::NoUpdate);
        };

        let series = self.provider.fetch_price_series(&ticker, self.date_range(inputs)).await?;
        Ok(RuleOutcome::single(
            Slot::GraphsContent,
            Fragment::Graph(build_price_chart(&series)?),
        ))
    }

    /// 指数移动平均图
    ///
    /// 未输入股票代码时清空区域而不是保持原样，与其他规则不同
    pub async fn indicator_chart_rule(&self, inputs: &UiInputs) -> Result<RuleOutcome> {
        if !inputs.indicators.is_requested() {
            return Ok(RuleOutcome::single(Slot::MainContent, Fragment::Empty));
        }

        let Some(ticker) = Ticker::parse(inputs.ticker.as_deref()) else {
            return Ok(RuleOutcome::single(Slot::MainContent, Fragment::Empty));
        };

        let series = self.provider.fetch_price_series(&ticker, self.date_range(inputs)).await?;
        Ok(RuleOutcome::single(
            Slot::MainContent,
            Fragment::Graph(build_indicator_chart(&series)?),
        ))
    }

    /// 价格预测，实际预测天数为输入值加一
    ///
    /// 天数按非负整数解析，负数、空值或非数字都会报错
    pub async fn forecast_rule(&self, inputs: &UiInputs) -> Result<RuleOutcome> {
        if !inputs.forecast.is_requested() {
            return Ok(RuleOutcome::single(Slot::ForecastContent, Fragment::Empty));
        }

        let Some(ticker) = Ticker::parse(inputs.ticker.as_deref()) else {
            return Ok(RuleOutcome::NoUpdate);
        };

        let raw = inputs.n_days.as_deref().unwrap_or_default();
        let n_days: usize = raw
            .trim()
            .parse()
            .with_context(|| format!("无效的预测天数: {:?}", raw))?;

        let horizon = n_days
            .checked_add(1)
            .ok_or_else(|| anyhow!("预测天数过大: {}", n_days))?;

        let chart = self.forecaster.forecast(&ticker, horizon).await?;
        Ok(RuleOutcome::single(Slot::ForecastContent, Fragment::Graph(chart)))
    }
}
