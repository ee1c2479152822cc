//! 页面交互模型
//!
//! 浏览器每次触发事件都会提交当前全部输入的快照，
//! 服务端不保存会话状态。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::chart::Chart;

/// 按钮是否被点击过
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    #[default]
    NotRequested,
    Requested,
}

impl ActionState {
    pub fn is_requested(self) -> bool {
        self == ActionState::Requested
    }
}

/// 页面上可被重置的操作按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Stock,
    Indicators,
    Forecast,
}

/// 页面输入快照
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiInputs {
    /// 股票代码输入框
    #[serde(default)]
    pub ticker: Option<String>,
    /// 搜索按钮
    #[serde(default)]
    pub submit: ActionState,
    /// 股价图按钮
    #[serde(default)]
    pub stock: ActionState,
    /// 指标按钮
    #[serde(default)]
    pub indicators: ActionState,
    /// 预测按钮
    #[serde(default)]
    pub forecast: ActionState,
    /// 日期选择器开始日期
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// 日期选择器结束日期
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// 预测天数输入框
    #[serde(default)]
    pub n_days: Option<String>,
}

impl UiInputs {
    pub fn set_action(&mut self, action: Action, state: ActionState) {
        match action {
            Action::Stock => self.stock = state,
            Action::Indicators => self.indicators = state,
            Action::Forecast => self.forecast = state,
        }
    }
}

/// 页面上可被更新的区域，取值即元素 id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "logo")]
    Logo,
    #[serde(rename = "ticker")]
    TickerTitle,
    #[serde(rename = "graphs-content")]
    GraphsContent,
    #[serde(rename = "main-content")]
    MainContent,
    #[serde(rename = "forecast-content")]
    ForecastContent,
}

/// 区域内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Fragment {
    /// 清空区域
    Empty,
    Text(String),
    Image { src: String },
    Graph(Chart),
}

/// 单项页面修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    Set { slot: Slot, fragment: Fragment },
    Reset { action: Action },
}

impl Patch {
    pub fn set(slot: Slot, fragment: Fragment) -> Self {
        Patch::Set { slot, fragment }
    }

    pub fn reset(action: Action) -> Self {
        Patch::Reset { action }
    }
}

/// 规则执行结果
///
/// `NoUpdate` 表示不刷新，页面保持原样；
/// 清空区域需显式返回 `Fragment::Empty`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "patches", rename_all = "snake_case")]
pub enum RuleOutcome {
    NoUpdate,
    Update(Vec<Patch>),
}

impl RuleOutcome {
    pub fn single(slot: Slot, fragment: Fragment) -> Self {
        RuleOutcome::Update(vec![Patch::set(slot, fragment)])
    }

    pub fn is_no_update(&self) -> bool {
        matches!(self, RuleOutcome::NoUpdate)
    }

    /// 指定区域的新内容
    pub fn fragment(&self, slot: Slot) -> Option<&Fragment> {
        match self {
            RuleOutcome::NoUpdate => None,
            RuleOutcome::Update(patches) => patches.iter().find_map(|p| match p {
                Patch::Set { slot: s, fragment } if *s == slot => Some(fragment),
                _ => None,
            }),
        }
    }
}

/// 路由分发后每条规则的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule: String,
    pub outcome: RuleOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_default_when_fields_missing() {
        let inputs: UiInputs = serde_json::from_str(r#"{"ticker":"AAPL","stock":"requested"}"#).unwrap();
        assert_eq!(inputs.ticker.as_deref(), Some("AAPL"));
        assert!(inputs.stock.is_requested());
        assert!(!inputs.submit.is_requested());
        assert!(inputs.start_date.is_none());
    }

    #[test]
    fn test_outcome_wire_format() {
        let no_update = serde_json::to_value(RuleOutcome::NoUpdate).unwrap();
        assert_eq!(no_update["status"], "no_update");

        let update = serde_json::to_value(RuleOutcome::Update(vec![
            Patch::set(Slot::GraphsContent, Fragment::Empty),
            Patch::reset(Action::Forecast),
        ]))
        .unwrap();
        assert_eq!(update["status"], "update");
        assert_eq!(update["patches"][0]["op"], "set");
        assert_eq!(update["patches"][0]["slot"], "graphs-content");
        assert_eq!(update["patches"][0]["fragment"]["kind"], "empty");
        assert_eq!(update["patches"][1]["action"], "forecast");
    }
}
