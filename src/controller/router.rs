//! 事件路由
//!
//! 显式登记 事件名 -> 规则 的对应关系

use anyhow::Result;

use super::Controller;
use std::collections::VecDeque;

use crate::models::{Action, ActionState, Patch, RuleOutcome, RuleResult, UiInputs};

/// 交互规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    CompanyInfo,
    PriceChart,
    IndicatorChart,
    Forecast,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::CompanyInfo => "company_info",
            Rule::PriceChart => "price_chart",
            Rule::IndicatorChart => "indicator_chart",
            Rule::Forecast => "forecast",
        }
    }

    /// 依赖某个按钮状态的规则
    pub fn watching(action: Action) -> Rule {
        match action {
            Action::Stock => Rule::PriceChart,
            Action::Indicators => Rule::IndicatorChart,
            Action::Forecast => Rule::Forecast,
        }
    }

    pub async fn run(self, controller: &Controller, inputs: &UiInputs) -> Result<RuleOutcome> {
        match self {
            Rule::CompanyInfo => controller.company_info_rule(inputs).await,
            Rule::PriceChart => controller.price_chart_rule(inputs).await,
            Rule::IndicatorChart => controller.indicator_chart_rule(inputs).await,
            Rule::Forecast => controller.forecast_rule(inputs).await,
        }
    }
}

/// 事件路由表
pub struct Router {
    routes: Vec<(&'static str, Vec<Rule>)>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: vec![
                // 页面首次加载，各区域进入初始状态
                ("load", vec![Rule::CompanyInfo, Rule::PriceChart, Rule::IndicatorChart, Rule::Forecast]),
                ("submit", vec![Rule::CompanyInfo]),
                ("stock", vec![Rule::PriceChart]),
                ("indicators", vec![Rule::IndicatorChart]),
                ("date_range", vec![Rule::PriceChart, Rule::IndicatorChart]),
                ("forecast", vec![Rule::Forecast]),
            ],
        }
    }

    pub fn rules_for(&self, event: &str) -> Option<&[Rule]> {
        self.routes
            .iter()
            .find(|(name, _)| *name == event)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn events(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().map(|(name, _)| *name)
    }

    /// 依次执行事件对应的规则，任一规则失败即返回错误
    ///
    /// 规则重置的按钮会写回输入快照，并追加执行依赖该按钮的规则
    ///
    /// 未登记的事件返回 None
    pub async fn dispatch(
        &self,
        controller: &Controller,
        event: &str,
        inputs: &UiInputs,
    ) -> Option<Result<Vec<RuleResult>>> {
        let rules = self.rules_for(event)?;
        Some(Self::run_all(rules, controller, inputs).await)
    }

    async fn run_all(rules: &[Rule], controller: &Controller, inputs: &UiInputs) -> Result<Vec<RuleResult>> {
        let mut inputs = inputs.clone();
        let mut pending: VecDeque<Rule> = rules.iter().copied().collect();
        let mut results = Vec::with_capacity(rules.len());

        while let Some(rule) = pending.pop_front() {
            let outcome = rule.run(controller, &inputs).await?;
            log::debug!("规则 {} 执行完成: no_update={}", rule.name(), outcome.is_no_update());

            if let RuleOutcome::Update(patches) = &outcome {
                for patch in patches {
                    if let Patch::Reset { action } = patch {
                        inputs.set_action(*action, ActionState::NotRequested);
                        let follow = Rule::watching(*action);
                        if !pending.contains(&follow) {
                            pending.push_back(follow);
                        }
                    }
                }
            }

            results.push(RuleResult {
                rule: rule.name().to_string(),
                outcome,
            });
        }
        Ok(results)
    }
}
