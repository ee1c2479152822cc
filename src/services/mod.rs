//! 业务逻辑服务模块
//!
//! 封装数据获取、图表构建和价格预测

pub mod charts;    // 图表构建
pub mod forecast;  // 价格预测
pub mod provider;  // 行情数据源

#[cfg(test)]
pub mod testing;
