use serde::Serialize;
use std::collections::BTreeMap;

/// 優化掃描摘要記錄
///
/// 僅包含頭條指標與可選的分佈統計，永不包含任何參數組合的取值。
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationSummary {
    pub id: String,
    pub name: String,
    pub run_date: Option<String>,
    /// "策略名 / 交易對" 描述符
    pub symbol: String,
    pub interval: String,
    pub total_combinations: u64,
    pub passed_constraints: u64,
    /// 4 位小數
    pub best_sharpe: f64,
    pub best_roi_pct: f64,
    pub best_drawdown_pct: f64,
    /// 回測日期範圍（日曆日）
    pub backtest_start: Option<String>,
    pub backtest_end: Option<String>,
    pub num_candles: u64,
    /// 序列化後的分佈統計 JSON 塊，樣本不足時省略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributions: Option<String>,
}

/// 安全指標的分佈統計
///
/// 僅在至少 10 個通過約束的配置上計算，值均捨入到 4 位小數。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStats {
    pub min: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

/// 掃描結果行（僅安全指標列 + 過濾列）
///
/// 構造時只讀取安全指標允許清單與 passed_constraints，
/// 參數列永不進入此結構。
#[derive(Debug, Clone)]
pub struct ConfigResultRow {
    pub passed_constraints: bool,
    /// 以安全指標名為鍵的取值
    pub metrics: BTreeMap<String, f64>,
}
