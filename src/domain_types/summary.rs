use serde::Deserialize;
use serde_json::{Map, Value};

// 伴隨摘要文檔（summary.json）的類型化模型。
// 上游字段可能缺失，預設值解析表集中在此處：
//   symbol -> "BTCUSDT"，interval -> "15m"，starting_balance -> 10000.0，
//   strategy -> "proscore2"，數值計數 -> 0，時間範圍字串 -> ""。

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_interval() -> String {
    "15m".to_string()
}

fn default_starting_balance() -> f64 {
    10000.0
}

fn default_strategy() -> String {
    "proscore2".to_string()
}

/// 回測時間範圍
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BacktestTimeframe {
    #[serde(default)]
    pub data_start: String,
    #[serde(default)]
    pub data_end: String,
    #[serde(default)]
    pub num_candles: u64,
}

/// 回測摘要文檔
#[derive(Debug, Clone, Deserialize)]
pub struct BacktestSummary {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default)]
    pub backtest_timeframe: BacktestTimeframe,
    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,
    #[serde(default)]
    pub num_trades: Option<u64>,
    /// 上游報告的最終餘額，用於重放對帳
    #[serde(default)]
    pub final_balance: Option<f64>,
    #[serde(default)]
    pub pnl_pct: Option<f64>,
}

/// 優化掃描配置節
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizationConfigDoc {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// 約束配置僅用於診斷輸出，永不持久化
    #[serde(default)]
    pub constraints: Map<String, Value>,
}

impl Default for OptimizationConfigDoc {
    fn default() -> Self {
        Self {
            name: None,
            strategy: default_strategy(),
            constraints: Map::new(),
        }
    }
}

/// 最佳結果節
#[derive(Debug, Clone, Deserialize)]
pub struct BestResultDoc {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default)]
    pub sharpe_ratio: f64,
    #[serde(default)]
    pub pnl_pct: f64,
    #[serde(default)]
    pub max_drawdown: f64,
    #[serde(default)]
    pub backtest_timeframe: BacktestTimeframe,
}

impl Default for BestResultDoc {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            interval: default_interval(),
            sharpe_ratio: 0.0,
            pnl_pct: 0.0,
            max_drawdown: 0.0,
            backtest_timeframe: BacktestTimeframe::default(),
        }
    }
}

/// 優化掃描摘要文檔
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizationSummaryDoc {
    #[serde(default)]
    pub config: OptimizationConfigDoc,
    #[serde(default)]
    pub best_result: BestResultDoc,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub total_combinations: u64,
    #[serde(default)]
    pub passed_constraints: u64,
}
