//! 結構化進度報告
//!
//! 管線不直接寫控制台，而是發出帶階段名、計數與計算值的事件流。
//! 預設實現轉發到 tracing；測試可注入記錄型實現獨立斷言進度，
//! 不依賴日誌輸出。

use tracing::{info, warn};

/// 導入過程中發出的結構化事件
#[derive(Debug, Clone)]
pub enum ImportEvent {
    /// 進入新階段
    StageStarted { stage: &'static str },
    /// 摘要文檔加載完成
    SummaryLoaded {
        symbol: String,
        interval: String,
        data_start: String,
        data_end: String,
    },
    /// 交易脫敏完成
    TradesRedacted { count: usize, final_balance: f64 },
    /// 快照重放完成
    SnapshotsReplayed { count: usize, final_balance: f64 },
    /// 一批記錄寫入完成
    BatchUpserted {
        collection: &'static str,
        count: usize,
    },
    /// 重放最終餘額與上游報告值超出容差（非致命）
    ReconciliationMismatch { replayed: f64, expected: f64 },
    /// 分佈統計計算完成
    DistributionsComputed { metrics: usize, samples: usize },
    /// 分佈統計被省略
    DistributionsSkipped { reason: String },
    /// 交易管線導入完成
    Completed {
        trades: usize,
        snapshots: usize,
        final_balance: f64,
        total_pnl_pct: f64,
    },
    /// 優化摘要導入完成
    OptimizationCompleted {
        id: String,
        total_combinations: u64,
        passed_constraints: u64,
        has_distributions: bool,
    },
}

/// 進度報告接口
pub trait ImportReporter: Send + Sync {
    fn emit(&self, event: &ImportEvent);
}

/// 轉發到 tracing 的預設報告器
pub struct TracingReporter;

impl ImportReporter for TracingReporter {
    fn emit(&self, event: &ImportEvent) {
        match event {
            ImportEvent::StageStarted { stage } => info!(stage, "階段開始"),
            ImportEvent::SummaryLoaded {
                symbol,
                interval,
                data_start,
                data_end,
            } => info!(%symbol, %interval, %data_start, %data_end, "摘要加載完成"),
            ImportEvent::TradesRedacted {
                count,
                final_balance,
            } => info!(count, final_balance, "交易脫敏完成"),
            ImportEvent::SnapshotsReplayed {
                count,
                final_balance,
            } => info!(count, final_balance, "快照重放完成"),
            ImportEvent::BatchUpserted { collection, count } => {
                info!(collection, count, "批次寫入完成")
            }
            ImportEvent::ReconciliationMismatch { replayed, expected } => warn!(
                replayed,
                expected, "重放最終餘額與上游報告值不一致，可能存在 pnl_pct 計算或排序問題"
            ),
            ImportEvent::DistributionsComputed { metrics, samples } => {
                info!(metrics, samples, "分佈統計計算完成")
            }
            ImportEvent::DistributionsSkipped { reason } => info!(%reason, "跳過分佈統計"),
            ImportEvent::Completed {
                trades,
                snapshots,
                final_balance,
                total_pnl_pct,
            } => info!(trades, snapshots, final_balance, total_pnl_pct, "導入完成"),
            ImportEvent::OptimizationCompleted {
                id,
                total_combinations,
                passed_constraints,
                has_distributions,
            } => info!(
                %id,
                total_combinations,
                passed_constraints,
                has_distributions,
                "優化摘要導入完成"
            ),
        }
    }
}
