//! 導入編排模組
//!
//! 把攝取、脫敏、重放、分佈統計與存儲組合成三條導入管線：
//! 回測、優化掃描與實盤。每條管線都是冪等的，用相同輸入重跑
//! 會以相同的值覆蓋相同的 id。狀態機（每次導入）：
//! Start → LoadSummary → ReadRows → Redact → Replay →
//! Upsert(market) → Upsert(session) → Upsert(trades, 分批) →
//! Upsert(snapshots, 分批) → Report → Done。
//! 致命錯誤在失敗批次寫入前中止；已提交批次不回滾（at-least-once）。
// 宣告子模組
pub mod backtest;
pub mod live;
pub mod optimization;
pub mod report;

// 重新導出常用組件
pub use backtest::run_backtest_import;
pub use live::run_live_import;
pub use optimization::run_optimization_import;
pub use report::{ImportEvent, ImportReporter, TracingReporter};
