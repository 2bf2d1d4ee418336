//! 數據攝取模組
//!
//! 負責把上游導出的表格文件與摘要文檔轉為類型化輸入：
//! 交易 CSV、掃描結果 CSV 以及伴隨的 summary.json。
//! 攝取層的錯誤分類決定導入是否中止：交易管線的缺列與壞值為致命錯誤，
//! 分佈計算的缺列僅導致跳過。
// 宣告子模組
pub mod error;
pub mod summary_loader;
pub mod sweep_source;
pub mod trade_source;

// 重新導出常用組件
pub use error::{IngestError, IngestResult};
pub use summary_loader::{load_backtest_summary, load_optimization_summary, resolve_candidates};
pub use sweep_source::{read_sweep_rows, SweepReadOutcome, FILTER_COLUMN, SAFE_METRICS};
pub use trade_source::{read_backtest_trades, read_live_trades};
