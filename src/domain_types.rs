//! 領域類型模組
//!
//! 定義導入管線使用的不可變值記錄。所有實體在每次導入運行中構造一次，
//! 以 upsert 形式交付存儲後不再修改。
// 宣告子模組
pub mod optimization;
pub mod session;
pub mod snapshot;
pub mod summary;
pub mod trade;

// 重新導出常用類型
pub use optimization::{ConfigResultRow, DistributionStats, OptimizationSummary};
pub use session::{MarketRecord, TradingSessionRecord};
pub use snapshot::DailySnapshot;
pub use summary::{BacktestSummary, BacktestTimeframe, BestResultDoc, OptimizationSummaryDoc};
pub use trade::{LiveTradeRow, RawTradeRow, SanitizedTrade, TradeSource};
