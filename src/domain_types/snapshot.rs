use crate::domain_types::trade::TradeSource;
use chrono::NaiveDate;
use serde::Serialize;

/// 每日權益快照
///
/// 由重放器從帳戶級 pnl_pct 序列推導。daily_pnl 雖為美元值，
/// 但它是已匿名化滾動餘額的差值，不暴露原始帳戶規模。
/// 不變量：第 N 日的 close_balance 等於第 N+1 日的 open_balance；
/// 快照覆蓋 [首筆交易日 − 1, 末筆交易日] 的每個日曆日，無間隙。
#[derive(Debug, Clone, Serialize)]
pub struct DailySnapshot {
    pub id: String,
    pub market_id: String,
    /// UTC 日曆日
    pub date: NaiveDate,
    /// 2 位小數
    pub open_balance: f64,
    pub close_balance: f64,
    pub daily_pnl: f64,
    /// 4 位小數
    pub daily_pnl_pct: f64,
    pub num_trades: usize,
    pub source: TradeSource,
}
