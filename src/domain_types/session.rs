use serde::Serialize;

/// 市場記錄
#[derive(Debug, Clone, Serialize)]
pub struct MarketRecord {
    pub id: String,
    pub symbol: String,
    pub interval: String,
    pub is_active: bool,
}

/// 交易時段記錄
#[derive(Debug, Clone, Serialize)]
pub struct TradingSessionRecord {
    pub id: String,
    pub market_id: String,
    /// ISO-8601 UTC 時間戳，未知時為 None
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    /// "backtest" 或 "live"
    pub mode: String,
    /// 實盤時段不公開起始餘額
    pub starting_balance: Option<f64>,
}
