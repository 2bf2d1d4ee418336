use serde::{Deserialize, Serialize};
use std::fmt;

/// 交易記錄來源標籤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TradeSource {
    /// 回測結果
    Backtest,
    /// 實盤交易
    Live,
}

impl TradeSource {
    /// 確定性 ID 雜湊使用的字面值
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSource::Backtest => "backtest",
            TradeSource::Live => "live",
        }
    }
}

impl fmt::Display for TradeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 回測導出的原始交易行
///
/// 短暫存在：消費一次後即丟棄，永不持久化。敏感列（倉位大小、
/// z-score、手續費、指標值等）不在此結構中建模，CSV 反序列化時
/// 直接忽略未知列，因此除計算所需的美元 pnl 外不會被讀取。
#[derive(Debug, Clone, Deserialize)]
pub struct RawTradeRow {
    pub entry_time: String,
    pub exit_time: String,
    /// 方向（"long"/"short"），上游列名為 type
    #[serde(rename = "type")]
    pub direction: String,
    pub entry_price: f64,
    pub exit_price: f64,
    /// 美元 pnl，僅瞬態用於計算帳戶級百分比回報
    pub pnl: f64,
    pub exit_reason: String,
}

/// 實盤導出的原始交易行
///
/// 實盤導出已不含美元 pnl，直接攜帶帳戶級 pnl_pct。
#[derive(Debug, Clone, Deserialize)]
pub struct LiveTradeRow {
    pub entry_time: String,
    pub exit_time: String,
    #[serde(rename = "type")]
    pub direction: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl_pct: f64,
    pub exit_reason: String,
}

/// 脫敏後的交易記錄（持久化形式）
///
/// 不變量：size 與美元 pnl 永遠為 None。脫敏是無條件的，
/// 且無法從輸出單獨還原原始帳戶規模。
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTrade {
    pub id: String,
    pub session_id: String,
    /// ISO-8601 UTC 時間戳
    pub entry_time: String,
    pub exit_time: String,
    pub direction: String,
    pub entry_price: f64,
    pub exit_price: f64,
    /// 永遠為 None（IP 保護）
    pub size: Option<f64>,
    /// 永遠為 None（暴露帳戶規模）
    pub pnl: Option<f64>,
    /// 帳戶級百分比回報，4 位小數
    pub pnl_pct: f64,
    pub exit_reason: String,
    pub source: TradeSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_literal() {
        assert_eq!(TradeSource::Backtest.as_str(), "backtest");
        assert_eq!(TradeSource::Live.to_string(), "live");
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TradeSource::Backtest).unwrap(),
            "\"backtest\""
        );
    }

    #[test]
    fn test_sanitized_trade_serializes_nulls() {
        let trade = SanitizedTrade {
            id: "trd_abc".to_string(),
            session_id: "sess_x".to_string(),
            entry_time: "2026-02-02T03:30:01+00:00".to_string(),
            exit_time: "2026-02-02T05:00:00+00:00".to_string(),
            direction: "long".to_string(),
            entry_price: 50000.0,
            exit_price: 50500.0,
            size: None,
            pnl: None,
            pnl_pct: 2.0,
            exit_reason: "take_profit".to_string(),
            source: TradeSource::Backtest,
        };
        let value = serde_json::to_value(&trade).unwrap();
        assert!(value["size"].is_null());
        assert!(value["pnl"].is_null());
        assert_eq!(value["source"], "backtest");
    }
}
