//! 脫敏模組
//!
//! 兩個職責：
//! 1. 身份生成：從交易的經濟特徵字段推導內容尋址的確定性 ID，
//!    使重複導入同一來源成為冪等 upsert 而不是重複插入。
//! 2. 交易脫敏：把原始美元計價的交易行轉為匿名化的百分比記錄。
//!    美元 pnl 只瞬態參與帳戶級 pnl_pct 的計算，永不寫入輸出；
//!    size 與 pnl 字段在持久化形式中無條件為 None。
use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::domain_types::{LiveTradeRow, RawTradeRow, SanitizedTrade, TradeSource};
use crate::utils::rounding::round_pct;
use crate::utils::time_utils::normalize_naive_timestamp;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)
}

/// 從 entry_time + direction + source 生成確定性交易 ID
///
/// 字段按原樣拼接（冒號分隔），SHA-256 十六進制摘要截取 12 字符。
/// 截斷後為 48 位空間，在預期數據量下碰撞風險可忽略。
pub fn trade_id(entry_time: &str, direction: &str, source: &str) -> String {
    let raw = format!("{}:{}:{}", entry_time, direction, source);
    format!("trd_{}", &sha256_hex(&raw)[..12])
}

/// 從結果目錄路徑生成回測時段 ID
pub fn backtest_session_id(folder: &Path) -> String {
    format!(
        "sess_backtest_{}",
        &sha256_hex(&folder.display().to_string())[..8]
    )
}

/// 從掃描名稱生成優化運行 ID
pub fn optimization_id(name: &str) -> String {
    format!("opt_{}", &sha256_hex(name)[..8])
}

/// 脫敏回測交易並計算帳戶級回報
///
/// 維護一條從 starting_balance 起步的滾動餘額；按文件順序
/// （假定按入場時間排序）對每筆交易計算
/// `pnl_pct = 美元 pnl / 滾動餘額 * 100`（4 位小數），
/// 然後把未捨入的美元 pnl 累加進餘額。
/// 返回脫敏交易與重放期望的最終餘額。
pub fn redact_trades(
    rows: &[RawTradeRow],
    session_id: &str,
    source: TradeSource,
    starting_balance: f64,
) -> IngestResult<(Vec<SanitizedTrade>, f64)> {
    let mut trades = Vec::with_capacity(rows.len());
    let mut running_balance = starting_balance;

    for (idx, row) in rows.iter().enumerate() {
        let entry_time_raw = row.entry_time.trim();
        let direction = row.direction.trim().to_string();
        let id = trade_id(entry_time_raw, &direction, source.as_str());

        let entry_time = normalize_timestamp(idx, "entry_time", entry_time_raw)?;
        let exit_time = normalize_timestamp(idx, "exit_time", row.exit_time.trim())?;

        let pnl_pct = round_pct(row.pnl / running_balance * 100.0);
        running_balance += row.pnl;

        debug!(
            trade_id = %id,
            direction = %direction,
            pnl_pct,
            running_balance,
            "交易脫敏完成"
        );

        trades.push(SanitizedTrade {
            id,
            session_id: session_id.to_string(),
            entry_time,
            exit_time,
            direction,
            entry_price: row.entry_price,
            exit_price: row.exit_price,
            size: None,
            pnl: None,
            pnl_pct,
            exit_reason: row.exit_reason.trim().to_string(),
            source,
        });
    }

    Ok((trades, running_balance))
}

/// 脫敏實盤交易
///
/// 實盤導出已攜帶帳戶級 pnl_pct，不需要滾動餘額這一步。
pub fn sanitize_live_trades(
    rows: &[LiveTradeRow],
    session_id: &str,
) -> IngestResult<Vec<SanitizedTrade>> {
    let source = TradeSource::Live;
    let mut trades = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let entry_time_raw = row.entry_time.trim();
        let direction = row.direction.trim().to_string();
        let id = trade_id(entry_time_raw, &direction, source.as_str());

        trades.push(SanitizedTrade {
            id,
            session_id: session_id.to_string(),
            entry_time: normalize_timestamp(idx, "entry_time", entry_time_raw)?,
            exit_time: normalize_timestamp(idx, "exit_time", row.exit_time.trim())?,
            direction,
            entry_price: row.entry_price,
            exit_price: row.exit_price,
            size: None,
            pnl: None,
            pnl_pct: round_pct(row.pnl_pct),
            exit_reason: row.exit_reason.trim().to_string(),
            source,
        });
    }

    Ok(trades)
}

fn normalize_timestamp(idx: usize, field: &str, value: &str) -> IngestResult<String> {
    normalize_naive_timestamp(value).ok_or_else(|| IngestError::MalformedTimestamp {
        row: idx + 1,
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn raw_row(entry: &str, exit: &str, direction: &str, pnl: f64) -> RawTradeRow {
        RawTradeRow {
            entry_time: entry.to_string(),
            exit_time: exit.to_string(),
            direction: direction.to_string(),
            entry_price: 50000.0,
            exit_price: 50500.0,
            pnl,
            exit_reason: "take_profit".to_string(),
        }
    }

    #[test]
    fn test_trade_id_deterministic() {
        let a = trade_id("2026-02-02 03:30:01", "long", "backtest");
        let b = trade_id("2026-02-02 03:30:01", "long", "backtest");
        assert_eq!(a, b);
        assert!(a.starts_with("trd_"));
        assert_eq!(a.len(), 4 + 12);
    }

    #[rstest]
    #[case("2026-02-02 03:30:02", "long", "backtest")]
    #[case("2026-02-02 03:30:01", "short", "backtest")]
    #[case("2026-02-02 03:30:01", "long", "live")]
    fn test_trade_id_varies_with_inputs(
        #[case] entry: &str,
        #[case] direction: &str,
        #[case] source: &str,
    ) {
        let base = trade_id("2026-02-02 03:30:01", "long", "backtest");
        assert_ne!(base, trade_id(entry, direction, source));
    }

    #[test]
    fn test_session_and_optimization_ids() {
        let sess = backtest_session_id(Path::new("/data/run_01"));
        assert!(sess.starts_with("sess_backtest_"));
        assert_eq!(sess.len(), "sess_backtest_".len() + 8);
        assert_eq!(sess, backtest_session_id(Path::new("/data/run_01")));

        let opt = optimization_id("sweep_a");
        assert!(opt.starts_with("opt_"));
        assert_eq!(opt, optimization_id("sweep_a"));
    }

    #[test]
    fn test_redact_running_balance_sequence() {
        // 手算參考：10000 起步，+200 再 -50
        let rows = vec![
            raw_row("2026-02-02 03:30:01", "2026-02-02 05:00:00", "long", 200.0),
            raw_row("2026-02-02 06:00:00", "2026-02-02 08:00:00", "short", -50.0),
        ];
        let (trades, final_balance) =
            redact_trades(&rows, "sess_x", TradeSource::Backtest, 10000.0).unwrap();

        assert_eq!(trades[0].pnl_pct, 2.0);
        // 第二筆交易的基準是 10200，而非 10000
        assert_eq!(trades[1].pnl_pct, -0.4902);
        assert_eq!(final_balance, 10150.0);
    }

    #[test]
    fn test_redacted_fields_always_null() {
        let rows = vec![raw_row(
            "2026-02-02 03:30:01",
            "2026-02-02 05:00:00",
            "long",
            200.0,
        )];
        let (trades, _) = redact_trades(&rows, "sess_x", TradeSource::Backtest, 10000.0).unwrap();
        assert!(trades[0].size.is_none());
        assert!(trades[0].pnl.is_none());
    }

    #[test]
    fn test_timestamps_normalized_to_utc() {
        let rows = vec![raw_row(
            " 2026-02-02 03:30:01 ",
            "2026-02-02 05:00:00",
            "long",
            200.0,
        )];
        let (trades, _) = redact_trades(&rows, "sess_x", TradeSource::Backtest, 10000.0).unwrap();
        assert_eq!(trades[0].entry_time, "2026-02-02T03:30:01+00:00");
        assert_eq!(trades[0].exit_time, "2026-02-02T05:00:00+00:00");
    }

    #[test]
    fn test_malformed_timestamp_fatal_with_row() {
        let rows = vec![
            raw_row("2026-02-02 03:30:01", "2026-02-02 05:00:00", "long", 200.0),
            raw_row("garbage", "2026-02-02 08:00:00", "short", -50.0),
        ];
        let err = redact_trades(&rows, "sess_x", TradeSource::Backtest, 10000.0).unwrap_err();
        match err {
            IngestError::MalformedTimestamp { row, field, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "entry_time");
            }
            other => panic!("預期 MalformedTimestamp，實際為 {:?}", other),
        }
    }

    #[test]
    fn test_sanitize_live_rounds_pct() {
        let rows = vec![LiveTradeRow {
            entry_time: "2026-02-02 03:30:01".to_string(),
            exit_time: "2026-02-02 05:00:00".to_string(),
            direction: "long".to_string(),
            entry_price: 50000.0,
            exit_price: 50500.0,
            pnl_pct: 1.23456789,
            exit_reason: "take_profit".to_string(),
        }];
        let trades = sanitize_live_trades(&rows, "sess_live").unwrap();
        assert_eq!(trades[0].pnl_pct, 1.2346);
        assert_eq!(trades[0].source, TradeSource::Live);
    }
}
