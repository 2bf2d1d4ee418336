// rounding.rs
//
// 持久化記錄使用的統一捨入規則：
// 餘額與美元金額保留 2 位小數，百分比與統計值保留 4 位小數。

/// 捨入到指定小數位
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}

/// 餘額 / 美元金額捨入（2 位小數）
pub fn round_balance(value: f64) -> f64 {
    round_dp(value, 2)
}

/// 百分比 / 統計值捨入（4 位小數）
pub fn round_pct(value: f64) -> f64 {
    round_dp(value, 4)
}
