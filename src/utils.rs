// 通用工具模組
pub mod rounding;
pub mod time_utils;
