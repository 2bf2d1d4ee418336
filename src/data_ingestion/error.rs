use std::path::PathBuf;
use thiserror::Error;

/// 數據攝取錯誤
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("找不到必要輸入文件: {path}")]
    MissingInput { path: PathBuf },

    #[error("在 {folder} 中找不到摘要文檔（嘗試過: {candidates:?}）")]
    SummaryNotFound {
        folder: PathBuf,
        candidates: Vec<String>,
    },

    #[error("文件 {file} 缺少必要列: {missing:?}")]
    SchemaMismatch { file: String, missing: Vec<String> },

    #[error("文件 {file} 第 {line} 行數據格式錯誤: {message}")]
    MalformedValue {
        file: String,
        line: u64,
        message: String,
    },

    #[error("第 {row} 筆交易的 {field} 不是有效時間戳: {value}")]
    MalformedTimestamp {
        row: usize,
        field: String,
        value: String,
    },

    #[error("讀取 {file} 失敗")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("解析 {file} 失敗")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type IngestResult<T> = Result<T, IngestError>;
