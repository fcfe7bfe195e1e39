use serde::{Deserialize, Serialize};

/// 扫描入口二维码
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub qr_code: String,
}

/// 扫码结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub valid: bool,
    #[serde(default)]
    pub facility: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 入园请求,携带本次同行的犬只
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnterRequest {
    pub dog_ids: Vec<i64>,
}

/// 入园/离园记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: i64,
    #[serde(default)]
    pub dog_ids: Vec<i64>,
    #[serde(default)]
    pub entered_at: Option<String>,
    #[serde(default)]
    pub exited_at: Option<String>,
}
