use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 随机后缀长度
pub const RANDOM_SUFFIX_LEN: usize = 9;

/// 生成随机base36后缀
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// 生成请求关联ID
///
/// 格式: `req_<毫秒时间戳>_<9位base36随机串>`,仅用于日志关联,不持久化。
pub fn generate_request_id() -> String {
    request_id_at(Utc::now())
}

pub fn request_id_at(now: DateTime<Utc>) -> String {
    format!(
        "req_{}_{}",
        now.timestamp_millis(),
        random_suffix(RANDOM_SUFFIX_LEN)
    )
}

/// 导出文件名: `<prefix>-YYYY-MM-DD.json`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.json", prefix, date.format("%Y-%m-%d"))
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 校验年月,月份必须在 1..=12
pub fn validate_year_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}
