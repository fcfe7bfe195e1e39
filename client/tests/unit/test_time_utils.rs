//! 时间与ID工具函数测试

use chrono::NaiveDate;
use satoyama_dogrun::utils::time_utils::{
    export_file_name, generate_request_id, round2, validate_year_month,
};

#[test]
fn test_export_file_name_uses_date() {
    let date = NaiveDate::from_ymd_opt(2026, 4, 5).unwrap();
    assert_eq!(
        export_file_name("dogrun-logs", date),
        "dogrun-logs-2026-04-05.json"
    );
}

#[test]
fn test_round2() {
    assert_eq!(round2(200.0), 200.0);
    assert_eq!(round2(1.005_1), 1.01);
    assert_eq!(round2(333.333_33), 333.33);
}

#[test]
fn test_validate_year_month_rejects_out_of_range() {
    assert!(validate_year_month(2026, 1).is_some());
    assert!(validate_year_month(2026, 12).is_some());
    assert!(validate_year_month(2026, 0).is_none());
    assert!(validate_year_month(2026, 13).is_none());
}

#[test]
fn test_request_id_prefix() {
    assert!(generate_request_id().starts_with("req_"));
}
