// ==========================================
// DataQualityValidator 校验测试
// ==========================================
// 测试目标: 验证违规检测覆盖与结构化明细(记录 id 可定位)
// ==========================================

use chrono::NaiveDate;
use yarn_oee::domain::production::ProductionRecord;
use yarn_oee::engine::{DataQualityValidator, ViolationType};

// ==========================================
// 测试辅助函数
// ==========================================

fn create_valid_record(id: i64) -> ProductionRecord {
    ProductionRecord {
        id,
        production_line: "LINE-C".to_string(),
        machine_id: "M-301".to_string(),
        shift_hours: 7.5,
        total_output_kg: 1800.0,
        scrap_kg: 36.0,
        downtime_minutes: 15.0,
        record_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
    }
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_valid_record_passes() {
    let validator = DataQualityValidator::new();
    let violations = validator.validate(&[create_valid_record(1)]);
    assert!(violations.is_empty());
}

#[test]
fn test_scrap_exceeds_output() {
    let validator = DataQualityValidator::new();

    let mut record = create_valid_record(7);
    record.total_output_kg = 100.0;
    record.scrap_kg = 150.0;

    let violations = validator.check_record(&record);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].violation_type, ViolationType::ScrapExceedsOutput);
    assert_eq!(violations[0].record_id, 7, "违规必须可定位到记录 id");
    assert_eq!(violations[0].field, "scrap_kg");
}

#[test]
fn test_negative_quantity() {
    let validator = DataQualityValidator::new();

    let mut record = create_valid_record(8);
    record.downtime_minutes = -10.0;

    let violations = validator.check_record(&record);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].violation_type, ViolationType::NegativeQuantity);
    assert_eq!(violations[0].field, "downtime_minutes");
}

#[test]
fn test_non_finite_value() {
    let validator = DataQualityValidator::new();

    let mut record = create_valid_record(9);
    record.total_output_kg = f64::NAN;

    let violations = validator.check_record(&record);
    assert!(violations
        .iter()
        .any(|v| v.violation_type == ViolationType::NonFiniteValue
            && v.field == "total_output_kg"));
}

#[test]
fn test_empty_identifier() {
    let validator = DataQualityValidator::new();

    let mut record = create_valid_record(10);
    record.machine_id = "  ".to_string();

    let violations = validator.check_record(&record);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].violation_type, ViolationType::EmptyIdentifier);
    assert_eq!(violations[0].field, "machine_id");
}

#[test]
fn test_batch_collects_all_violations() {
    let validator = DataQualityValidator::new();

    let mut bad_scrap = create_valid_record(21);
    bad_scrap.scrap_kg = bad_scrap.total_output_kg + 1.0;

    let mut bad_negative = create_valid_record(22);
    bad_negative.shift_hours = -1.0;

    let records = vec![create_valid_record(20), bad_scrap, bad_negative];
    let violations = validator.validate(&records);

    assert_eq!(violations.len(), 2, "应逐条收集全部违规,不提前返回");
    let ids: Vec<i64> = violations.iter().map(|v| v.record_id).collect();
    assert!(ids.contains(&21));
    assert!(ids.contains(&22));
    assert!(!ids.contains(&20));
}
