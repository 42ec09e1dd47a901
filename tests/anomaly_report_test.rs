// ==========================================
// AnomalyEngine 引擎测试
// ==========================================
// 测试目标: 验证异常子集的过滤、排序与不变量
// ==========================================

use chrono::NaiveDate;
use yarn_oee::config::OeeParameters;
use yarn_oee::domain::production::ProductionRecord;
use yarn_oee::domain::types::RecordStatus;
use yarn_oee::engine::{AnomalyEngine, OeeEngine};

// ==========================================
// 测试辅助函数
// ==========================================

fn create_test_record(id: i64, total_output_kg: f64, scrap_kg: f64) -> ProductionRecord {
    ProductionRecord {
        id,
        production_line: "LINE-B".to_string(),
        machine_id: format!("M-20{}", id % 3 + 1),
        shift_hours: 8.0,
        total_output_kg,
        scrap_kg,
        downtime_minutes: 20.0,
        record_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
    }
}

// ==========================================
// 测试用例 1: 过滤构成穷尽划分
// ==========================================

#[test]
fn test_exhaustive_partition_by_status() {
    let records = vec![
        create_test_record(1, 1000.0, 20.0),  // 2.0%  NORMAL
        create_test_record(2, 1000.0, 80.0),  // 8.0%  CRITICAL
        create_test_record(3, 1000.0, 50.0),  // 5.0%  NORMAL(边界)
        create_test_record(4, 1000.0, 120.0), // 12.0% CRITICAL
    ];

    let params = OeeParameters::default();
    let analyzed = OeeEngine::new().analyze(&records, &params);
    let anomalies = AnomalyEngine::new().extract(&analyzed);

    // 子集不增加记录
    assert!(anomalies.len() <= analyzed.len());
    assert_eq!(anomalies.len(), 2);

    // 子集内全部 CRITICAL
    for item in &anomalies {
        assert_eq!(item.metrics.status, RecordStatus::Critical);
    }

    // 子集外全部 NORMAL
    let anomaly_ids: Vec<i64> = anomalies.iter().map(|item| item.record.id).collect();
    for item in &analyzed {
        if !anomaly_ids.contains(&item.record.id) {
            assert_eq!(item.metrics.status, RecordStatus::Normal);
        }
    }
}

// ==========================================
// 测试用例 2: 按废纱率降序
// ==========================================

#[test]
fn test_sorted_by_scrap_rate_descending() {
    let records = vec![
        create_test_record(1, 1000.0, 70.0),  // 7.0%
        create_test_record(2, 1000.0, 120.0), // 12.0%
        create_test_record(3, 1000.0, 90.0),  // 9.0%
        create_test_record(4, 1000.0, 60.0),  // 6.0%
    ];

    let params = OeeParameters::default();
    let analyzed = OeeEngine::new().analyze(&records, &params);
    let anomalies = AnomalyEngine::new().extract(&analyzed);

    assert_eq!(anomalies.len(), 4);
    for pair in anomalies.windows(2) {
        assert!(
            pair[0].metrics.scrap_rate_pct >= pair[1].metrics.scrap_rate_pct,
            "相邻元素必须非递增"
        );
    }
    assert_eq!(anomalies[0].record.id, 2, "废纱率最高的记录排在首位");
}

// ==========================================
// 测试用例 3: 空结果合法且输入不被修改
// ==========================================

#[test]
fn test_empty_result_is_valid() {
    let records = vec![
        create_test_record(1, 1000.0, 10.0),
        create_test_record(2, 1000.0, 20.0),
    ];

    let params = OeeParameters::default();
    let analyzed = OeeEngine::new().analyze(&records, &params);
    let before = analyzed.clone();

    let anomalies = AnomalyEngine::new().extract(&analyzed);

    // 无 CRITICAL 记录: 空集合,而不是错误
    assert!(anomalies.is_empty());
    // 输入不被修改
    assert_eq!(analyzed, before);
}
