// ==========================================
// 演示数据生成端到端测试
// ==========================================
// 测试目标: 验证重建+填充后的数据库可直接完成一次完整分析
// 环境: tempfile 临时 SQLite 数据库
// ==========================================

use std::sync::Arc;

use yarn_oee::api::{AnalysisFilter, DashboardApi};
use yarn_oee::config::{ConfigManager, OeeParameters};
use yarn_oee::repository::ProductionRecordRepository;
use yarn_oee::seed;

#[test]
fn test_reset_and_seed_then_analyze() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let db_path = dir.path().join("seed_test.db").to_str().unwrap().to_string();

    let summary = seed::reset_and_seed(&db_path, 50).expect("生成演示数据失败");
    assert_eq!(summary.record_count, 50);

    let repo = Arc::new(ProductionRecordRepository::new(&db_path).unwrap());
    assert_eq!(repo.count().unwrap(), 50);

    // 默认参数已写入 config_kv
    let config = ConfigManager::new(&db_path).unwrap();
    let params = config.load_oee_parameters().unwrap();
    assert_eq!(params, OeeParameters::default());

    // 合成数据必须通过数据质量校验并完成整轮分析
    let api = DashboardApi::new(repo, params);
    let filter = AnalysisFilter::unrestricted();

    let overview = api.get_overview(&filter).expect("合成数据应通过校验");
    assert_eq!(overview.record_count, 50);
    assert!(overview.total_output_kg > 0.0);

    let summaries = api.get_machine_summaries(&filter).unwrap();
    assert!(!summaries.is_empty());
    let total: usize = summaries.iter().map(|s| s.record_count).sum();
    assert_eq!(total, 50, "汇总条数之和等于记录总数");

    // 异常报告有序
    let report = api.get_anomaly_report(&filter).unwrap();
    for pair in report.records.windows(2) {
        assert!(pair[0].metrics.scrap_rate_pct >= pair[1].metrics.scrap_rate_pct);
    }
}

#[test]
fn test_reseed_backs_up_existing_db() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let db_path = dir.path().join("reseed_test.db").to_str().unwrap().to_string();

    seed::reset_and_seed(&db_path, 20).unwrap();
    seed::reset_and_seed(&db_path, 30).unwrap();

    let repo = ProductionRecordRepository::new(&db_path).unwrap();
    assert_eq!(repo.count().unwrap(), 30, "重建后只包含新一轮数据");

    // 上一轮数据库已备份(.bak.*)
    let backups: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".bak."))
        .collect();
    assert!(!backups.is_empty());
}
