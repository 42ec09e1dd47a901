// ==========================================
// ProductionRecordRepository 仓储集成测试
// ==========================================
// 测试目标: 验证建表、批量插入与各类查询
// 环境: tempfile 临时 SQLite 数据库
// ==========================================

use chrono::NaiveDate;
use yarn_oee::domain::production::NewProductionRecord;
use yarn_oee::repository::ProductionRecordRepository;

// ==========================================
// 测试辅助函数
// ==========================================

fn create_test_repo() -> (tempfile::TempDir, ProductionRecordRepository) {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let db_path = dir.path().join("test.db");
    let repo = ProductionRecordRepository::new(db_path.to_str().unwrap())
        .expect("创建仓储失败");
    repo.init_schema().expect("建表失败");
    (dir, repo)
}

fn new_record(
    line: &str,
    machine: &str,
    output: f64,
    scrap: f64,
    date: (i32, u32, u32),
) -> NewProductionRecord {
    NewProductionRecord {
        production_line: line.to_string(),
        machine_id: machine.to_string(),
        shift_hours: 8.0,
        total_output_kg: output,
        scrap_kg: scrap,
        downtime_minutes: 30.0,
        record_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
    }
}

fn seed_three(repo: &ProductionRecordRepository) {
    let records = vec![
        new_record("LINE-A", "M-102", 1200.0, 60.0, (2025, 1, 15)),
        new_record("LINE-A", "M-101", 2000.0, 40.0, (2025, 1, 10)),
        new_record("LINE-B", "M-201", 1800.0, 36.0, (2025, 2, 1)),
    ];
    let inserted = repo.insert_batch(&records).expect("批量插入失败");
    assert_eq!(inserted, 3);
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_insert_and_fetch_all_ordering() {
    let (_dir, repo) = create_test_repo();
    seed_three(&repo);

    let records = repo.fetch_all().expect("整表读取失败");
    assert_eq!(records.len(), 3);

    // 按日期升序返回
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.record_date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    // id 由数据库分配且唯一
    let mut ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_find_by_id() {
    let (_dir, repo) = create_test_repo();
    seed_three(&repo);

    let all = repo.fetch_all().unwrap();
    let target = &all[0];

    let found = repo.find_by_id(target.id).expect("查询失败");
    assert_eq!(found.as_ref(), Some(target));

    let missing = repo.find_by_id(99_999).expect("查询失败");
    assert!(missing.is_none());
}

#[test]
fn test_count_and_date_bounds() {
    let (_dir, repo) = create_test_repo();

    // 空表
    assert_eq!(repo.count().unwrap(), 0);
    assert!(repo.date_bounds().unwrap().is_none());

    seed_three(&repo);
    assert_eq!(repo.count().unwrap(), 3);

    let (min, max) = repo.date_bounds().unwrap().expect("应有日期上下界");
    assert_eq!(min, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    assert_eq!(max, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
}

#[test]
fn test_distinct_lines_and_machines() {
    let (_dir, repo) = create_test_repo();
    seed_three(&repo);

    let lines = repo.distinct_lines().unwrap();
    assert_eq!(lines, vec!["LINE-A".to_string(), "LINE-B".to_string()]);

    let all_machines = repo.distinct_machines(None).unwrap();
    assert_eq!(
        all_machines,
        vec!["M-101".to_string(), "M-102".to_string(), "M-201".to_string()]
    );

    let line_a_machines = repo.distinct_machines(Some("LINE-A")).unwrap();
    assert_eq!(line_a_machines, vec!["M-101".to_string(), "M-102".to_string()]);

    let unknown = repo.distinct_machines(Some("LINE-X")).unwrap();
    assert!(unknown.is_empty());
}

#[test]
fn test_delete_all() {
    let (_dir, repo) = create_test_repo();
    seed_three(&repo);

    let deleted = repo.delete_all().unwrap();
    assert_eq!(deleted, 3);
    assert_eq!(repo.count().unwrap(), 0);
    assert!(repo.fetch_all().unwrap().is_empty());
}
