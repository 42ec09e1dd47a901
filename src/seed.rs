// ==========================================
// 纺织纱线生产分析系统 - 演示数据生成器
// ==========================================
// 职责: 重建数据库并生成贴近实际的合成生产记录
// 说明: 指定若干"问题机器"(低产量/高废纱/多停机),
//       便于演示异常报告与机器汇总的状态分化
// ==========================================

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDate};
use rand::Rng;

use crate::config::{config_keys, ConfigManager, OeeParameters};
use crate::db::{open_sqlite_connection, CURRENT_SCHEMA_VERSION};
use crate::domain::production::NewProductionRecord;
use crate::repository::production_repo::ProductionRecordRepository;

/// 默认生成记录条数
pub const DEFAULT_RECORD_COUNT: usize = 100;

/// 日期跨度(天),从起始日期起均匀分布
const SEED_DATE_SPAN_DAYS: i64 = 90;

/// 生产线与所属机器
const LINE_MACHINES: &[(&str, &[&str])] = &[
    ("LINE-A", &["M-101", "M-102", "M-103", "M-104"]),
    ("LINE-B", &["M-201", "M-202", "M-203"]),
    ("LINE-C", &["M-301", "M-302", "M-303"]),
];

/// 问题机器集合(演示用)
const PROBLEM_MACHINES: &[&str] = &["M-102", "M-203", "M-302"];

/// 生成结果
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub db_path: String,
    pub record_count: usize,
}

/// 生成合成生产记录
///
/// # 参数
/// - count: 记录条数
///
/// # 返回
/// Vec<NewProductionRecord>
pub fn generate_records(count: usize) -> Vec<NewProductionRecord> {
    let mut rng = rand::thread_rng();
    let base_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();

    (0..count).map(|_| generate_record(&mut rng, base_date)).collect()
}

/// 生成单条记录
fn generate_record(rng: &mut impl Rng, base_date: NaiveDate) -> NewProductionRecord {
    let (line, machines) = LINE_MACHINES[rng.gen_range(0..LINE_MACHINES.len())];
    let machine = machines[rng.gen_range(0..machines.len())];
    let record_date = base_date + Duration::days(rng.gen_range(0..SEED_DATE_SPAN_DAYS));

    let is_problem = PROBLEM_MACHINES.contains(&machine);

    let (shift_hours, total_output_kg, scrap_ratio, downtime_minutes) = if is_problem {
        // 问题机器: 低产量、高废纱(4%-12%)、多停机
        (
            round1(rng.gen_range(6.0..8.0)),
            round1(rng.gen_range(800.0..1400.0)),
            rng.gen_range(0.04..0.12),
            rng.gen_range(30.0_f64..180.0).round(),
        )
    } else {
        // 正常机器: 高产量、低废纱(1%-4%)、少停机
        (
            round1(rng.gen_range(7.5..8.0)),
            round1(rng.gen_range(1400.0..2200.0)),
            rng.gen_range(0.01..0.04),
            rng.gen_range(0.0_f64..30.0).round(),
        )
    };

    NewProductionRecord {
        production_line: line.to_string(),
        machine_id: machine.to_string(),
        shift_hours,
        total_output_kg,
        scrap_kg: round1(total_output_kg * scrap_ratio),
        downtime_minutes,
        record_date,
    }
}

/// 重建并填充演示数据库
///
/// 步骤:
/// 1. 既有数据库备份后删除
/// 2. 建表
/// 3. 写入 schema_version 与默认分析参数
/// 4. 批量插入合成记录
///
/// # 参数
/// - db_path: 数据库文件路径
/// - record_count: 生成记录条数
///
/// # 返回
/// - Ok(SeedSummary): 生成结果
pub fn reset_and_seed(db_path: &str, record_count: usize) -> anyhow::Result<SeedSummary> {
    backup_and_reset_db(db_path)?;

    let conn = open_sqlite_connection(db_path)?;
    let conn = Arc::new(Mutex::new(conn));

    let repo = ProductionRecordRepository::from_connection(conn.clone());
    repo.init_schema()?;

    // schema_version(用于启动时版本提示)
    {
        let guard = conn
            .lock()
            .map_err(|e| anyhow::anyhow!("锁获取失败: {}", e))?;
        guard.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![
                CURRENT_SCHEMA_VERSION,
                Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
            ],
        )?;
    }

    // 默认分析参数写入 config_kv(global scope)
    let config = ConfigManager::from_connection(conn.clone())
        .map_err(|e| anyhow::anyhow!("配置管理器初始化失败: {}", e))?;
    let defaults = OeeParameters::default();
    let entries = [
        (
            config_keys::PLANNED_MINUTES_PER_SHIFT,
            defaults.planned_minutes_per_shift.to_string(),
        ),
        (
            config_keys::THEORETICAL_CAPACITY_KG,
            defaults.theoretical_capacity_kg.to_string(),
        ),
        (
            config_keys::CRITICAL_SCRAP_THRESHOLD_PCT,
            defaults.critical_scrap_threshold_pct.to_string(),
        ),
    ];
    for (key, value) in entries {
        config
            .set_global_config_value(key, &value)
            .map_err(|e| anyhow::anyhow!("配置写入失败 ({}): {}", key, e))?;
    }

    let records = generate_records(record_count);
    let inserted = repo.insert_batch(&records)?;

    tracing::info!(db_path, inserted, "演示数据库生成完成");

    Ok(SeedSummary {
        db_path: db_path.to_string(),
        record_count: inserted,
    })
}

/// 既有数据库备份后删除
fn backup_and_reset_db(db_path: &str) -> anyhow::Result<()> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    tracing::info!(from = db_path, to = %backup_path, "既有数据库已备份");
    Ok(())
}

/// 四舍五入保留 1 位小数
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_records_shape() {
        let records = generate_records(50);
        assert_eq!(records.len(), 50);

        for record in &records {
            assert!(!record.production_line.is_empty());
            assert!(!record.machine_id.is_empty());
            assert!(record.total_output_kg >= 0.0);
            // 合成数据不会出现废纱量超过总产量
            assert!(record.scrap_kg <= record.total_output_kg);
            assert!(record.downtime_minutes >= 0.0);
        }
    }

    #[test]
    fn test_generate_records_machine_belongs_to_line() {
        let records = generate_records(100);
        for record in &records {
            let machines = LINE_MACHINES
                .iter()
                .find(|(line, _)| *line == record.production_line)
                .map(|(_, machines)| *machines)
                .unwrap_or(&[]);
            assert!(machines.contains(&record.machine_id.as_str()));
        }
    }
}
