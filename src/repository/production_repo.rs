// ==========================================
// 纺织纱线生产分析系统 - 生产记录数据仓储
// ==========================================
// 职责: 管理 production_record 表的数据访问
// 红线: Repository 不含业务逻辑,只负责数据访问
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::production::{NewProductionRecord, ProductionRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 建表 SQL
///
/// 说明:
/// - production_record: 生产记录平表,每台机器每班次一行
/// - config_kv: 参数覆写表(scope + key-value)
/// - schema_version: 版本提示表(不做自动迁移)
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS production_record (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    production_line TEXT NOT NULL,
    machine_id TEXT NOT NULL,
    shift_hours REAL NOT NULL,
    total_output_kg REAL NOT NULL,
    scrap_kg REAL NOT NULL,
    downtime_minutes REAL NOT NULL,
    record_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_production_record_machine
    ON production_record (machine_id);
CREATE INDEX IF NOT EXISTS idx_production_record_date
    ON production_record (record_date);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL
);
"#;

// ==========================================
// ProductionRecordRepository - 生产记录仓储
// ==========================================
pub struct ProductionRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRecordRepository {
    /// 创建新的仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 初始化表结构(幂等)
    pub fn init_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    /// 批量插入生产记录
    ///
    /// # 参数
    /// - records: 待插入记录列表(id 由数据库分配)
    ///
    /// # 返回
    /// - Ok(usize): 成功插入的记录数
    ///
    /// # 说明
    /// - 使用事务确保原子性
    pub fn insert_batch(&self, records: &[NewProductionRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        for record in records {
            tx.execute(
                r#"
                INSERT INTO production_record (
                    production_line, machine_id, shift_hours,
                    total_output_kg, scrap_kg, downtime_minutes, record_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.production_line,
                    record.machine_id,
                    record.shift_hours,
                    record.total_output_kg,
                    record.scrap_kg,
                    record.downtime_minutes,
                    record.record_date.to_string(),
                ],
            )?;
            count += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    /// 全量读取生产记录
    ///
    /// # 返回
    /// - Ok(Vec<ProductionRecord>): 按日期、id 升序的记录列表
    ///
    /// # 说明
    /// - 记录表整表读取,日期/产线/机器的筛选由调用方完成
    pub fn fetch_all(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, production_line, machine_id, shift_hours,
                total_output_kg, scrap_kg, downtime_minutes, record_date
            FROM production_record
            ORDER BY record_date ASC, id ASC
            "#,
        )?;

        let records = stmt
            .query_map([], map_production_record_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }

    /// 按 id 查询单条记录
    ///
    /// # 返回
    /// - Ok(Some(ProductionRecord)): 找到记录
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ProductionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, production_line, machine_id, shift_hours,
                total_output_kg, scrap_kg, downtime_minutes, record_date
            FROM production_record
            WHERE id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![id], map_production_record_row);

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 记录总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM production_record", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 记录日期上下界
    ///
    /// # 返回
    /// - Ok(Some((min, max))): 日期上下界
    /// - Ok(None): 表为空
    pub fn date_bounds(&self) -> RepositoryResult<Option<(NaiveDate, NaiveDate)>> {
        let conn = self.get_conn()?;
        let bounds: (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(record_date), MAX(record_date) FROM production_record",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        match bounds {
            (Some(min_s), Some(max_s)) => Ok(Some((parse_date(&min_s), parse_date(&max_s)))),
            _ => Ok(None),
        }
    }

    /// 出现过的生产线列表(去重,升序)
    pub fn distinct_lines(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT production_line FROM production_record ORDER BY production_line ASC",
        )?;

        let lines = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(lines)
    }

    /// 出现过的机器列表(可按生产线过滤,去重,升序)
    ///
    /// # 参数
    /// - production_line: 生产线过滤(None = 全部)
    pub fn distinct_machines(
        &self,
        production_line: Option<&str>,
    ) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;

        let machines = match production_line {
            Some(line) => {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT DISTINCT machine_id FROM production_record
                    WHERE production_line = ?1
                    ORDER BY machine_id ASC
                    "#,
                )?;
                let rows = stmt
                    .query_map(params![line], |row| row.get::<_, String>(0))?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT DISTINCT machine_id FROM production_record ORDER BY machine_id ASC",
                )?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
        };

        Ok(machines)
    }

    /// 清空生产记录表
    ///
    /// # 返回
    /// - Ok(usize): 删除的记录数
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count = conn.execute("DELETE FROM production_record", [])?;
        Ok(count)
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 行映射: production_record -> ProductionRecord
fn map_production_record_row(row: &rusqlite::Row<'_>) -> SqliteResult<ProductionRecord> {
    Ok(ProductionRecord {
        id: row.get(0)?,
        production_line: row.get(1)?,
        machine_id: row.get(2)?,
        shift_hours: row.get(3)?,
        total_output_kg: row.get(4)?,
        scrap_kg: row.get(5)?,
        downtime_minutes: row.get(6)?,
        record_date: parse_date(&row.get::<_, String>(7)?),
    })
}

/// 解析 ISO 日期字符串
fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}
