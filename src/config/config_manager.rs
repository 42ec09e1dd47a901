// ==========================================
// 纺织纱线生产分析系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表加载分析参数覆写
// 存储: config_kv 表 (key-value + scope)
// 说明: 配置缺失或格式错误时回退到默认值并告警,不中断分析
// ==========================================

use crate::config::parameters::OeeParameters;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 为保证连接行为一致,会对传入连接再次应用统一 PRAGMA(幂等)。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值(scope_id='global')
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在(包括 config_kv 表本身不存在)
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        if !crate::db::table_exists(&conn, "config_kv")? {
            return Ok(None);
        }

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 f64 配置,缺失或解析失败时回退默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
                _ => {
                    tracing::warn!(
                        config_key = key,
                        raw_value = %raw,
                        "配置值格式错误,使用默认值 {}",
                        default
                    );
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 加载 OEE 分析参数(含 config_kv 覆写)
    ///
    /// # 返回
    /// - OeeParameters: 覆写合并后的参数
    pub fn load_oee_parameters(&self) -> Result<OeeParameters, Box<dyn Error>> {
        let defaults = OeeParameters::default();

        Ok(OeeParameters {
            planned_minutes_per_shift: self.get_f64_or_default(
                config_keys::PLANNED_MINUTES_PER_SHIFT,
                defaults.planned_minutes_per_shift,
            )?,
            theoretical_capacity_kg: self.get_f64_or_default(
                config_keys::THEORETICAL_CAPACITY_KG,
                defaults.theoretical_capacity_kg,
            )?,
            critical_scrap_threshold_pct: self.get_f64_or_default(
                config_keys::CRITICAL_SCRAP_THRESHOLD_PCT,
                defaults.critical_scrap_threshold_pct,
            )?,
        })
    }

    /// 获取所有配置的快照(JSON 格式)
    ///
    /// # 返回
    /// - Ok(String): 配置快照的 JSON 字符串
    ///
    /// # 用途
    /// - 在生成报表/重建数据库时记录参数快照,便于审计回溯
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        if !crate::db::table_exists(&conn, "config_kv")? {
            return Ok(json!({}).to_string());
        }

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    /// 写入 global scope 配置(UPSERT)
    ///
    /// # 用途
    /// - 种子脚本写入默认参数
    /// - 测试覆写参数
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;

        Ok(())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 分析参数
    pub const PLANNED_MINUTES_PER_SHIFT: &str = "planned_minutes_per_shift";
    pub const THEORETICAL_CAPACITY_KG: &str = "theoretical_capacity_kg";
    pub const CRITICAL_SCRAP_THRESHOLD_PCT: &str = "critical_scrap_threshold_pct";
}
