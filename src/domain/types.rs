// ==========================================
// 纺织纱线生产分析系统 - 领域类型定义
// ==========================================
// 职责: 定义记录状态等级及其分类规则
// 红线: 阈值比较是唯一的状态规则,不引入评分制
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 记录状态 (Record Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库/报表一致)
// 顺序: Normal < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Normal,   // 正常
    Critical, // 危急(废纱率超阈值)
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Normal => write!(f, "NORMAL"),
            RecordStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl RecordStatus {
    /// 按废纱率阈值分类状态
    ///
    /// 规则: 严格大于阈值为 Critical,恰好等于阈值为 Normal
    ///
    /// # 参数
    /// - `scrap_rate_pct`: 废纱率(百分比)
    /// - `critical_threshold_pct`: 危急阈值(百分比)
    ///
    /// # 返回
    /// RecordStatus
    pub fn classify(scrap_rate_pct: f64, critical_threshold_pct: f64) -> Self {
        if scrap_rate_pct > critical_threshold_pct {
            RecordStatus::Critical
        } else {
            RecordStatus::Normal
        }
    }

    /// 从数据库字符串解析状态
    pub fn from_db_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "CRITICAL" => RecordStatus::Critical,
            _ => RecordStatus::Normal, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecordStatus::Normal => "NORMAL",
            RecordStatus::Critical => "CRITICAL",
        }
    }
}
