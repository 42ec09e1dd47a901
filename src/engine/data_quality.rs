// ==========================================
// 纺织纱线生产分析系统 - 数据质量校验
// ==========================================
// 职责: 在摄入边界检查记录合法性,输出结构化违规明细
// 红线: 违规必须带记录 id 与显式原因,不做静默丢弃
// 说明: 派生引擎对类型良好的输入是全函数,校验失败与否由调用方决策
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::production::ProductionRecord;

// ==========================================
// 违规类型 (Violation Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    NegativeQuantity,   // 数量为负
    ScrapExceedsOutput, // 废纱量超过总产量
    NonFiniteValue,     // 非有限数值(NaN/无穷)
    EmptyIdentifier,    // 标识字段为空
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationType::NegativeQuantity => write!(f, "NEGATIVE_QUANTITY"),
            ViolationType::ScrapExceedsOutput => write!(f, "SCRAP_EXCEEDS_OUTPUT"),
            ViolationType::NonFiniteValue => write!(f, "NON_FINITE_VALUE"),
            ViolationType::EmptyIdentifier => write!(f, "EMPTY_IDENTIFIER"),
        }
    }
}

// ==========================================
// 违规明细
// ==========================================

/// 校验违规明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordViolation {
    /// 违规类型
    pub violation_type: ViolationType,
    /// 记录 id
    pub record_id: i64,
    /// 违规字段
    pub field: String,
    /// 违规原因
    pub reason: String,
}

// ==========================================
// DataQualityValidator - 数据质量校验器
// ==========================================
pub struct DataQualityValidator {
    // 无状态校验器
}

impl DataQualityValidator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 校验整个记录集
    ///
    /// # 参数
    /// - `records`: 生产记录序列
    ///
    /// # 返回
    /// Vec<RecordViolation> 全部违规明细(空 = 通过)
    pub fn validate(&self, records: &[ProductionRecord]) -> Vec<RecordViolation> {
        records
            .iter()
            .flat_map(|record| self.check_record(record))
            .collect()
    }

    /// 校验单条记录
    ///
    /// 检查项:
    /// - 数值字段非有限(NaN/无穷)
    /// - 数量字段为负
    /// - 废纱量 > 总产量(上游不保证,此处必须拦截)
    /// - production_line / machine_id 为空
    pub fn check_record(&self, record: &ProductionRecord) -> Vec<RecordViolation> {
        let mut violations = Vec::new();

        let numeric_fields: [(&str, f64); 4] = [
            ("shift_hours", record.shift_hours),
            ("total_output_kg", record.total_output_kg),
            ("scrap_kg", record.scrap_kg),
            ("downtime_minutes", record.downtime_minutes),
        ];

        for (field, value) in numeric_fields {
            if !value.is_finite() {
                violations.push(RecordViolation {
                    violation_type: ViolationType::NonFiniteValue,
                    record_id: record.id,
                    field: field.to_string(),
                    reason: format!("{} 非有限数值: {}", field, value),
                });
            } else if value < 0.0 {
                violations.push(RecordViolation {
                    violation_type: ViolationType::NegativeQuantity,
                    record_id: record.id,
                    field: field.to_string(),
                    reason: format!("{} 不能为负: {}", field, value),
                });
            }
        }

        if record.scrap_kg.is_finite()
            && record.total_output_kg.is_finite()
            && record.scrap_kg > record.total_output_kg
        {
            violations.push(RecordViolation {
                violation_type: ViolationType::ScrapExceedsOutput,
                record_id: record.id,
                field: "scrap_kg".to_string(),
                reason: format!(
                    "废纱量 {} 超过总产量 {}",
                    record.scrap_kg, record.total_output_kg
                ),
            });
        }

        if record.production_line.trim().is_empty() {
            violations.push(RecordViolation {
                violation_type: ViolationType::EmptyIdentifier,
                record_id: record.id,
                field: "production_line".to_string(),
                reason: "生产线标识不能为空".to_string(),
            });
        }

        if record.machine_id.trim().is_empty() {
            violations.push(RecordViolation {
                violation_type: ViolationType::EmptyIdentifier,
                record_id: record.id,
                field: "machine_id".to_string(),
                reason: "机器编号不能为空".to_string(),
            });
        }

        violations
    }
}

impl Default for DataQualityValidator {
    fn default() -> Self {
        Self::new()
    }
}
