// ==========================================
// 纺织纱线生产分析系统 - 生产领域模型
// ==========================================
// 职责: 定义生产记录及其派生指标的数据结构
// 红线: ProductionRecord 为只读输入,派生指标永不回写原始记录
// ==========================================

use crate::domain::types::RecordStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionRecord - 生产记录
// ==========================================
// 用途: 每台机器每个班次一条观测记录
// 对齐: production_record 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    // ===== 主键 =====
    pub id: i64, // 记录唯一标识(自增,不可变)

    // ===== 产线与机器 =====
    pub production_line: String, // 生产线标识(如 LINE-A,非空,小型开放集合)
    pub machine_id: String,      // 机器编号(如 M-101,非空)

    // ===== 班次观测值 =====
    pub shift_hours: f64,      // 班次时长(小时,>=0)
    pub total_output_kg: f64,  // 总产量(kg,>=0,允许为 0)
    pub scrap_kg: f64,         // 废纱量(kg,上游不保证 <= 总产量)
    pub downtime_minutes: f64, // 停机时长(分钟,>=0)

    // ===== 时间 =====
    pub record_date: NaiveDate, // 记录日期
}

// ==========================================
// DerivedMetrics - 派生效率指标
// ==========================================
// 用途: 引擎计算输出,始终由原始记录与参数重算
// 不变量: availability/performance/quality/oee 均在 [0,1] 区间
// 说明: scrap_rate_pct 有意不钳制,超过 100 即数据质量信号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub availability: f64,   // 可用率 = (计划时长-停机时长)/计划时长,钳制 [0,1]
    pub performance: f64,    // 表现率 = 总产量/理论产能,钳制 [0,1]
    pub quality: f64,        // 质量率 = (总产量-废纱量)/总产量,钳制 [0,1];产量为 0 时取 0
    pub oee: f64,            // OEE = 可用率 x 表现率 x 质量率
    pub scrap_rate_pct: f64, // 废纱率(%) = 废纱量/总产量 x 100,保留 2 位小数;产量为 0 时取 0
    pub status: RecordStatus, // 状态标签(阈值分类)
}

// ==========================================
// AnalyzedRecord - 带指标的生产记录
// ==========================================
// 用途: 指标派生的输出单元,顺序与基数同输入一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedRecord {
    #[serde(flatten)]
    pub record: ProductionRecord,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

// ==========================================
// NewProductionRecord - 待插入生产记录
// ==========================================
// 用途: 种子生成与批量导入的中间结构,id 由数据库自增分配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProductionRecord {
    pub production_line: String,
    pub machine_id: String,
    pub shift_hours: f64,
    pub total_output_kg: f64,
    pub scrap_kg: f64,
    pub downtime_minutes: f64,
    pub record_date: NaiveDate,
}

// ==========================================
// MachineSummary - 机器汇总
// ==========================================
// 用途: 按机器编号分组的汇总行,仅来自过滤后实际存在的机器
// 说明: 状态按分组平均废纱率套用同一阈值规则,
//       机器可能均值为 NORMAL 而包含 CRITICAL 记录,属预期行为
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSummary {
    pub machine_id: String,          // 机器编号
    pub avg_oee_pct: f64,            // 平均 OEE(%,保留 2 位小数)
    pub avg_scrap_rate_pct: f64,     // 平均废纱率(%,保留 2 位小数)
    pub total_output_kg: f64,        // 总产量(kg)
    pub total_scrap_kg: f64,         // 总废纱量(kg)
    pub total_downtime_minutes: f64, // 总停机时长(分钟)
    pub record_count: usize,         // 记录条数
    pub status: RecordStatus,        // 状态(按平均废纱率分类)
}
