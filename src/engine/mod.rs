// ==========================================
// 纺织纱线生产分析系统 - 引擎层
// ==========================================
// 职责: 实现分析计算规则,不拼 SQL
// 红线: 引擎无状态、无副作用,参数显式传入
// ==========================================

pub mod anomaly;
pub mod data_quality;
pub mod machine_summary;
pub mod oee;

// 重导出核心引擎
pub use anomaly::AnomalyEngine;
pub use data_quality::{DataQualityValidator, RecordViolation, ViolationType};
pub use machine_summary::MachineSummaryEngine;
pub use oee::OeeEngine;
