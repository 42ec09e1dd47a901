// ==========================================
// 纺织纱线生产分析系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,不含业务规则
// ==========================================

pub mod production;
pub mod types;

// 重导出
pub use production::{
    AnalyzedRecord, DerivedMetrics, MachineSummary, NewProductionRecord, ProductionRecord,
};
pub use types::RecordStatus;
