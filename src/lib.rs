// ==========================================
// 纺织纱线生产分析系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 生产效率决策支持 (OEE 分析)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分析计算规则
pub mod engine;

// 配置层 - 分析参数
pub mod config;

// 数据库基础设施(连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 导出层 - 报表写出
pub mod export;

// 演示数据生成
pub mod seed;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::RecordStatus;

// 领域实体
pub use domain::{
    AnalyzedRecord, DerivedMetrics, MachineSummary, NewProductionRecord, ProductionRecord,
};

// 引擎
pub use engine::{AnomalyEngine, DataQualityValidator, MachineSummaryEngine, OeeEngine};

// 配置
pub use config::{ConfigManager, OeeParameters};

// API
pub use api::{AnalysisFilter, DashboardApi};

// 导出
pub use export::ReportExporter;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "纺织纱线生产分析系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
