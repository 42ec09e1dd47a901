// ==========================================
// 纺织纱线生产分析系统 - API 层
// ==========================================
// 职责: 业务接口,参数校验与错误转换
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出
pub use dashboard_api::{
    AnalysisFilter, AnomalyReportResponse, ComponentMeans, DailyScrapPoint, DashboardApi,
    FilterOptions, LineOutput, OverviewResponse,
};
pub use error::{ApiError, ApiResult};
