// ==========================================
// 纺织纱线生产分析系统 - 分析参数
// ==========================================
// 职责: 定义 OEE 计算所需的三个固定参数
// 红线: 参数作为不可变配置值显式传入每次计算,不使用模块级全局量
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认计划工作时长(分钟,8 小时班次)
pub const DEFAULT_PLANNED_MINUTES_PER_SHIFT: f64 = 480.0;

/// 默认理论产能(kg,单机单班理想产量)
pub const DEFAULT_THEORETICAL_CAPACITY_KG: f64 = 2200.0;

/// 默认危急废纱率阈值(%),严格大于该值判为 CRITICAL
pub const DEFAULT_CRITICAL_SCRAP_THRESHOLD_PCT: f64 = 5.0;

// ==========================================
// OeeParameters - OEE 计算参数
// ==========================================
// 生命周期: 单次运行内固定,不在运行中变更
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OeeParameters {
    /// 计划工作时长(分钟),可用率分母
    pub planned_minutes_per_shift: f64,
    /// 理论产能(kg),表现率分母
    pub theoretical_capacity_kg: f64,
    /// 危急废纱率阈值(%)
    pub critical_scrap_threshold_pct: f64,
}

impl Default for OeeParameters {
    fn default() -> Self {
        Self {
            planned_minutes_per_shift: DEFAULT_PLANNED_MINUTES_PER_SHIFT,
            theoretical_capacity_kg: DEFAULT_THEORETICAL_CAPACITY_KG,
            critical_scrap_threshold_pct: DEFAULT_CRITICAL_SCRAP_THRESHOLD_PCT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = OeeParameters::default();
        assert_eq!(params.planned_minutes_per_shift, 480.0);
        assert_eq!(params.theoretical_capacity_kg, 2200.0);
        assert_eq!(params.critical_scrap_threshold_pct, 5.0);
    }
}
