// ==========================================
// 纺织纱线生产分析系统 - OEE 派生引擎
// ==========================================
// 职责: 逐条记录计算可用率/表现率/质量率/OEE/废纱率与状态标签
// 输入: 生产记录序列 + 分析参数
// 输出: 同序同基数的带指标记录序列
// 红线: 纯函数,不修改输入,不触达 SQL
// ==========================================

use crate::config::OeeParameters;
use crate::domain::production::{AnalyzedRecord, DerivedMetrics, ProductionRecord};
use crate::domain::types::RecordStatus;

/// 钳制到闭区间 [0,1]
///
/// 说明: 三个分量比率在相乘前各自独立钳制,
/// 上界下界均为闭边界。
fn clamp_unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}

/// 四舍五入保留 2 位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// OeeEngine - OEE 派生引擎
// ==========================================
pub struct OeeEngine {
    // 无状态引擎,参数由调用方显式传入
}

impl OeeEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 批量派生指标
    ///
    /// 顺序与基数与输入一致,不丢弃也不新增记录。
    /// 对相同输入重复调用产出逐位一致的结果。
    ///
    /// # 参数
    /// - `records`: 生产记录序列(只读)
    /// - `params`: 分析参数
    ///
    /// # 返回
    /// Vec<AnalyzedRecord> 带派生指标的记录序列
    pub fn analyze(
        &self,
        records: &[ProductionRecord],
        params: &OeeParameters,
    ) -> Vec<AnalyzedRecord> {
        records
            .iter()
            .map(|record| AnalyzedRecord {
                record: record.clone(),
                metrics: self.derive(record, params),
            })
            .collect()
    }

    /// 派生单条记录的指标
    ///
    /// # 参数
    /// - `record`: 生产记录
    /// - `params`: 分析参数
    ///
    /// # 返回
    /// DerivedMetrics
    pub fn derive(&self, record: &ProductionRecord, params: &OeeParameters) -> DerivedMetrics {
        // 1. 可用率
        let availability = self.calculate_availability(record.downtime_minutes, params);

        // 2. 表现率
        let performance = self.calculate_performance(record.total_output_kg, params);

        // 3. 质量率(产量为 0 时取 0,见下)
        let quality = self.calculate_quality(record.total_output_kg, record.scrap_kg);

        // 4. OEE = 三分量乘积(分量已各自钳制,乘积必在 [0,1])
        let oee = availability * performance * quality;

        // 5. 废纱率(%),有意不钳制
        let scrap_rate_pct = self.calculate_scrap_rate_pct(record.total_output_kg, record.scrap_kg);

        // 6. 状态标签
        let status = RecordStatus::classify(scrap_rate_pct, params.critical_scrap_threshold_pct);

        DerivedMetrics {
            availability,
            performance,
            quality,
            oee,
            scrap_rate_pct,
            status,
        }
    }

    // ==========================================
    // 分量计算
    // ==========================================

    /// 可用率 = (计划时长 - 停机时长) / 计划时长,钳制 [0,1]
    ///
    /// 停机超过计划时长时为 0,不产生负值。
    fn calculate_availability(&self, downtime_minutes: f64, params: &OeeParameters) -> f64 {
        clamp_unit(
            (params.planned_minutes_per_shift - downtime_minutes)
                / params.planned_minutes_per_shift,
        )
    }

    /// 表现率 = 总产量 / 理论产能,钳制 [0,1]
    ///
    /// 产量超过理论产能时封顶为 1,不出现超过 100% 的比率。
    fn calculate_performance(&self, total_output_kg: f64, params: &OeeParameters) -> f64 {
        clamp_unit(total_output_kg / params.theoretical_capacity_kg)
    }

    /// 质量率 = (总产量 - 废纱量) / 总产量,钳制 [0,1]
    ///
    /// 总产量为 0 时 0/0 无定义,按约定取 0(与分量钳制口径一致),
    /// 不向下游传播除零/NaN。
    fn calculate_quality(&self, total_output_kg: f64, scrap_kg: f64) -> f64 {
        if total_output_kg > 0.0 {
            clamp_unit((total_output_kg - scrap_kg) / total_output_kg)
        } else {
            0.0
        }
    }

    /// 废纱率(%) = 废纱量 / 总产量 x 100,保留 2 位小数
    ///
    /// 不钳制: 废纱量大于总产量时结果超过 100,
    /// 作为数据质量信号原样上报。总产量为 0 时取 0。
    fn calculate_scrap_rate_pct(&self, total_output_kg: f64, scrap_kg: f64) -> f64 {
        if total_output_kg > 0.0 {
            round2(scrap_kg / total_output_kg * 100.0)
        } else {
            0.0
        }
    }
}

impl Default for OeeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit_bounds() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(0.0), 0.0);
        assert_eq!(clamp_unit(0.5), 0.5);
        assert_eq!(clamp_unit(1.0), 1.0);
        assert_eq!(clamp_unit(1.7), 1.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(33.333333), 33.33);
    }
}
