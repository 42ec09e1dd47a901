// ==========================================
// 纺织纱线生产分析系统 - 机器汇总引擎
// ==========================================
// 职责: 按机器编号分组,计算平均 OEE/平均废纱率与各项合计
// 输入: 带指标的记录序列 + 分析参数
// 输出: 机器汇总行(按机器编号升序)
// 红线: 只汇总输入中实际出现的机器,不依赖静态机器台账
// ==========================================

use crate::config::OeeParameters;
use crate::domain::production::{AnalyzedRecord, MachineSummary};
use crate::domain::types::RecordStatus;
use std::collections::BTreeMap;

/// 分组累加器
#[derive(Debug, Default)]
struct GroupAccumulator {
    oee_sum: f64,
    scrap_rate_sum: f64,
    output_sum: f64,
    scrap_sum: f64,
    downtime_sum: f64,
    count: usize,
}

// ==========================================
// MachineSummaryEngine - 机器汇总引擎
// ==========================================
pub struct MachineSummaryEngine {
    // 无状态引擎
}

impl MachineSummaryEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 生成机器汇总
    ///
    /// 分组键为 machine_id 的精确字符串匹配;
    /// 汇总状态按分组平均废纱率套用与单条记录相同的阈值规则,
    /// 因此机器可能均值 NORMAL 而包含 CRITICAL 记录(预期行为,不做调和)。
    ///
    /// # 参数
    /// - `records`: 带指标的记录序列
    /// - `params`: 分析参数(阈值)
    ///
    /// # 返回
    /// Vec<MachineSummary> 按 machine_id 升序
    pub fn summarize(
        &self,
        records: &[AnalyzedRecord],
        params: &OeeParameters,
    ) -> Vec<MachineSummary> {
        // BTreeMap 保证输出按机器编号升序,结果确定性排序
        let mut groups: BTreeMap<&str, GroupAccumulator> = BTreeMap::new();

        for item in records {
            let acc = groups
                .entry(item.record.machine_id.as_str())
                .or_default();
            acc.oee_sum += item.metrics.oee;
            acc.scrap_rate_sum += item.metrics.scrap_rate_pct;
            acc.output_sum += item.record.total_output_kg;
            acc.scrap_sum += item.record.scrap_kg;
            acc.downtime_sum += item.record.downtime_minutes;
            acc.count += 1;
        }

        groups
            .into_iter()
            .map(|(machine_id, acc)| {
                let n = acc.count as f64;
                let avg_oee_pct = round2(acc.oee_sum / n * 100.0);
                let avg_scrap_rate_pct = round2(acc.scrap_rate_sum / n);

                MachineSummary {
                    machine_id: machine_id.to_string(),
                    avg_oee_pct,
                    avg_scrap_rate_pct,
                    total_output_kg: acc.output_sum,
                    total_scrap_kg: acc.scrap_sum,
                    total_downtime_minutes: acc.downtime_sum,
                    record_count: acc.count,
                    status: RecordStatus::classify(
                        avg_scrap_rate_pct,
                        params.critical_scrap_threshold_pct,
                    ),
                }
            })
            .collect()
    }
}

impl Default for MachineSummaryEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 四舍五入保留 2 位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
