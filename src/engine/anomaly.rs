// ==========================================
// 纺织纱线生产分析系统 - 异常提取引擎
// ==========================================
// 职责: 过滤出 CRITICAL 记录并按废纱率降序排列
// 输入: 带指标的记录序列
// 输出: 异常子集(空集合为合法结果,区别于"无数据")
// 红线: 纯过滤 + 排序,不修改输入
// ==========================================

use crate::domain::production::AnalyzedRecord;
use crate::domain::types::RecordStatus;

// ==========================================
// AnomalyEngine - 异常提取引擎
// ==========================================
pub struct AnomalyEngine {
    // 无状态引擎
}

impl AnomalyEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 提取异常记录
    ///
    /// 结果是输入的子集: 每个元素 status 均为 CRITICAL,
    /// 按 scrap_rate_pct 降序(稳定排序,同值保持输入相对顺序)。
    ///
    /// # 参数
    /// - `records`: 带指标的记录序列
    ///
    /// # 返回
    /// Vec<AnalyzedRecord> 异常子集
    pub fn extract(&self, records: &[AnalyzedRecord]) -> Vec<AnalyzedRecord> {
        let mut critical: Vec<AnalyzedRecord> = records
            .iter()
            .filter(|item| item.metrics.status == RecordStatus::Critical)
            .cloned()
            .collect();

        // total_cmp 给出 f64 全序,降序排列
        critical.sort_by(|a, b| b.metrics.scrap_rate_pct.total_cmp(&a.metrics.scrap_rate_pct));

        critical
    }
}

impl Default for AnomalyEngine {
    fn default() -> Self {
        Self::new()
    }
}
