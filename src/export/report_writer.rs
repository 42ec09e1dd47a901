// ==========================================
// 纺织纱线生产分析系统 - 报表导出
// ==========================================
// 职责: 将三张报表(全量记录/异常报告/机器汇总)写出为 CSV 文件
// 说明: CSV 为表格交换格式,工作簿样式/着色由外部报表工具自理
// ==========================================

use std::path::{Path, PathBuf};

use csv::Writer;

use crate::domain::production::{AnalyzedRecord, MachineSummary};
use crate::export::error::ExportResult;

/// 全量记录表头
const ALL_RECORDS_HEADER: &[&str] = &[
    "机器编号",
    "生产线",
    "日期",
    "班次时长(h)",
    "总产量(kg)",
    "废纱量(kg)",
    "废纱率(%)",
    "停机时长(min)",
    "可用率",
    "表现率",
    "质量率",
    "OEE",
    "状态",
];

/// 异常报告表头
const ANOMALY_HEADER: &[&str] = &[
    "机器编号",
    "生产线",
    "日期",
    "总产量(kg)",
    "废纱量(kg)",
    "废纱率(%)",
    "停机时长(min)",
    "OEE",
    "状态",
];

/// 机器汇总表头
const MACHINE_SUMMARY_HEADER: &[&str] = &[
    "机器编号",
    "平均OEE(%)",
    "平均废纱率(%)",
    "总产量(kg)",
    "总废纱量(kg)",
    "总停机时长(min)",
    "记录条数",
    "状态",
];

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub all_records_path: PathBuf,
    pub anomaly_report_path: PathBuf,
    pub machine_summary_path: PathBuf,
    pub record_count: usize,
    pub anomaly_count: usize,
    pub machine_count: usize,
}

// ==========================================
// ReportExporter - 报表导出器
// ==========================================
pub struct ReportExporter {
    output_dir: PathBuf,
}

impl ReportExporter {
    /// 创建新的导出器
    ///
    /// # 参数
    /// - output_dir: 报表输出目录(不存在时自动创建)
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 导出三张报表
    ///
    /// # 参数
    /// - records: 全量带指标记录
    /// - anomalies: 异常子集(已按废纱率降序)
    /// - summaries: 机器汇总行
    ///
    /// # 返回
    /// - Ok(ExportedReport): 写出的文件路径与行数
    pub fn export_all(
        &self,
        records: &[AnalyzedRecord],
        anomalies: &[AnalyzedRecord],
        summaries: &[MachineSummary],
    ) -> ExportResult<ExportedReport> {
        std::fs::create_dir_all(&self.output_dir)?;

        let all_records_path = self.output_dir.join("all_records.csv");
        let anomaly_report_path = self.output_dir.join("anomaly_report.csv");
        let machine_summary_path = self.output_dir.join("machine_summary.csv");

        self.write_all_records(&all_records_path, records)?;
        self.write_anomaly_report(&anomaly_report_path, anomalies)?;
        self.write_machine_summary(&machine_summary_path, summaries)?;

        tracing::info!(
            output_dir = %self.output_dir.display(),
            record_count = records.len(),
            anomaly_count = anomalies.len(),
            machine_count = summaries.len(),
            "报表导出完成"
        );

        Ok(ExportedReport {
            all_records_path,
            anomaly_report_path,
            machine_summary_path,
            record_count: records.len(),
            anomaly_count: anomalies.len(),
            machine_count: summaries.len(),
        })
    }

    /// 写出全量记录表
    fn write_all_records(&self, path: &Path, records: &[AnalyzedRecord]) -> ExportResult<()> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(ALL_RECORDS_HEADER)?;

        for item in records {
            writer.write_record(&[
                item.record.machine_id.clone(),
                item.record.production_line.clone(),
                item.record.record_date.to_string(),
                format!("{:.1}", item.record.shift_hours),
                format!("{:.1}", item.record.total_output_kg),
                format!("{:.1}", item.record.scrap_kg),
                format!("{:.2}", item.metrics.scrap_rate_pct),
                format!("{:.0}", item.record.downtime_minutes),
                format!("{:.4}", item.metrics.availability),
                format!("{:.4}", item.metrics.performance),
                format!("{:.4}", item.metrics.quality),
                format!("{:.4}", item.metrics.oee),
                item.metrics.status.to_db_str().to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// 写出异常报告表
    fn write_anomaly_report(&self, path: &Path, anomalies: &[AnalyzedRecord]) -> ExportResult<()> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(ANOMALY_HEADER)?;

        for item in anomalies {
            writer.write_record(&[
                item.record.machine_id.clone(),
                item.record.production_line.clone(),
                item.record.record_date.to_string(),
                format!("{:.1}", item.record.total_output_kg),
                format!("{:.1}", item.record.scrap_kg),
                format!("{:.2}", item.metrics.scrap_rate_pct),
                format!("{:.0}", item.record.downtime_minutes),
                format!("{:.4}", item.metrics.oee),
                item.metrics.status.to_db_str().to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// 写出机器汇总表
    fn write_machine_summary(&self, path: &Path, summaries: &[MachineSummary]) -> ExportResult<()> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(MACHINE_SUMMARY_HEADER)?;

        for summary in summaries {
            writer.write_record(&[
                summary.machine_id.clone(),
                format!("{:.2}", summary.avg_oee_pct),
                format!("{:.2}", summary.avg_scrap_rate_pct),
                format!("{:.1}", summary.total_output_kg),
                format!("{:.1}", summary.total_scrap_kg),
                format!("{:.0}", summary.total_downtime_minutes),
                summary.record_count.to_string(),
                summary.status.to_db_str().to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}
