// ==========================================
// 纺织纱线生产分析系统 - 批处理入口
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 生产效率决策支持
// 用法: yarn-oee [报表导出目录]
// ==========================================

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use yarn_oee::api::{AnalysisFilter, DashboardApi};
use yarn_oee::config::ConfigManager;
use yarn_oee::db;
use yarn_oee::export::ReportExporter;
use yarn_oee::repository::ProductionRecordRepository;
use yarn_oee::{logging, seed};

fn main() -> Result<(), Box<dyn Error>> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 生产效率决策支持", yarn_oee::APP_NAME);
    tracing::info!("系统版本: {}", yarn_oee::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = db::default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 数据库缺失时生成演示数据
    if !Path::new(&db_path).exists() {
        tracing::info!("数据库不存在,正在生成演示数据...");
        let summary = seed::reset_and_seed(&db_path, seed::DEFAULT_RECORD_COUNT)?;
        tracing::info!("演示数据生成完成: {} 行", summary.record_count);
    }

    // schema 版本提示(不做自动迁移)
    {
        let conn = db::open_sqlite_connection(&db_path)?;
        match db::read_schema_version(&conn)? {
            Some(v) if v != db::CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    found = v,
                    expected = db::CURRENT_SCHEMA_VERSION,
                    "schema_version 与当前代码不一致,请确认数据库来源"
                );
            }
            None => tracing::warn!("缺少 schema_version 表,可能是旧版数据库"),
            _ => {}
        }
    }

    // 装配仓储 + 配置 + API
    let repo = Arc::new(ProductionRecordRepository::new(&db_path)?);
    let config = ConfigManager::new(&db_path).map_err(|e| format!("配置加载失败: {}", e))?;
    let params = config
        .load_oee_parameters()
        .map_err(|e| format!("参数加载失败: {}", e))?;
    let api = DashboardApi::new(repo, params);

    let filter = AnalysisFilter::unrestricted();

    // KPI 总览
    let overview = api.get_overview(&filter)?;
    println!();
    println!("=== KPI 总览 ===");
    println!("记录条数    : {}", overview.record_count);
    println!("总产量      : {:.1} kg", overview.total_output_kg);
    println!("平均废纱率  : {:.2} %", overview.avg_scrap_rate_pct);
    println!("平均 OEE    : {:.2} %", overview.avg_oee_pct);
    println!("危急记录数  : {}", overview.critical_count);
    println!("总停机时长  : {:.0} min", overview.total_downtime_minutes);

    // 机器汇总
    let summaries = api.get_machine_summaries(&filter)?;
    println!();
    println!("=== 机器汇总 ===");
    println!(
        "{:<8} {:>10} {:>12} {:>12} {:>10} {:>12} {:>6} {:>10}",
        "机器", "OEE(%)", "废纱率(%)", "产量(kg)", "废纱(kg)", "停机(min)", "条数", "状态"
    );
    for s in &summaries {
        println!(
            "{:<8} {:>10.2} {:>12.2} {:>12.1} {:>10.1} {:>12.0} {:>6} {:>10}",
            s.machine_id,
            s.avg_oee_pct,
            s.avg_scrap_rate_pct,
            s.total_output_kg,
            s.total_scrap_kg,
            s.total_downtime_minutes,
            s.record_count,
            s.status
        );
    }

    // 异常报告
    let anomaly = api.get_anomaly_report(&filter)?;
    println!();
    println!("=== 异常报告 ({} 条) ===", anomaly.record_count);
    println!(
        "{:<8} {:<8} {:<12} {:>12} {:>10} {:>10} {:>8}",
        "机器", "生产线", "日期", "产量(kg)", "废纱(kg)", "废纱率(%)", "OEE"
    );
    for item in &anomaly.records {
        println!(
            "{:<8} {:<8} {:<12} {:>12.1} {:>10.1} {:>10.2} {:>8.4}",
            item.record.machine_id,
            item.record.production_line,
            item.record.record_date,
            item.record.total_output_kg,
            item.record.scrap_kg,
            item.metrics.scrap_rate_pct,
            item.metrics.oee
        );
    }

    // 可选: 报表导出
    if let Some(export_dir) = std::env::args().nth(1) {
        let records = api.list_analyzed_records(&filter)?;
        let exporter = ReportExporter::new(&export_dir);
        let report = exporter.export_all(&records, &anomaly.records, &summaries)?;
        println!();
        println!("=== 报表导出 ===");
        println!("全量记录 : {}", report.all_records_path.display());
        println!("异常报告 : {}", report.anomaly_report_path.display());
        println!("机器汇总 : {}", report.machine_summary_path.display());
    }

    Ok(())
}
