// ==========================================
// 纺织纱线生产分析系统 - 驾驶舱 API
// ==========================================
// 职责: 封装分析引擎,提供驾驶舱聚合查询
// 架构: API 层 → 引擎层(纯计算) / 仓储层(数据访问)
// 说明: 全量分析结果带时效窗口缓存;所有查询在缓存基础上
//       按调用方筛选条件重新过滤、重新聚合,核心计算本身无隐藏状态
// ==========================================

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::OeeParameters;
use crate::domain::production::{AnalyzedRecord, MachineSummary, ProductionRecord};
use crate::domain::types::RecordStatus;
use crate::engine::{AnomalyEngine, DataQualityValidator, MachineSummaryEngine, OeeEngine};
use crate::repository::production_repo::ProductionRecordRepository;

/// 默认缓存时效窗口(秒)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

// ==========================================
// AnalysisFilter - 查询筛选条件
// ==========================================
// 说明: 筛选是调用方的责任,在派生后的记录集上应用
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisFilter {
    /// 起始日期(含)
    pub date_from: Option<NaiveDate>,
    /// 结束日期(含)
    pub date_to: Option<NaiveDate>,
    /// 生产线(None = 全部)
    pub production_line: Option<String>,
    /// 机器编号集合(None = 全部;Some(空集) = 不选任何机器)
    pub machine_ids: Option<Vec<String>>,
}

impl AnalysisFilter {
    /// 无筛选条件
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// 判断记录是否命中筛选条件
    fn matches(&self, record: &ProductionRecord) -> bool {
        if let Some(from) = self.date_from {
            if record.record_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if record.record_date > to {
                return false;
            }
        }
        if let Some(line) = &self.production_line {
            if &record.production_line != line {
                return false;
            }
        }
        if let Some(machines) = &self.machine_ids {
            if !machines.iter().any(|m| m == &record.machine_id) {
                return false;
            }
        }
        true
    }

    /// 校验筛选条件本身
    fn validate(&self) -> ApiResult<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(ApiError::InvalidInput(
                    "起始日期不能晚于结束日期".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ==========================================
// 缓存快照
// ==========================================
struct AnalysisSnapshot {
    snapshot_id: String,
    loaded_at: Instant,
    records: Vec<AnalyzedRecord>,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================

/// 驾驶舱 API
///
/// 职责:
/// 1. 整表读取 + 数据质量校验 + 指标派生(带时效缓存)
/// 2. 按筛选条件提供聚合查询(KPI/机器汇总/异常报告/趋势/分布)
/// 3. 为筛选控件提供候选项查询
pub struct DashboardApi {
    /// 生产记录仓储
    repo: Arc<ProductionRecordRepository>,
    /// 分析参数(运行期不可变)
    params: OeeParameters,
    /// 派生引擎
    oee_engine: OeeEngine,
    /// 汇总引擎
    summary_engine: MachineSummaryEngine,
    /// 异常提取引擎
    anomaly_engine: AnomalyEngine,
    /// 数据质量校验器
    validator: DataQualityValidator,
    /// 缓存时效窗口
    cache_ttl: Duration,
    /// 全量分析结果缓存
    cache: Mutex<Option<AnalysisSnapshot>>,
}

impl DashboardApi {
    /// 创建新的 DashboardApi 实例(默认 300 秒缓存窗口)
    ///
    /// # 参数
    /// - repo: 生产记录仓储
    /// - params: 分析参数
    pub fn new(repo: Arc<ProductionRecordRepository>, params: OeeParameters) -> Self {
        Self::with_cache_ttl(repo, params, Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    /// 创建实例并指定缓存时效窗口
    pub fn with_cache_ttl(
        repo: Arc<ProductionRecordRepository>,
        params: OeeParameters,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repo,
            params,
            oee_engine: OeeEngine::new(),
            summary_engine: MachineSummaryEngine::new(),
            anomaly_engine: AnomalyEngine::new(),
            validator: DataQualityValidator::new(),
            cache_ttl,
            cache: Mutex::new(None),
        }
    }

    /// 当前生效的分析参数
    pub fn parameters(&self) -> &OeeParameters {
        &self.params
    }

    /// 失效缓存(重新生成数据后调用)
    pub fn invalidate_cache(&self) {
        if let Ok(mut guard) = self.cache.lock() {
            *guard = None;
        }
    }

    // ==========================================
    // 快照加载(整表读取 + 校验 + 派生)
    // ==========================================

    /// 加载全量分析结果
    ///
    /// 缓存命中且未过期时直接返回缓存内容;
    /// 否则整表读取、数据质量校验、指标派生后回填缓存。
    ///
    /// # 返回
    /// - Ok(Vec<AnalyzedRecord>): 全量带指标记录
    /// - Err(ApiError::ValidationFailed): 存在未通过校验的记录(含逐条明细)
    fn load_analyzed(&self) -> ApiResult<Vec<AnalyzedRecord>> {
        let mut guard = self
            .cache
            .lock()
            .map_err(|e| ApiError::InternalError(format!("缓存锁获取失败: {}", e)))?;

        if let Some(snapshot) = guard.as_ref() {
            if snapshot.loaded_at.elapsed() < self.cache_ttl {
                return Ok(snapshot.records.clone());
            }
        }

        let raw = self.repo.fetch_all()?;

        // 摄入边界校验: 违规记录以结构化错误整体上报,由调用方决策
        let violations = self.validator.validate(&raw);
        if !violations.is_empty() {
            return Err(ApiError::ValidationFailed {
                reason: format!("{} 条违规明细", violations.len()),
                violations,
            });
        }

        let analyzed = self.oee_engine.analyze(&raw, &self.params);

        let snapshot = AnalysisSnapshot {
            snapshot_id: Uuid::new_v4().to_string(),
            loaded_at: Instant::now(),
            records: analyzed.clone(),
        };
        tracing::debug!(
            snapshot_id = %snapshot.snapshot_id,
            record_count = snapshot.records.len(),
            "分析快照已刷新"
        );
        *guard = Some(snapshot);

        Ok(analyzed)
    }

    /// 按筛选条件加载记录
    fn load_filtered(&self, filter: &AnalysisFilter) -> ApiResult<Vec<AnalyzedRecord>> {
        filter.validate()?;
        let analyzed = self.load_analyzed()?;
        Ok(analyzed
            .into_iter()
            .filter(|item| filter.matches(&item.record))
            .collect())
    }

    // ==========================================
    // 聚合查询接口
    // ==========================================

    /// 查询带指标的记录列表
    ///
    /// # 参数
    /// - filter: 筛选条件
    ///
    /// # 返回
    /// - Ok(Vec<AnalyzedRecord>): 命中筛选的带指标记录
    pub fn list_analyzed_records(&self, filter: &AnalysisFilter) -> ApiResult<Vec<AnalyzedRecord>> {
        self.load_filtered(filter)
    }

    /// 查询 KPI 总览
    ///
    /// # 返回
    /// - Ok(OverviewResponse): 总产量/平均废纱率/平均 OEE/危急记录数/总停机时长
    pub fn get_overview(&self, filter: &AnalysisFilter) -> ApiResult<OverviewResponse> {
        let records = self.load_filtered(filter)?;
        let n = records.len();

        let mut total_output_kg = 0.0;
        let mut total_downtime_minutes = 0.0;
        let mut scrap_rate_sum = 0.0;
        let mut oee_sum = 0.0;
        let mut critical_count = 0usize;

        for item in &records {
            total_output_kg += item.record.total_output_kg;
            total_downtime_minutes += item.record.downtime_minutes;
            scrap_rate_sum += item.metrics.scrap_rate_pct;
            oee_sum += item.metrics.oee;
            if item.metrics.status == RecordStatus::Critical {
                critical_count += 1;
            }
        }

        let (avg_scrap_rate_pct, avg_oee_pct) = if n > 0 {
            (
                round2(scrap_rate_sum / n as f64),
                round2(oee_sum / n as f64 * 100.0),
            )
        } else {
            (0.0, 0.0)
        };

        Ok(OverviewResponse {
            record_count: n,
            total_output_kg,
            avg_scrap_rate_pct,
            avg_oee_pct,
            critical_count,
            total_downtime_minutes,
        })
    }

    /// 查询机器汇总
    ///
    /// # 返回
    /// - Ok(Vec<MachineSummary>): 按机器编号升序的汇总行
    pub fn get_machine_summaries(&self, filter: &AnalysisFilter) -> ApiResult<Vec<MachineSummary>> {
        let records = self.load_filtered(filter)?;
        Ok(self.summary_engine.summarize(&records, &self.params))
    }

    /// 查询异常报告
    ///
    /// # 返回
    /// - Ok(AnomalyReportResponse): CRITICAL 记录子集,按废纱率降序;
    ///   空子集为合法结果(record_count = 0)
    pub fn get_anomaly_report(&self, filter: &AnalysisFilter) -> ApiResult<AnomalyReportResponse> {
        let records = self.load_filtered(filter)?;
        let anomalies = self.anomaly_engine.extract(&records);
        Ok(AnomalyReportResponse {
            record_count: anomalies.len(),
            records: anomalies,
        })
    }

    /// 查询逐日平均废纱率趋势
    ///
    /// # 返回
    /// - Ok(Vec<DailyScrapPoint>): 按日期升序
    pub fn get_daily_scrap_trend(&self, filter: &AnalysisFilter) -> ApiResult<Vec<DailyScrapPoint>> {
        let records = self.load_filtered(filter)?;

        let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for item in &records {
            let entry = by_date.entry(item.record.record_date).or_insert((0.0, 0));
            entry.0 += item.metrics.scrap_rate_pct;
            entry.1 += 1;
        }

        Ok(by_date
            .into_iter()
            .map(|(record_date, (sum, count))| DailyScrapPoint {
                record_date,
                avg_scrap_rate_pct: round2(sum / count as f64),
            })
            .collect())
    }

    /// 查询各生产线产量分布
    ///
    /// # 返回
    /// - Ok(Vec<LineOutput>): 按生产线升序
    pub fn get_line_output_distribution(
        &self,
        filter: &AnalysisFilter,
    ) -> ApiResult<Vec<LineOutput>> {
        let records = self.load_filtered(filter)?;

        let mut by_line: BTreeMap<String, f64> = BTreeMap::new();
        for item in &records {
            *by_line
                .entry(item.record.production_line.clone())
                .or_insert(0.0) += item.record.total_output_kg;
        }

        Ok(by_line
            .into_iter()
            .map(|(production_line, total_output_kg)| LineOutput {
                production_line,
                total_output_kg,
            })
            .collect())
    }

    /// 查询 OEE 分量均值(百分比)
    ///
    /// # 返回
    /// - Ok(ComponentMeans): 可用率/表现率/质量率均值(%,保留 2 位小数)
    pub fn get_component_means(&self, filter: &AnalysisFilter) -> ApiResult<ComponentMeans> {
        let records = self.load_filtered(filter)?;
        let n = records.len();

        if n == 0 {
            return Ok(ComponentMeans {
                availability_pct: 0.0,
                performance_pct: 0.0,
                quality_pct: 0.0,
            });
        }

        let mut availability_sum = 0.0;
        let mut performance_sum = 0.0;
        let mut quality_sum = 0.0;
        for item in &records {
            availability_sum += item.metrics.availability;
            performance_sum += item.metrics.performance;
            quality_sum += item.metrics.quality;
        }

        Ok(ComponentMeans {
            availability_pct: round2(availability_sum / n as f64 * 100.0),
            performance_pct: round2(performance_sum / n as f64 * 100.0),
            quality_pct: round2(quality_sum / n as f64 * 100.0),
        })
    }

    // ==========================================
    // 筛选控件候选项查询
    // ==========================================

    /// 查询筛选控件候选项
    ///
    /// # 参数
    /// - production_line: 限定生产线后只返回该线的机器(None = 全部机器)
    ///
    /// # 返回
    /// - Ok(FilterOptions): 日期上下界、生产线列表、机器列表
    pub fn get_filter_options(&self, production_line: Option<&str>) -> ApiResult<FilterOptions> {
        if let Some(line) = production_line {
            if line.trim().is_empty() {
                return Err(ApiError::InvalidInput("生产线标识不能为空".to_string()));
            }
        }

        let bounds = self.repo.date_bounds()?;
        let production_lines = self.repo.distinct_lines()?;
        let machine_ids = self.repo.distinct_machines(production_line)?;

        Ok(FilterOptions {
            date_min: bounds.map(|(min, _)| min),
            date_max: bounds.map(|(_, max)| max),
            production_lines,
            machine_ids,
        })
    }
}

// ==========================================
// DTO 类型定义
// ==========================================

/// KPI 总览响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub record_count: usize,
    pub total_output_kg: f64,
    pub avg_scrap_rate_pct: f64,
    pub avg_oee_pct: f64,
    pub critical_count: usize,
    pub total_downtime_minutes: f64,
}

/// 异常报告响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReportResponse {
    pub record_count: usize,
    pub records: Vec<AnalyzedRecord>,
}

/// 逐日废纱率趋势点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyScrapPoint {
    pub record_date: NaiveDate,
    pub avg_scrap_rate_pct: f64,
}

/// 生产线产量分布行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOutput {
    pub production_line: String,
    pub total_output_kg: f64,
}

/// OEE 分量均值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMeans {
    pub availability_pct: f64,
    pub performance_pct: f64,
    pub quality_pct: f64,
}

/// 筛选控件候选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub production_lines: Vec<String>,
    pub machine_ids: Vec<String>,
}

/// 四舍五入保留 2 位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
