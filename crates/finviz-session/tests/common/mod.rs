//! 세션 테스트용 제공자/렌더러.

#![allow(dead_code)]

use async_trait::async_trait;
use finviz_core::{
    ApiError, ChartData, ChartDataset, ChartType, Company, DetailedAnalysis, FinancialApi,
    FinancialSnapshot, QuickInsights, RegistryStats, StatementLine, VisualizationSlot, YearRange,
};
use finviz_session::{ChartRenderer, RenderHandle, RenderPayload};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// 호출 횟수를 세고, 회사별로 응답을 막아 둘 수 있는 제공자.
#[derive(Default)]
pub struct ScriptedApi {
    snapshots: HashMap<String, FinancialSnapshot>,
    chart_failures: Mutex<HashMap<ChartType, ApiError>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub chart_calls: AtomicUsize,
    pub snapshot_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, corp_code: &str, snapshot: FinancialSnapshot) -> Self {
        self.snapshots.insert(corp_code.to_string(), snapshot);
        self
    }

    /// 해당 차트 조회를 `error`로 실패시킵니다.
    pub fn fail_chart(&self, chart_type: ChartType, error: ApiError) {
        self.chart_failures.lock().unwrap().insert(chart_type, error);
    }

    pub fn clear_failures(&self) {
        self.chart_failures.lock().unwrap().clear();
    }

    /// 해당 회사의 응답을 `release`될 때까지 막습니다.
    pub fn hold(&self, corp_code: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(corp_code.to_string(), gate.clone());
        gate
    }

    pub fn chart_calls(&self) -> usize {
        self.chart_calls.load(Ordering::SeqCst)
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }

    async fn wait_gate(&self, corp_code: &str) {
        let gate = self.gates.lock().unwrap().get(corp_code).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl FinancialApi for ScriptedApi {
    async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<Company>, ApiError> {
        Ok(Vec::new())
    }

    async fn company(&self, corp_code: &str) -> Result<Company, ApiError> {
        Ok(Company::new(corp_code, corp_code))
    }

    async fn random(&self, _limit: u32) -> Result<Vec<Company>, ApiError> {
        Ok(Vec::new())
    }

    async fn stats(&self) -> Result<RegistryStats, ApiError> {
        Err(ApiError::backend("지원하지 않음"))
    }

    async fn fetch_chart(
        &self,
        corp_code: &str,
        chart_type: ChartType,
        years: &YearRange,
    ) -> Result<ChartData, ApiError> {
        self.chart_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate(corp_code).await;

        if let Some(err) = self.chart_failures.lock().unwrap().get(&chart_type).cloned() {
            return Err(err);
        }

        let labels: Vec<String> = years.years().iter().map(|y| y.to_string()).collect();
        let values = vec![1000.0; labels.len()];
        Ok(ChartData {
            labels,
            datasets: vec![ChartDataset::new(format!("{} 매출액", corp_code), values)],
        })
    }

    async fn fetch_snapshot(
        &self,
        corp_code: &str,
        year: i32,
    ) -> Result<FinancialSnapshot, ApiError> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate(corp_code).await;

        self.snapshots
            .get(corp_code)
            .cloned()
            .map(|s| s.with_year(year))
            .ok_or_else(|| ApiError::backend("재무 데이터를 가져올 수 없습니다."))
    }

    async fn fetch_insights(&self, _: &str, _: i32) -> Result<QuickInsights, ApiError> {
        Ok(QuickInsights::default())
    }

    async fn fetch_analysis(&self, _: &str, _: &YearRange) -> Result<DetailedAnalysis, ApiError> {
        Ok(DetailedAnalysis::default())
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// 자산 50000, 부채 20000, 자본 30000 (억원).
pub fn company_x_snapshot() -> FinancialSnapshot {
    FinancialSnapshot::new()
        .with_line(StatementLine::TotalAssets, dec!(50000), dec!(45000))
        .with_line(StatementLine::TotalLiabilities, dec!(20000), dec!(19000))
        .with_line(StatementLine::TotalEquity, dec!(30000), dec!(26000))
}

#[derive(Default)]
struct RenderLogInner {
    rendered: Vec<VisualizationSlot>,
    disposed: usize,
    live: HashMap<VisualizationSlot, usize>,
    max_live_per_slot: usize,
}

/// 렌더/폐기 기록.
#[derive(Clone, Default)]
pub struct RenderLog(Arc<Mutex<RenderLogInner>>);

impl RenderLog {
    pub fn rendered(&self) -> Vec<VisualizationSlot> {
        self.0.lock().unwrap().rendered.clone()
    }

    pub fn disposed(&self) -> usize {
        self.0.lock().unwrap().disposed
    }

    pub fn live(&self) -> usize {
        self.0.lock().unwrap().live.values().sum()
    }

    /// 한 슬롯에 동시에 살아 있던 핸들 수의 최댓값.
    pub fn max_live_per_slot(&self) -> usize {
        self.0.lock().unwrap().max_live_per_slot
    }
}

pub struct RecordingHandle {
    slot: VisualizationSlot,
    log: RenderLog,
    disposed: bool,
}

impl RenderHandle for RecordingHandle {
    fn dispose(&mut self) {
        assert!(!self.disposed, "핸들이 두 번 폐기됨");
        self.disposed = true;
        let mut inner = self.log.0.lock().unwrap();
        inner.disposed += 1;
        if let Some(count) = inner.live.get_mut(&self.slot) {
            *count -= 1;
        }
    }
}

pub struct RecordingRenderer {
    log: RenderLog,
}

impl RecordingRenderer {
    pub fn new() -> (Self, RenderLog) {
        let log = RenderLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&mut self, payload: &RenderPayload) -> Box<dyn RenderHandle> {
        let slot = payload.slot();
        {
            let mut inner = self.log.0.lock().unwrap();
            inner.rendered.push(slot);
            let live = inner.live.entry(slot).or_insert(0);
            *live += 1;
            let live = *live;
            inner.max_live_per_slot = inner.max_live_per_slot.max(live);
        }
        Box::new(RecordingHandle {
            slot,
            log: self.log.clone(),
            disposed: false,
        })
    }

    fn name(&self) -> &str {
        "recording"
    }
}
