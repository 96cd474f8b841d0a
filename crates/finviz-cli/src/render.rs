//! 터미널 렌더러.
//!
//! 차트는 연도별 표로, 재무상태표는 막대 길이로 높이를 보여주는 텍스트 다이어그램으로
//! 출력합니다.

use finviz_analytics::{BalanceCheck, BalanceLayout, ChartDescriptor, LayoutBox};
use finviz_core::VisualizationSlot;
use finviz_session::{ChartRenderer, RenderHandle, RenderPayload};
use indicatif::ProgressBar;
use rust_decimal::Decimal;
use tracing::debug;

/// 막대 한 칸이 나타내는 렌더 단위.
const UNITS_PER_CELL: f64 = 10.0;
/// 표 열 너비.
const COLUMN_WIDTH: usize = 16;

/// 렌더 결과를 표준 출력에 쓰는 렌더러.
#[derive(Default)]
pub struct TerminalRenderer {
    /// 지정하면 이 슬롯만 출력
    focus: Option<VisualizationSlot>,
    /// 출력하는 동안 멈춰 둘 스피너
    progress: Option<ProgressBar>,
    next_id: u64,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 한 슬롯만 출력합니다. 다른 슬롯도 렌더 인스턴스는 만들어집니다.
    pub fn focus(mut self, slot: VisualizationSlot) -> Self {
        self.focus = Some(slot);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl ChartRenderer for TerminalRenderer {
    fn render(&mut self, payload: &RenderPayload) -> Box<dyn RenderHandle> {
        self.next_id += 1;
        let slot = payload.slot();

        if self.focus.map_or(true, |focus| focus == slot) {
            let text = render_text(payload);
            match &self.progress {
                Some(pb) => pb.suspend(|| println!("{}", text)),
                None => println!("{}", text),
            }
        }

        debug!(slot = %slot, id = self.next_id, "렌더 인스턴스 생성");
        Box::new(TerminalHandle {
            slot,
            id: self.next_id,
        })
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

/// 터미널 출력 핸들. 화면에 쓴 글자는 지울 수 없으므로 폐기는 기록만 남깁니다.
struct TerminalHandle {
    slot: VisualizationSlot,
    id: u64,
}

impl RenderHandle for TerminalHandle {
    fn dispose(&mut self) {
        debug!(slot = %self.slot, id = self.id, "렌더 인스턴스 폐기");
    }
}

/// 렌더 기술자를 출력용 텍스트로 바꿉니다.
pub fn render_text(payload: &RenderPayload) -> String {
    match payload {
        RenderPayload::Chart(descriptor) => render_chart(descriptor),
        RenderPayload::BalanceBoxes(layout) => render_boxes(layout),
    }
}

/// 차트를 연도별 표로 그립니다.
pub fn render_chart(descriptor: &ChartDescriptor) -> String {
    let mut lines = vec![format!("== {} ==", descriptor.options.title)];

    let mut header = format!("{:<8}", descriptor.options.x_axis.title);
    for dataset in &descriptor.data.datasets {
        header.push_str(&format!("{:>width$}", dataset.label, width = COLUMN_WIDTH));
    }
    lines.push(header);

    for (i, label) in descriptor.data.labels.iter().enumerate() {
        let mut row = format!("{:<8}", label);
        for dataset in &descriptor.data.datasets {
            let cell = dataset
                .data
                .get(i)
                .map(|v| descriptor.tick_label(*v))
                .unwrap_or_else(|| "-".to_string());
            row.push_str(&format!("{:>width$}", cell, width = COLUMN_WIDTH));
        }
        lines.push(row);
    }

    if descriptor.data.is_empty() {
        lines.push("(데이터 없음)".to_string());
    }

    for note in &descriptor.gap_notes {
        let detail: Vec<String> = note
            .tooltip_lines()
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect();
        lines.push(format!("{}: {}", note.label, detail.join(" ")));
    }

    lines.join("\n")
}

/// 재무상태표 박스 다이어그램을 그립니다.
pub fn render_boxes(layout: &BalanceLayout) -> String {
    let mut lines = vec![format!("== 재무상태표 ({}) ==", layout.period)];

    lines.push(box_line(&layout.assets));
    lines.push(box_line(&layout.liabilities));
    lines.push(box_line(&layout.equity));
    lines.push(String::new());

    lines.push(format!(
        "부채비율 {}% [{}]  자기자본비율 {}% [{}]",
        layout.liability_ratio,
        layout.liability_band.label(),
        layout.equity_ratio,
        layout.equity_band.label(),
    ));

    let check = match layout.balance_check {
        BalanceCheck::Balanced => "✅ 자산 = 부채 + 자본".to_string(),
        BalanceCheck::Mismatch => format!(
            "⚠️ 불일치: 자산 - (부채 + 자본) = {}억원",
            layout.balance_gap.round_dp(2)
        ),
    };
    lines.push(check);

    lines.join("\n")
}

fn box_line(layout_box: &LayoutBox) -> String {
    let cells = (layout_box.height / UNITS_PER_CELL).round().max(1.0) as usize;
    format!(
        "{:<6} {:>8} {:>7}%  {}{}",
        layout_box.line.account_name(),
        layout_box.formatted,
        layout_box.share_pct,
        "█".repeat(cells),
        yoy_suffix(layout_box),
    )
}

fn yoy_suffix(layout_box: &LayoutBox) -> String {
    match layout_box.yoy.change_pct {
        Some(pct) if pct > Decimal::ZERO => format!("  (전기 대비 +{}%)", pct),
        Some(pct) => format!("  (전기 대비 {}%)", pct),
        None => String::new(),
    }
}
