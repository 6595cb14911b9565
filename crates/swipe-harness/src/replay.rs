#![forbid(unsafe_code)]

//! Drive a [`SwipeView`] over a [`RecordingHost`] from a [`Trace`].

use std::time::Duration;

use serde::Serialize;
use swipe_core::{
    NoopReason, PanelLayout, RecordingHost, SessionState, SessionTransition, SwipeConfig,
    SwipeController, SwipeTarget, SwipeView,
};
use tracing::{debug, info};

use crate::error::{HarnessError, Result};
use crate::trace::{Trace, TraceStep};

/// Upper bound on frames delivered by a single `settle` step.
pub const MAX_SETTLE_FRAMES: usize = 10_000;

/// Outcome of one replayed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub kind: &'static str,
    pub from: SessionState,
    pub to: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noop: Option<NoopReason>,
    pub frames: usize,
    pub front_left: i32,
    pub rear_left: i32,
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepRecord>,
    pub layouts: Vec<PanelLayout>,
    pub redraws: usize,
    pub frames_delivered: usize,
    pub final_state: SessionState,
    pub front_left: i32,
    pub rear_left: i32,
    pub resting: Option<SwipeTarget>,
}

/// Replay state: the view under test plus the trace clock.
#[derive(Debug)]
pub struct Replay {
    view: SwipeView<RecordingHost>,
    now: Duration,
    frames_delivered: usize,
}

impl Replay {
    pub fn new(config: SwipeConfig) -> Result<Self> {
        let controller = SwipeController::new(config)?;
        Ok(Self {
            view: SwipeView::new(controller, RecordingHost::new()),
            now: Duration::ZERO,
            frames_delivered: 0,
        })
    }

    #[must_use]
    pub fn view(&self) -> &SwipeView<RecordingHost> {
        &self.view
    }

    /// Run every step of `trace` and summarize.
    pub fn run(mut self, trace: &Trace) -> Result<ReplayReport> {
        let mut steps = Vec::with_capacity(trace.steps.len() + 1);
        if let Some(size) = trace.size {
            let t = self.view.resize(size);
            steps.push(self.record(0, "initial_size", &t, 0));
        }
        for (i, step) in trace.steps.iter().enumerate() {
            let index = i + 1;
            steps.push(self.apply(index, step)?);
        }
        info!(
            target: "swipe.replay",
            steps = steps.len(),
            frames = self.frames_delivered,
            "replay finished"
        );

        let controller = self.view.controller();
        let (final_state, front_left, rear_left, resting) = (
            controller.state(),
            controller.front_left(),
            controller.rear_left(),
            controller.resting(),
        );
        let (_, host) = self.view.into_parts();
        Ok(ReplayReport {
            steps,
            layouts: host.layouts,
            redraws: host.redraws,
            frames_delivered: self.frames_delivered,
            final_state,
            front_left,
            rear_left,
            resting,
        })
    }

    fn apply(&mut self, index: usize, step: &TraceStep) -> Result<StepRecord> {
        debug!(target: "swipe.replay", index, kind = step.kind(), "step");
        let record = match *step {
            TraceStep::Pointer(pointer) => {
                self.now = self.now.max(pointer.timestamp());
                let t = self.view.pointer(&pointer.event());
                self.record(index, step.kind(), &t, 0)
            }
            TraceStep::Resize(size) => {
                let t = self.view.resize(size);
                self.record(index, step.kind(), &t, 0)
            }
            TraceStep::Open { smooth } => {
                let t = self.view.open(smooth);
                self.record(index, step.kind(), &t, 0)
            }
            TraceStep::Close { smooth } => {
                let t = self.view.close(smooth);
                self.record(index, step.kind(), &t, 0)
            }
            TraceStep::Frames { count, interval_ms } => {
                self.pump(index, step.kind(), Some(count), interval_ms)?
            }
            TraceStep::Settle { interval_ms } => {
                self.pump(index, step.kind(), None, interval_ms)?
            }
        };
        Ok(record)
    }

    /// Deliver pending frames, up to `limit` or until none is pending.
    fn pump(
        &mut self,
        index: usize,
        kind: &'static str,
        limit: Option<usize>,
        interval_ms: u64,
    ) -> Result<StepRecord> {
        let from = self.view.controller().state();
        let mut frames = 0;
        let mut last: Option<SessionTransition> = None;
        while limit.is_none_or(|n| frames < n) {
            let Some(token) = self.view.host_mut().take_frame() else {
                break;
            };
            if frames >= MAX_SETTLE_FRAMES {
                return Err(HarnessError::SettleDiverged { step: index, frames });
            }
            last = Some(self.view.frame(token, self.now));
            self.now += Duration::from_millis(interval_ms);
            frames += 1;
        }
        self.frames_delivered += frames;
        let controller = self.view.controller();
        Ok(StepRecord {
            index,
            kind,
            from,
            to: controller.state(),
            noop: last.as_ref().and_then(SessionTransition::noop_reason),
            frames,
            front_left: controller.front_left(),
            rear_left: controller.rear_left(),
        })
    }

    fn record(
        &self,
        index: usize,
        kind: &'static str,
        transition: &SessionTransition,
        frames: usize,
    ) -> StepRecord {
        let controller = self.view.controller();
        StepRecord {
            index,
            kind,
            from: transition.from,
            to: transition.to,
            noop: transition.noop_reason(),
            frames,
            front_left: controller.front_left(),
            rear_left: controller.rear_left(),
        }
    }
}

/// Replay `trace` under `config`.
pub fn run_trace(trace: &Trace, config: SwipeConfig) -> Result<ReplayReport> {
    Replay::new(config)?.run(trace)
}

/// Plain-text rendering of a report, one line per step.
#[must_use]
pub fn render_text(report: &ReplayReport) -> String {
    let mut out = String::new();
    for step in &report.steps {
        out.push_str(&format!(
            "#{:<3} {:<14} {:<9} -> {:<9} front_left={:<5} rear_left={:<5}",
            step.index,
            step.kind,
            state_name(step.from),
            state_name(step.to),
            step.front_left,
            step.rear_left,
        ));
        if step.frames > 0 {
            out.push_str(&format!(" frames={}", step.frames));
        }
        if let Some(reason) = step.noop {
            out.push_str(&format!(" ignored={reason:?}"));
        }
        out.push('\n');
    }
    let resting = match report.resting {
        Some(SwipeTarget::Open) => "open",
        Some(SwipeTarget::Closed) => "closed",
        None => "-",
    };
    out.push_str(&format!(
        "final: {} front_left={} rear_left={} resting={} frames={} redraws={}\n",
        state_name(report.final_state),
        report.front_left,
        report.rear_left,
        resting,
        report.frames_delivered,
        report.redraws,
    ));
    out
}

const fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Dragging { .. } => "dragging",
        SessionState::Settling { .. } => "settling",
    }
}
