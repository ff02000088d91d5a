//! Step-by-step simulation of a flow against a simulated client.
//!
//! A [`Preview`] walks the steps of a flow on a virtual clock. Enter actions
//! are dispatched to an [`ActionHandler`], delays hold the remaining actions
//! until the clock passes them, and a step completes once its completion
//! conditions hold for the simulated [`PlayerState`]. Nothing here sleeps:
//! time only moves through [`Preview::advance_time`].

mod config;
mod handler;

pub use config::PreviewConfig;
pub use handler::{
    ActionEffect, ActionHandler, AnalyticsEvent, BoardItem, BubbleState, DialogState,
    FingerState, SimulatedUi, TooltipState,
};

use crate::compiler::ConditionCompiler;
use crate::error::PreviewError;
use crate::evaluator::Evaluator;
use crate::model::{Action, Flow, Step, Target};
use crate::state::PlayerState;
use crate::storage::PublishedFlow;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The last step completed.
    EndOfFlow,
    /// A `complete_flow` action ended the flow early.
    CompletedByAction,
    /// The visit guard tripped.
    VisitLimit,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::EndOfFlow => write!(f, "end of flow"),
            FinishReason::CompletedByAction => write!(f, "completed by action"),
            FinishReason::VisitLimit => write!(f, "visit limit reached"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    NotStarted,
    Running,
    Finished(FinishReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEventKind {
    StepEntered { step_id: String },
    StepSkipped { step_id: String, reason: String },
    ActionApplied { step_id: String, action: String },
    Waiting { step_id: String, until_ms: u64 },
    UserAction { action: String, target: Target },
    InputRejected {
        action: String,
        target: Target,
        reason: String,
    },
    StepCompleted { step_id: String, reason: String },
    FlowQueued { flow_id: String },
    FlowFinished { reason: FinishReason },
}

/// One transition of the preview, stamped with the virtual clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEvent {
    pub at_ms: u64,
    pub kind: PreviewEventKind,
}

impl fmt::Display for PreviewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>6} ms] ", self.at_ms)?;
        match &self.kind {
            PreviewEventKind::StepEntered { step_id } => write!(f, "entered '{}'", step_id),
            PreviewEventKind::StepSkipped { step_id, reason } => {
                write!(f, "skipped '{}': {}", step_id, reason)
            }
            PreviewEventKind::ActionApplied { step_id, action } => {
                write!(f, "'{}' -> {}", step_id, action)
            }
            PreviewEventKind::Waiting { step_id, until_ms } => {
                write!(f, "'{}' waiting until {} ms", step_id, until_ms)
            }
            PreviewEventKind::UserAction { action, target } => {
                write!(f, "user {} on {}", action, target)
            }
            PreviewEventKind::InputRejected {
                action,
                target,
                reason,
            } => write!(f, "user {} on {} rejected: {}", action, target, reason),
            PreviewEventKind::StepCompleted { step_id, reason } => {
                write!(f, "completed '{}': {}", step_id, reason)
            }
            PreviewEventKind::FlowQueued { flow_id } => write!(f, "queued flow '{}'", flow_id),
            PreviewEventKind::FlowFinished { reason } => write!(f, "flow finished ({})", reason),
        }
    }
}

/// Runs a flow on a virtual clock.
///
/// ```ignore
/// let mut preview = Preview::new(&flow)?;
/// preview.start()?;
/// preview.perform("click", Target::BoardButton)?;
/// preview.advance_time(1000)?;
/// ```
pub struct Preview<H = SimulatedUi> {
    flow: Flow,
    compiled: PublishedFlow,
    handler: H,
    player: PlayerState,
    initial_player: PlayerState,
    config: PreviewConfig,
    clock_ms: u64,
    status: PreviewStatus,
    current: Option<usize>,
    pending: VecDeque<Action>,
    /// Set while a delay holds the remaining enter actions.
    resume_at: Option<u64>,
    /// Clock value at which the last enter action of the current step ran.
    actions_done_at: Option<u64>,
    visits: usize,
    events: Vec<PreviewEvent>,
}

impl Preview<SimulatedUi> {
    /// Prepares a preview with the built-in parsers and the simulated UI.
    pub fn new(flow: &Flow) -> Result<Self, PreviewError> {
        Self::with_handler(flow, SimulatedUi::new(), &ConditionCompiler::default())
    }
}

impl<H: ActionHandler> Preview<H> {
    /// Prepares a preview that dispatches actions to `handler`.
    /// All conditions are compiled up front, so a broken condition fails here.
    pub fn with_handler(
        flow: &Flow,
        handler: H,
        compiler: &ConditionCompiler,
    ) -> Result<Self, PreviewError> {
        let compiled = PublishedFlow::compile_with(flow, compiler)?;
        Ok(Self {
            flow: flow.clone(),
            compiled,
            handler,
            player: PlayerState::default(),
            initial_player: PlayerState::default(),
            config: PreviewConfig::default(),
            clock_ms: 0,
            status: PreviewStatus::NotStarted,
            current: None,
            pending: VecDeque::new(),
            resume_at: None,
            actions_done_at: None,
            visits: 0,
            events: Vec::new(),
        })
    }

    /// Sets the player the preview starts from; [`Preview::restart`] returns to it.
    pub fn with_player(mut self, player: PlayerState) -> Self {
        self.player = player.clone();
        self.initial_player = player;
        self
    }

    pub fn with_config(mut self, config: PreviewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn status(&self) -> PreviewStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == PreviewStatus::Running
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, PreviewStatus::Finished(_))
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.current.and_then(|index| self.flow.steps.get(index))
    }

    /// Index of the current step in the flow.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn events(&self) -> &[PreviewEvent] {
        &self.events
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Enters the first step and runs as far as the flow goes without input.
    pub fn start(&mut self) -> Result<(), PreviewError> {
        match self.status {
            PreviewStatus::NotStarted => {}
            PreviewStatus::Running => return Ok(()),
            PreviewStatus::Finished(_) => return Err(PreviewError::Finished),
        }
        if self.compiled.steps.is_empty() {
            return Err(PreviewError::EmptyFlow(self.flow.id.clone()));
        }

        log::info!(
            "Starting preview of '{}' ({} steps)",
            self.flow.id,
            self.compiled.steps.len()
        );
        self.status = PreviewStatus::Running;
        self.enter(Some(0), true)?;
        self.progress()
    }

    /// Resets the player, the handler and the clock, then starts again.
    pub fn restart(&mut self) -> Result<(), PreviewError> {
        self.handler.reset();
        self.player = self.initial_player.clone();
        self.clock_ms = 0;
        self.status = PreviewStatus::NotStarted;
        self.current = None;
        self.pending.clear();
        self.resume_at = None;
        self.actions_done_at = None;
        self.visits = 0;
        self.events.clear();
        self.start()
    }

    /// Moves the virtual clock forward, firing every delay and auto-advance
    /// that falls inside the window in order.
    pub fn advance_time(&mut self, ms: u64) -> Result<(), PreviewError> {
        self.ensure_running()?;
        let target = self.clock_ms.saturating_add(ms);

        while self.is_running() {
            match self.next_deadline() {
                Some(deadline) if deadline <= target => {
                    self.clock_ms = self.clock_ms.max(deadline);
                    self.progress()?;
                }
                _ => break,
            }
        }

        self.clock_ms = target;
        if self.is_running() {
            self.progress()?;
        }
        Ok(())
    }

    /// Simulates the user performing `action` on `target`.
    ///
    /// Returns `Ok(false)` when the target is input-locked or the current step
    /// is still running its enter actions; the action is then not recorded.
    pub fn perform(&mut self, action: &str, target: Target) -> Result<bool, PreviewError> {
        self.ensure_running()?;

        let rejection = if self.resume_at.is_some() || !self.pending.is_empty() {
            Some("step actions still running")
        } else if !self.handler.accepts_input(&target) {
            Some("input locked")
        } else {
            None
        };
        if let Some(reason) = rejection {
            log::debug!("Rejected '{}' on {}: {}", action, target, reason);
            self.record(PreviewEventKind::InputRejected {
                action: action.to_string(),
                target,
                reason: reason.to_string(),
            });
            return Ok(false);
        }

        self.handler.user_input(action, &target);
        self.player.record_action(action);
        self.record(PreviewEventKind::UserAction {
            action: action.to_string(),
            target,
        });
        self.progress()?;
        Ok(true)
    }

    /// Changes the simulated player, e.g. to grant coins or bump the chapter.
    /// Before the start the change also becomes the restart state.
    pub fn update_player(
        &mut self,
        update: impl FnOnce(&mut PlayerState),
    ) -> Result<(), PreviewError> {
        match self.status {
            PreviewStatus::NotStarted => {
                update(&mut self.initial_player);
                self.player = self.initial_player.clone();
                Ok(())
            }
            PreviewStatus::Running => {
                update(&mut self.player);
                self.progress()
            }
            PreviewStatus::Finished(_) => {
                update(&mut self.player);
                Ok(())
            }
        }
    }

    /// Completes the current step regardless of its conditions. Pending enter
    /// actions are dropped; exit actions still run.
    pub fn skip_step(&mut self) -> Result<(), PreviewError> {
        self.ensure_running()?;
        let index = self.current.ok_or(PreviewError::NotStarted)?;
        self.pending.clear();
        self.resume_at = None;
        self.complete(index, "skipped".to_string())?;
        self.progress()
    }

    /// Abandons the current step without running its exit actions and enters
    /// `step_id`, whether or not its entry conditions hold. Starts the preview
    /// when it has not started yet.
    pub fn jump_to(&mut self, step_id: &str) -> Result<(), PreviewError> {
        let index = self
            .flow
            .step_index(step_id)
            .ok_or_else(|| PreviewError::UnknownStep(step_id.to_string()))?;
        match self.status {
            PreviewStatus::NotStarted => self.status = PreviewStatus::Running,
            PreviewStatus::Running => {}
            PreviewStatus::Finished(_) => return Err(PreviewError::Finished),
        }
        self.pending.clear();
        self.resume_at = None;
        self.enter(Some(index), false)?;
        self.progress()
    }

    fn ensure_running(&self) -> Result<(), PreviewError> {
        match self.status {
            PreviewStatus::NotStarted => Err(PreviewError::NotStarted),
            PreviewStatus::Finished(_) => Err(PreviewError::Finished),
            PreviewStatus::Running => Ok(()),
        }
    }

    fn record(&mut self, kind: PreviewEventKind) {
        self.events.push(PreviewEvent {
            at_ms: self.clock_ms,
            kind,
        });
    }

    fn step_id(&self, index: usize) -> String {
        self.compiled.steps[index].id.clone()
    }

    /// The earliest clock value at which the preview moves on its own.
    fn next_deadline(&self) -> Option<u64> {
        if let Some(until) = self.resume_at {
            return Some(until);
        }
        let index = self.current?;
        if self.compiled.steps[index].completion.is_always_true() {
            self.actions_done_at
                .map(|at| at.saturating_add(self.config.auto_advance_ms))
        } else {
            None
        }
    }

    /// Enters the step at `next`, skipping steps whose entry conditions do
    /// not hold unless `check_entry` is false. `None` finishes the flow.
    fn enter(&mut self, mut next: Option<usize>, check_entry: bool) -> Result<(), PreviewError> {
        while let Some(index) = next {
            self.visits += 1;
            if self.visits > self.config.max_visits {
                log::warn!(
                    "Preview of '{}' exceeded {} step visits",
                    self.flow.id,
                    self.config.max_visits
                );
                self.finish(FinishReason::VisitLimit);
                return Err(PreviewError::VisitLimit(self.config.max_visits));
            }

            let step_id = self.step_id(index);
            if check_entry && self.config.skip_unmet_entry {
                let result = Evaluator::new(&self.compiled.steps[index].entry).eval(&self.player)?;
                if !result.satisfied {
                    log::debug!("Skipping '{}': {}", step_id, result.reason);
                    self.record(PreviewEventKind::StepSkipped {
                        step_id,
                        reason: result.reason,
                    });
                    next = self.compiled.steps[index].next.map(|i| i as usize);
                    continue;
                }
            }

            log::info!("Entered step '{}' at {} ms", step_id, self.clock_ms);
            self.player.clear_step_actions();
            self.current = Some(index);
            self.pending = self.compiled.steps[index].actions.iter().cloned().collect();
            self.resume_at = None;
            self.actions_done_at = None;
            self.record(PreviewEventKind::StepEntered { step_id });
            return Ok(());
        }

        self.finish(FinishReason::EndOfFlow);
        Ok(())
    }

    /// Runs pending actions and completes steps until the preview needs
    /// time or input to go on.
    fn progress(&mut self) -> Result<(), PreviewError> {
        while self.is_running() {
            let Some(index) = self.current else {
                return Ok(());
            };

            if let Some(until) = self.resume_at {
                if self.clock_ms < until {
                    return Ok(());
                }
                self.resume_at = None;
            }

            while let Some(action) = self.pending.pop_front() {
                let effect = self.handler.apply(&action, &mut self.player, self.clock_ms);
                self.record(PreviewEventKind::ActionApplied {
                    step_id: self.step_id(index),
                    action: action.label(),
                });
                match effect {
                    ActionEffect::Continue => {}
                    ActionEffect::Wait(0) => {}
                    ActionEffect::Wait(ms) => {
                        let until = self.clock_ms.saturating_add(ms);
                        self.resume_at = Some(until);
                        self.record(PreviewEventKind::Waiting {
                            step_id: self.step_id(index),
                            until_ms: until,
                        });
                        return Ok(());
                    }
                    ActionEffect::StartFlow(flow_id) => self.queue_flow(flow_id),
                    ActionEffect::CompleteFlow => {
                        self.finish(FinishReason::CompletedByAction);
                        return Ok(());
                    }
                }
            }
            let done_at = *self.actions_done_at.get_or_insert(self.clock_ms);

            let completion = &self.compiled.steps[index].completion;
            let reason = if completion.is_always_true() {
                if self.clock_ms < done_at.saturating_add(self.config.auto_advance_ms) {
                    return Ok(());
                }
                format!("auto-advanced after {} ms", self.config.auto_advance_ms)
            } else {
                let result = Evaluator::new(completion).eval(&self.player)?;
                if !result.satisfied {
                    return Ok(());
                }
                result.reason
            };

            self.complete(index, reason)?;
        }
        Ok(())
    }

    /// Runs the exit actions of the step at `index` and enters its successor.
    fn complete(&mut self, index: usize, reason: String) -> Result<(), PreviewError> {
        let step_id = self.step_id(index);
        log::info!("Completed step '{}': {}", step_id, reason);
        self.record(PreviewEventKind::StepCompleted {
            step_id: step_id.clone(),
            reason,
        });

        let exit_actions = self.compiled.steps[index].exit_actions.clone();
        for action in &exit_actions {
            let effect = self.handler.apply(action, &mut self.player, self.clock_ms);
            self.record(PreviewEventKind::ActionApplied {
                step_id: step_id.clone(),
                action: action.label(),
            });
            match effect {
                ActionEffect::Continue => {}
                // Exit actions never hold the flow.
                ActionEffect::Wait(ms) => {
                    log::debug!("Ignoring {} ms wait in exit actions of '{}'", ms, step_id)
                }
                ActionEffect::StartFlow(flow_id) => self.queue_flow(flow_id),
                ActionEffect::CompleteFlow => {
                    self.finish(FinishReason::CompletedByAction);
                    return Ok(());
                }
            }
        }

        self.player.clear_step_actions();
        let next = self.compiled.steps[index].next.map(|i| i as usize);
        self.enter(next, true)
    }

    fn queue_flow(&mut self, flow_id: String) {
        log::info!("Flow '{}' requested '{}'", self.flow.id, flow_id);
        self.record(PreviewEventKind::FlowQueued { flow_id });
    }

    fn finish(&mut self, reason: FinishReason) {
        log::info!("Preview of '{}' finished: {}", self.flow.id, reason);
        self.status = PreviewStatus::Finished(reason);
        self.current = None;
        self.pending.clear();
        self.resume_at = None;
        self.actions_done_at = None;
        if reason != FinishReason::VisitLimit {
            self.player.complete_flow(&self.flow.id);
        }
        self.record(PreviewEventKind::FlowFinished { reason });
    }
}
