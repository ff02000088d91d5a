//! Flow checks behind the editor's "Validate" button.
//!
//! Validation never fails; it collects every problem it finds into a
//! [`ValidationReport`]. Errors block publishing, warnings do not.

use crate::compiler::ConditionCompiler;
use crate::model::{Action, ActionKind, Condition, Flow, Step, Target};
use ahash::AHashSet;
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// The step the issue belongs to; `None` for flow-level issues.
    pub step_id: Option<String>,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.step_id {
            Some(step) => write!(f, "[{}] step '{}': {}", level, step, self.message),
            None => write!(f, "[{}] {}", level, self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when there are no errors; warnings are allowed.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Issues attached to one step.
    pub fn for_step<'a>(&'a self, step_id: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues
            .iter()
            .filter(move |i| i.step_id.as_deref() == Some(step_id))
    }

    fn error(&mut self, step_id: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Error, step_id, message.into());
    }

    fn warning(&mut self, step_id: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Warning, step_id, message.into());
    }

    fn push(&mut self, severity: Severity, step_id: Option<&str>, message: String) {
        self.issues.push(ValidationIssue {
            severity,
            step_id: step_id.map(str::to_string),
            message,
        });
    }
}

/// Validates a flow with the built-in condition parsers.
pub fn validate(flow: &Flow) -> ValidationReport {
    validate_with(flow, &ConditionCompiler::default())
}

/// Validates a flow, compiling its conditions with `compiler`.
pub fn validate_with(flow: &Flow, compiler: &ConditionCompiler) -> ValidationReport {
    let mut report = ValidationReport::default();

    if flow.id.trim().is_empty() {
        report.error(None, "Flow id is empty");
    }
    if flow.name.trim().is_empty() {
        report.error(None, "Flow name is empty");
    }
    if !(0..=100).contains(&flow.priority) {
        report.warning(
            None,
            format!("Priority {} is outside the usual 0..=100 range", flow.priority),
        );
    }
    if flow.steps.is_empty() {
        report.error(None, "Flow has no steps");
        return report;
    }

    for id in flow.steps.iter().map(|s| s.id.as_str()).duplicates() {
        report.error(Some(id), "Step id is used more than once");
    }
    for legacy in flow.steps.iter().map(|s| s.legacy).duplicates() {
        let ids = flow
            .steps
            .iter()
            .filter(|s| s.legacy == legacy)
            .map(|s| s.id.as_str())
            .join(", ");
        report.warning(
            None,
            format!("Legacy step number {} is shared by: {}", legacy, ids),
        );
    }

    for step in &flow.steps {
        check_step(flow, step, compiler, &mut report);
    }
    check_progression(flow, &mut report);

    log::debug!(
        "Validated flow '{}': {} error(s), {} warning(s)",
        flow.id,
        report.error_count(),
        report.warning_count()
    );
    report
}

fn check_step(flow: &Flow, step: &Step, compiler: &ConditionCompiler, report: &mut ValidationReport) {
    let id = Some(step.id.as_str());

    if step.id.trim().is_empty() {
        report.error(None, format!("Step '{}' has an empty id", step.name));
    }
    if step.name.trim().is_empty() {
        report.warning(id, "Step has no name");
    }
    if let Some(context) = &step.context {
        if context.context_value.trim().is_empty() {
            report.error(id, "Step context has an empty value");
        }
    }
    if step.actions.is_empty() {
        report.warning(id, "Step has no actions");
    }

    for (index, action) in step.actions.iter().enumerate() {
        if let Some(problem) = action_problem(flow, action) {
            report.error(id, format!("Action #{} ({}): {}", index + 1, action.name(), problem));
        }
    }
    for (index, action) in step.exit_actions.iter().enumerate() {
        if let Some(problem) = action_problem(flow, action) {
            report.error(
                id,
                format!("Exit action #{} ({}): {}", index + 1, action.name(), problem),
            );
        }
    }

    check_conditions(&step.entry_conditions, "Entry", id, compiler, report);
    check_conditions(&step.completion_conditions, "Completion", id, compiler, report);

    if let Some(next) = &step.next_step {
        if flow.step_index(next).is_none() {
            report.error(id, format!("Next step '{}' does not exist", next));
        }
    }
}

fn check_conditions(
    conditions: &[Condition],
    kind: &str,
    step_id: Option<&str>,
    compiler: &ConditionCompiler,
    report: &mut ValidationReport,
) {
    for condition in conditions {
        if let Err(e) = compiler.compile_one(condition) {
            report.error(step_id, format!("{} condition '{}': {}", kind, condition, e));
        }
    }
}

/// Returns what is missing from an action's payload, if anything.
fn action_problem(flow: &Flow, action: &Action) -> Option<String> {
    let needs_target = matches!(
        action.kind,
        ActionKind::HighlightElement
            | ActionKind::ShowFinger { .. }
            | ActionKind::LockInput
            | ActionKind::UnlockInput
    );
    if needs_target && action.target == Target::None {
        return Some("needs a target".to_string());
    }

    let empty = |s: &str| s.trim().is_empty();
    match &action.kind {
        ActionKind::ShowDialog { dialog_id, .. } if empty(dialog_id) => {
            Some("dialog id is empty".to_string())
        }
        ActionKind::ShowDialogBubble { text, .. } | ActionKind::ShowTooltip { text }
            if empty(text) =>
        {
            Some("text is empty".to_string())
        }
        ActionKind::ShadeScreen { opacity } if !(0.0..=1.0).contains(opacity) => {
            Some(format!("opacity {} is outside 0..=1", opacity))
        }
        ActionKind::AddItemOnBoard { item_id, .. } | ActionKind::RemoveItemFromBoard { item_id }
            if empty(item_id) =>
        {
            Some("item id is empty".to_string())
        }
        ActionKind::PlayAnimation { animation } if empty(animation) => {
            Some("animation name is empty".to_string())
        }
        ActionKind::GrantCurrency { currency, .. } if empty(currency) => {
            Some("currency is empty".to_string())
        }
        ActionKind::ActivateFeature { feature_id } if empty(feature_id) => {
            Some("feature id is empty".to_string())
        }
        ActionKind::Delay { duration_ms: 0 } => Some("delay must be longer than 0 ms".to_string()),
        ActionKind::StartFlow { flow_id } if empty(flow_id) => Some("flow id is empty".to_string()),
        ActionKind::StartFlow { flow_id } if *flow_id == flow.id => {
            Some("a flow cannot start itself".to_string())
        }
        ActionKind::SendAnalytics { event, .. } if empty(event) => {
            Some("event name is empty".to_string())
        }
        _ => None,
    }
}

/// Walks the flow from its first step the way the preview would and reports
/// loops and steps that can never be reached.
fn check_progression(flow: &Flow, report: &mut ValidationReport) {
    let mut visited = AHashSet::new();
    let mut current = Some(0);
    while let Some(index) = current {
        if !visited.insert(index) {
            report.error(
                Some(flow.steps[index].id.as_str()),
                "Next-step links form a loop back to this step",
            );
            break;
        }
        current = flow.next_index(index);
    }

    for (index, step) in flow.steps.iter().enumerate() {
        if !visited.contains(&index) {
            report.warning(Some(step.id.as_str()), "Step is never reached");
        }
    }
}
