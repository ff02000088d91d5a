use crate::model::{Action, ActionKind, BoardPosition, Character, Target};
use crate::state::PlayerState;
use ahash::AHashSet;
use std::collections::BTreeMap;

/// What the preview should do after an action was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    Continue,
    /// Hold the remaining actions of the step for this many milliseconds.
    Wait(u64),
    /// Another flow was requested; the preview records it and carries on.
    StartFlow(String),
    /// End the flow immediately.
    CompleteFlow,
}

/// Applies actions to a simulated game client.
///
/// The preview drives an implementation of this trait; [`SimulatedUi`] is
/// the default one. A custom handler can mirror actions into a real client.
pub trait ActionHandler {
    /// Applies one action. `now_ms` is the preview clock.
    fn apply(&mut self, action: &Action, player: &mut PlayerState, now_ms: u64) -> ActionEffect;

    /// Whether a user action aimed at `target` gets through the current locks.
    fn accepts_input(&self, target: &Target) -> bool;

    /// Called after an accepted user action.
    fn user_input(&mut self, _action: &str, _target: &Target) {}

    /// Returns to the state before the first action.
    fn reset(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState {
    pub dialog_id: String,
    pub character: Character,
    pub block_input: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleState {
    pub text: String,
    pub character: Character,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerState {
    pub target: Target,
    pub animation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipState {
    pub target: Target,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItem {
    pub item_id: String,
    pub position: Option<BoardPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub event: String,
    pub params: BTreeMap<String, String>,
    pub at_ms: u64,
}

/// The UI of the simulated client: what is locked, highlighted and shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulatedUi {
    pub dialog: Option<DialogState>,
    pub bubble: Option<BubbleState>,
    pub highlights: AHashSet<Target>,
    pub locked: AHashSet<Target>,
    pub lock_all: bool,
    pub finger: Option<FingerState>,
    /// Shade opacity; `None` when the screen is not shaded.
    pub shade: Option<f64>,
    pub tooltip: Option<TooltipState>,
    pub camera_focus: Option<Target>,
    /// Animations played so far, in order.
    pub animations: Vec<(Target, String)>,
    /// Items placed by the flow, in order.
    pub board: Vec<BoardItem>,
    pub analytics: Vec<AnalyticsEvent>,
}

impl SimulatedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighted(&self, target: &Target) -> bool {
        self.highlights.contains(target)
    }

    pub fn is_locked(&self, target: &Target) -> bool {
        !self.accepts_input(target)
    }
}

impl ActionHandler for SimulatedUi {
    fn apply(&mut self, action: &Action, player: &mut PlayerState, now_ms: u64) -> ActionEffect {
        let target = &action.target;
        match &action.kind {
            ActionKind::ShowDialog {
                dialog_id,
                character,
                block_input,
            } => {
                self.dialog = Some(DialogState {
                    dialog_id: dialog_id.clone(),
                    character: *character,
                    block_input: *block_input,
                });
            }
            ActionKind::HideDialog => self.dialog = None,
            ActionKind::ShowDialogBubble { text, character } => {
                self.bubble = Some(BubbleState {
                    text: text.clone(),
                    character: *character,
                });
            }
            ActionKind::HighlightElement => {
                self.highlights.insert(target.clone());
            }
            ActionKind::RemoveHighlight => {
                if *target == Target::None {
                    self.highlights.clear();
                } else {
                    self.highlights.remove(target);
                }
            }
            ActionKind::ShowFinger { animation } => {
                self.finger = Some(FingerState {
                    target: target.clone(),
                    animation: animation.clone(),
                });
            }
            ActionKind::HideFinger => self.finger = None,
            ActionKind::ShadeScreen { opacity } => self.shade = Some(*opacity),
            ActionKind::UnshadeScreen => self.shade = None,
            ActionKind::LockInput => {
                self.locked.insert(target.clone());
            }
            ActionKind::UnlockInput => {
                self.locked.remove(target);
            }
            ActionKind::LockAllInput => self.lock_all = true,
            ActionKind::UnlockAllInput => {
                self.lock_all = false;
                self.locked.clear();
            }
            ActionKind::ShowTooltip { text } => {
                self.tooltip = Some(TooltipState {
                    target: target.clone(),
                    text: text.clone(),
                });
            }
            ActionKind::HideTooltip => self.tooltip = None,
            ActionKind::AddItemOnBoard { item_id, position } => {
                self.board.push(BoardItem {
                    item_id: item_id.clone(),
                    position: *position,
                });
                player.add_item(item_id);
            }
            ActionKind::RemoveItemFromBoard { item_id } => {
                if let Some(index) = self.board.iter().rposition(|i| i.item_id == *item_id) {
                    self.board.remove(index);
                }
                if !player.remove_item(item_id) {
                    log::warn!("remove_item_from_board: '{}' is not on the board", item_id);
                }
            }
            ActionKind::CameraMove { duration_ms } => {
                self.camera_focus = Some(target.clone());
                if *duration_ms > 0 {
                    return ActionEffect::Wait(*duration_ms);
                }
            }
            ActionKind::PlayAnimation { animation } => {
                self.animations.push((target.clone(), animation.clone()));
            }
            ActionKind::GrantCurrency { currency, amount } => player.grant(currency, *amount),
            ActionKind::ActivateFeature { feature_id } => player.activate_feature(feature_id),
            ActionKind::Delay { duration_ms } => return ActionEffect::Wait(*duration_ms),
            ActionKind::StartFlow { flow_id } => return ActionEffect::StartFlow(flow_id.clone()),
            ActionKind::CompleteFlow => return ActionEffect::CompleteFlow,
            ActionKind::SendAnalytics { event, params } => {
                self.analytics.push(AnalyticsEvent {
                    event: event.clone(),
                    params: params.clone(),
                    at_ms: now_ms,
                });
            }
        }
        ActionEffect::Continue
    }

    /// Explicitly locked targets never accept input. Generic screen input
    /// gets through otherwise; element input is blocked by an input-blocking
    /// dialog, and by lock-all unless the element is highlighted.
    fn accepts_input(&self, target: &Target) -> bool {
        if self.locked.contains(target) {
            return false;
        }
        match target {
            Target::None | Target::Screen => true,
            _ => {
                let dialog_blocks = self.dialog.as_ref().is_some_and(|d| d.block_input);
                !dialog_blocks && (!self.lock_all || self.highlights.contains(target))
            }
        }
    }

    /// A tap on the screen dismisses an open dialog.
    fn user_input(&mut self, _action: &str, target: &Target) {
        if matches!(target, Target::None | Target::Screen) {
            self.dialog = None;
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
