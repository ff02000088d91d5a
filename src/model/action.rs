use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The UI element or game object an action is aimed at.
///
/// In JSON every target is a plain name, e.g. `"BoardButton"` or `"btn_settings"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(from = "String", into = "String")]
pub enum Target {
    #[default]
    None,
    Screen,
    BoardButton,
    Generator,
    MergeBoard,
    TaskPanel,
    Inventory,
    ShopButton,
    Currency,
    Character,
    /// Any other element, addressed by its scene name.
    Element(String),
}

impl Target {
    /// Parses a target name as written in scripts and on the command line.
    /// Unknown names become [`Target::Element`].
    pub fn parse(name: &str) -> Target {
        match name {
            "" | "None" => Target::None,
            "Screen" => Target::Screen,
            "BoardButton" => Target::BoardButton,
            "Generator" => Target::Generator,
            "MergeBoard" => Target::MergeBoard,
            "TaskPanel" => Target::TaskPanel,
            "Inventory" => Target::Inventory,
            "ShopButton" => Target::ShopButton,
            "Currency" => Target::Currency,
            "Character" => Target::Character,
            other => Target::Element(other.to_string()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Element(name) => write!(f, "{}", name),
            other => write!(f, "{:?}", other),
        }
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::parse(&name)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

/// The dialog character roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    #[default]
    Chris,
    Kara,
    Benny,
    Leslie,
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Character::Chris => "chris",
            Character::Kara => "kara",
            Character::Benny => "benny",
            Character::Leslie => "leslie",
        };
        f.write_str(name)
    }
}

/// A cell on the merge board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct BoardPosition {
    pub x: u32,
    pub y: u32,
}

/// Picker grouping for action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Ui,
    Game,
    Analytics,
    Flow,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 4] = [
        ActionCategory::Ui,
        ActionCategory::Game,
        ActionCategory::Analytics,
        ActionCategory::Flow,
    ];

    /// Action kind names offered by the picker under this category.
    pub fn kinds(self) -> Vec<&'static str> {
        ActionKind::NAMES
            .iter()
            .copied()
            .filter(|name| {
                ActionKind::from_name(name).is_some_and(|kind| kind.category() == self)
            })
            .collect()
    }
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    0.7
}

/// Type-specific payload of an action, tagged by `Type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(tag = "Type", rename_all_fields = "camelCase")]
pub enum ActionKind {
    ShowDialog {
        dialog_id: String,
        #[serde(default)]
        character: Character,
        #[serde(default = "default_true")]
        block_input: bool,
    },
    HideDialog,
    ShowDialogBubble {
        text: String,
        #[serde(default)]
        character: Character,
    },
    HighlightElement,
    RemoveHighlight,
    ShowFinger {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        animation: Option<String>,
    },
    HideFinger,
    ShadeScreen {
        #[serde(default = "default_opacity")]
        opacity: f64,
    },
    UnshadeScreen,
    LockInput,
    UnlockInput,
    LockAllInput,
    UnlockAllInput,
    ShowTooltip {
        text: String,
    },
    HideTooltip,
    AddItemOnBoard {
        item_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<BoardPosition>,
    },
    RemoveItemFromBoard {
        item_id: String,
    },
    CameraMove {
        #[serde(default)]
        duration_ms: u64,
    },
    PlayAnimation {
        animation: String,
    },
    GrantCurrency {
        currency: String,
        amount: f64,
    },
    ActivateFeature {
        feature_id: String,
    },
    Delay {
        duration_ms: u64,
    },
    StartFlow {
        flow_id: String,
    },
    CompleteFlow,
    SendAnalytics {
        event: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        params: BTreeMap<String, String>,
    },
}

impl ActionKind {
    /// Every action kind name, in picker order.
    pub const NAMES: [&'static str; 25] = [
        "show_dialog",
        "hide_dialog",
        "show_dialog_bubble",
        "highlight_element",
        "remove_highlight",
        "show_finger",
        "hide_finger",
        "shade_screen",
        "unshade_screen",
        "lock_input",
        "unlock_input",
        "lock_all_input",
        "unlock_all_input",
        "show_tooltip",
        "hide_tooltip",
        "add_item_on_board",
        "remove_item_from_board",
        "camera_move",
        "play_animation",
        "grant_currency",
        "activate_feature",
        "delay",
        "start_flow",
        "complete_flow",
        "send_analytics",
    ];

    /// Snake-case name of the kind, as used by the picker and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::ShowDialog { .. } => "show_dialog",
            ActionKind::HideDialog => "hide_dialog",
            ActionKind::ShowDialogBubble { .. } => "show_dialog_bubble",
            ActionKind::HighlightElement => "highlight_element",
            ActionKind::RemoveHighlight => "remove_highlight",
            ActionKind::ShowFinger { .. } => "show_finger",
            ActionKind::HideFinger => "hide_finger",
            ActionKind::ShadeScreen { .. } => "shade_screen",
            ActionKind::UnshadeScreen => "unshade_screen",
            ActionKind::LockInput => "lock_input",
            ActionKind::UnlockInput => "unlock_input",
            ActionKind::LockAllInput => "lock_all_input",
            ActionKind::UnlockAllInput => "unlock_all_input",
            ActionKind::ShowTooltip { .. } => "show_tooltip",
            ActionKind::HideTooltip => "hide_tooltip",
            ActionKind::AddItemOnBoard { .. } => "add_item_on_board",
            ActionKind::RemoveItemFromBoard { .. } => "remove_item_from_board",
            ActionKind::CameraMove { .. } => "camera_move",
            ActionKind::PlayAnimation { .. } => "play_animation",
            ActionKind::GrantCurrency { .. } => "grant_currency",
            ActionKind::ActivateFeature { .. } => "activate_feature",
            ActionKind::Delay { .. } => "delay",
            ActionKind::StartFlow { .. } => "start_flow",
            ActionKind::CompleteFlow => "complete_flow",
            ActionKind::SendAnalytics { .. } => "send_analytics",
        }
    }

    pub fn category(&self) -> ActionCategory {
        match self {
            ActionKind::AddItemOnBoard { .. }
            | ActionKind::RemoveItemFromBoard { .. }
            | ActionKind::CameraMove { .. }
            | ActionKind::PlayAnimation { .. }
            | ActionKind::GrantCurrency { .. }
            | ActionKind::ActivateFeature { .. } => ActionCategory::Game,
            ActionKind::Delay { .. } | ActionKind::StartFlow { .. } | ActionKind::CompleteFlow => {
                ActionCategory::Flow
            }
            ActionKind::SendAnalytics { .. } => ActionCategory::Analytics,
            _ => ActionCategory::Ui,
        }
    }

    /// Builds a kind with empty or default payload from its name, the way the
    /// action picker seeds a new action before its fields are filled in.
    pub fn from_name(name: &str) -> Option<ActionKind> {
        let kind = match name {
            "show_dialog" => ActionKind::ShowDialog {
                dialog_id: String::new(),
                character: Character::default(),
                block_input: true,
            },
            "hide_dialog" => ActionKind::HideDialog,
            "show_dialog_bubble" => ActionKind::ShowDialogBubble {
                text: String::new(),
                character: Character::default(),
            },
            "highlight_element" => ActionKind::HighlightElement,
            "remove_highlight" => ActionKind::RemoveHighlight,
            "show_finger" => ActionKind::ShowFinger { animation: None },
            "hide_finger" => ActionKind::HideFinger,
            "shade_screen" => ActionKind::ShadeScreen {
                opacity: default_opacity(),
            },
            "unshade_screen" => ActionKind::UnshadeScreen,
            "lock_input" => ActionKind::LockInput,
            "unlock_input" => ActionKind::UnlockInput,
            "lock_all_input" => ActionKind::LockAllInput,
            "unlock_all_input" => ActionKind::UnlockAllInput,
            "show_tooltip" => ActionKind::ShowTooltip {
                text: String::new(),
            },
            "hide_tooltip" => ActionKind::HideTooltip,
            "add_item_on_board" => ActionKind::AddItemOnBoard {
                item_id: String::new(),
                position: None,
            },
            "remove_item_from_board" => ActionKind::RemoveItemFromBoard {
                item_id: String::new(),
            },
            "camera_move" => ActionKind::CameraMove { duration_ms: 0 },
            "play_animation" => ActionKind::PlayAnimation {
                animation: String::new(),
            },
            "grant_currency" => ActionKind::GrantCurrency {
                currency: "coins".to_string(),
                amount: 0.0,
            },
            "activate_feature" => ActionKind::ActivateFeature {
                feature_id: String::new(),
            },
            "delay" => ActionKind::Delay { duration_ms: 0 },
            "start_flow" => ActionKind::StartFlow {
                flow_id: String::new(),
            },
            "complete_flow" => ActionKind::CompleteFlow,
            "send_analytics" => ActionKind::SendAnalytics {
                event: String::new(),
                params: BTreeMap::new(),
            },
            _ => return None,
        };
        Some(kind)
    }
}

/// A single effect applied when a step is entered or exited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,
    #[serde(rename = "Target", default)]
    pub target: Target,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            target: Target::None,
        }
    }

    pub fn on(kind: ActionKind, target: Target) -> Self {
        Self { kind, target }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The name with underscores replaced, e.g. "show dialog".
    pub fn label(&self) -> String {
        self.kind.name().replace('_', " ")
    }

    pub fn show_dialog(dialog_id: &str, character: Character) -> Self {
        Self::new(ActionKind::ShowDialog {
            dialog_id: dialog_id.to_string(),
            character,
            block_input: true,
        })
    }

    pub fn highlight(target: Target) -> Self {
        Self::on(ActionKind::HighlightElement, target)
    }

    pub fn show_finger(target: Target) -> Self {
        Self::on(ActionKind::ShowFinger { animation: None }, target)
    }

    pub fn delay(duration_ms: u64) -> Self {
        Self::new(ActionKind::Delay { duration_ms })
    }

    pub fn analytics(event: &str) -> Self {
        Self::new(ActionKind::SendAnalytics {
            event: event.to_string(),
            params: BTreeMap::new(),
        })
    }
}
