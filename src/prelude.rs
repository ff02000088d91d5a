//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the ftue crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use ftue::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let library = FlowLibrary::load("data/flows.json")?;
//! let player = PlayerState::from_file("data/player.json")?;
//!
//! let flow = library.get("onboarding_core_loop")?;
//! let mut preview = Preview::new(flow)?.with_player(player);
//! preview.start()?;
//! println!("{:?}", preview.status());
//! # Ok(())
//! # }
//! ```

// Data model
pub use crate::model::{
    Action, ActionKind, Character, Condition, ConditionType, ConditionValue, ContextType, Flow,
    FlowStatus, Operator, Step, StepCategory, Target,
};

// Authoring
pub use crate::editor::{ActionList, ConditionList, StepTemplate};
pub use crate::library::{FlowLibrary, StatusFilter};
pub use crate::validation::{Severity, ValidationReport, validate};

// Conditions
pub use crate::ast::{EvaluationTrace, Expression, InputSource, Value};
pub use crate::compiler::ConditionCompiler;
pub use crate::evaluator::{EvaluationResult, Evaluator};
pub use crate::state::PlayerState;
pub use crate::trace::TraceFormatter;

// Preview and publishing
pub use crate::preview::{Preview, PreviewConfig, PreviewEvent, PreviewStatus, SimulatedUi};
pub use crate::storage::PublishedFlow;

// Error types
pub use crate::error::{CompileError, EditError, EvaluationError, PreviewError, StorageError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
