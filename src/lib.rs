//! # ftue - Tutorial Flow Authoring and Preview Engine
//!
//! **ftue** models the first-time-user-experience tutorials of a merge game:
//! a [`Flow`](model::Flow) is an ordered list of [`Step`](model::Step)s, each
//! step carries enter and exit [`Action`](model::Action)s, optional entry
//! conditions and the completion conditions that advance the flow.
//!
//! ## Core Workflow
//!
//! 1.  **Author**: Load a [`FlowLibrary`](library::FlowLibrary) from JSON and edit
//!     flows with the operations in [`editor`] (steps, actions, conditions, templates).
//! 2.  **Validate**: [`validation::validate`] reports errors that block publishing
//!     and warnings that do not.
//! 3.  **Preview**: A [`Preview`](preview::Preview) walks the flow on a virtual clock
//!     against a simulated player and UI, evaluating conditions with the same
//!     compiler and evaluator the published bundle uses.
//! 4.  **Publish**: [`FlowLibrary::publish`](library::FlowLibrary::publish) compiles the
//!     conditions into expressions and produces a bincode bundle for the game client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ftue::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut flow = Flow::new("first_merge", "First Merge");
//!     flow.add_step(
//!         Step::new("intro", "Intro", StepCategory::Ui)
//!             .with_action(Action::show_dialog("dlg_welcome", Character::Chris))
//!             .with_completion(Condition::user_action("click")),
//!     )?;
//!     flow.add_step(
//!         Step::new("tap_board", "Tap the board", StepCategory::Ui)
//!             .with_action(Action::highlight(Target::BoardButton))
//!             .with_completion(Condition::user_action("tap")),
//!     )?;
//!
//!     let report = validate(&flow);
//!     for issue in &report.issues {
//!         println!("{}", issue);
//!     }
//!
//!     let mut preview = Preview::new(&flow)?;
//!     preview.start()?;
//!     preview.perform("click", Target::Screen)?;
//!     preview.perform("tap", Target::BoardButton)?;
//!
//!     for event in preview.events() {
//!         println!("{}", event);
//!     }
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod compiler;
pub mod editor;
pub mod error;
pub mod evaluator;
pub mod library;
pub mod model;
pub mod prelude;
pub mod preview;
pub mod state;
pub mod storage;
pub mod trace;
pub mod validation;
