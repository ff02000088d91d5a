pub mod action;
pub mod condition;
pub mod flow;
pub mod step;

pub use action::*;
pub use condition::*;
pub use flow::*;
pub use step::*;
