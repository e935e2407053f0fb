//! TextShield Policy
//!
//! Turns resolved PII hits plus whole-text heuristics and the optional
//! semantic signal into a single [`Decision`]. [`Guard`] wires the pieces
//! together and is the pipeline's only entry point.

pub mod decision;
pub mod error;
pub mod guard;
pub mod heuristics;
pub mod policy;

pub use decision::{Decision, DecisionEngine, Signals, Verdict};
pub use error::{GuardError, Result};
pub use guard::{Guard, GuardConfig};
pub use heuristics::Heuristics;
pub use policy::{EnforcementAction, PolicyTable};
