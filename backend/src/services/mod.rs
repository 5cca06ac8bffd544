//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the plan cache, and the shared analytics engine.

pub mod completions;
pub mod plans;
pub mod progress;

pub use completions::CompletionService;
pub use plans::PlanService;
pub use progress::ProgressService;
