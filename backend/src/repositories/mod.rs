//! Storage repositories
//!
//! Provides the data access layer over the per-user key/value store.

pub mod achievements;
pub mod completions;
pub mod plans;

pub use achievements::AchievementRepository;
pub use completions::CompletionRepository;
pub use plans::PlanRepository;
