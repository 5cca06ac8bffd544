//! FitPlan Shared Library
//!
//! Pure progress and streak analytics for structured workout and diet plans,
//! plus the best-effort parser that turns AI-generated plan text into those
//! plans. Used by the backend and the WASM module.

pub mod achievements;
pub mod calendar;
pub mod completion;
pub mod consistency;
pub mod day_status;
pub mod errors;
pub mod history;
pub mod parser;
pub mod plan;
pub mod progress;
pub mod streaks;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use achievements::{AchievementLedger, Milestone, UnlockedAchievement};
pub use calendar::{current_week_number, project_plan, project_week, DatedDayInstance, ProjectedWeek};
pub use completion::{completion_key, CompletionLog};
pub use day_status::{classify, DayProgress, DayStatus, WeekView};
pub use errors::*;
pub use history::HistoryEntry;
pub use plan::{diet_index_for, workout_index_for, DayTemplate, MealType, Plan, PlanItem, PlanKind};
pub use progress::{compute_progress, ProgressInputs, ProgressOutcome, ProgressSummary};
pub use streaks::{StreakSnapshot, Track, TrackStreaks};
