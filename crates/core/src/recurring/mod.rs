//! Recurrence schedules and batch run reporting.
//!
//! This module holds the pure pieces of the recurring-item engine:
//! - Recurrence frequencies and calendar-aware date advancement
//! - The due-date predicate the scheduler selects rows with
//! - Batch report types accumulating per-row outcomes

pub mod report;
pub mod schedule;

pub use report::{BatchReport, RecurringKind, RowFailure};
pub use schedule::Frequency;
