//! Exam scoring and configuration engine for the tutoring-center back
//! office.
//!
//! The crate turns a subject's task and score-conversion configuration
//! plus a student's per-task answers into a primary and final score,
//! stamps concrete exams out of reusable templates, and keeps per-student
//! result edits in sync with the REST backend through a debounced,
//! per-student save pipeline.
//!
//! - [`scoring`]: the pure calculator, answer-grid reconciliation and
//!   subject-save-time validation.
//! - [`templates`]: template instantiation and result rehoming.
//! - [`session`]: the keyed edit-buffer store with debounced saves.
//! - [`api`]: the backend trait and its reqwest implementation.

pub mod api;
pub mod error;
pub mod model;
pub mod scoring;
pub mod session;
pub mod templates;

#[cfg(test)]
pub(crate) mod testutil;

pub use api::{ExamApi, HttpExamApi};
pub use error::EngineError;
pub use model::{Exam, ExamResult, ExamType, GradeBand, Subject, TaskConfig, TopicConfig};
pub use scoring::{calculate, FinalScore, Scores};
pub use session::{ResultEditingSession, SavePhase};
pub use templates::{RehomeOutcome, TemplateManager};
