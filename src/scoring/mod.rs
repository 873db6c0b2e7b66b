pub mod engine;
pub mod grid;
pub mod validation;

pub use engine::{average_final, calculate, FinalScore, Scores};
pub use grid::{blank, clamp_answer, resize, task_count_for, DEFAULT_TASK_COUNT};
pub use validation::validate_subject;
