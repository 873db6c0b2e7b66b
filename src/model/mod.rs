mod exam;
mod subject;

pub use exam::{Exam, ExamResult};
pub use subject::{ExamType, GradeBand, ScaleMarker, Subject, TaskConfig, TopicConfig};
