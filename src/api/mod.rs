mod client;
mod payloads;

pub use client::{ExamApi, HttpExamApi};
pub use payloads::{ExamCreate, ExamResultCreate, ExamResultUpdate};
