use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Body for `POST /exams` and `POST /exam-templates`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExamCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    pub title: String,
    /// Legacy free-text subject name, kept alongside `subject_id` for old
    /// rows that predate subject configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_tasks: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_topics: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
}

/// Body for `POST /exams/{exam_id}/results`.
///
/// `primary_score` and `final_score` are computed by the caller (the
/// backend stores them without recomputing), so they must come from
/// [`crate::scoring::calculate`] over the same `answers`.
#[derive(Debug, Clone, Serialize)]
pub struct ExamResultCreate {
    pub student_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_score: Option<u32>,
    pub final_score: Option<u32>,
    pub answers: Vec<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_comments: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_comment: Option<String>,
}

/// Body for `PATCH /exams/{exam_id}/results/{result_id}`. Absent fields
/// are left untouched by the backend.
///
/// Nullable fields are doubly optional: the outer `None` omits the
/// field, `Some(None)` sends an explicit null, so an unscored result or
/// a cleared comment reach the backend instead of being skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExamResultUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<Option<u32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_comments: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_comment: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<Option<Uuid>>,
}
