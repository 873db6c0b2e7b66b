use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Exam row: either a reusable template (`is_template`, no group) or a
/// concrete, group-bound instance stamped out from one.
///
/// `subject` is the legacy free-text name kept for old rows; new code
/// resolves the configuration through `subject_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: Uuid,
    #[serde(default)]
    pub group_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub subject_id: Option<Uuid>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub threshold_score: Option<u32>,
    /// 1-based task numbers actually used on this exam.
    #[serde(default)]
    pub selected_tasks: Vec<u32>,
    /// Task number (as string key, a backend storage quirk) to the topic
    /// names covered by that task.
    #[serde(default)]
    pub task_topics: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub comment: Option<String>,
    pub is_template: bool,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// One student's result on an exam.
///
/// `answers` is positional: index i holds the points earned on task i+1,
/// `None` meaning ungraded. `primary_score` and `final_score` are derived
/// and must always equal what [`crate::scoring::calculate`] produces for
/// `answers` under the exam's subject; the backend stores them verbatim
/// without recomputing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    #[serde(default)]
    pub primary_score: Option<u32>,
    #[serde(default)]
    pub final_score: Option<u32>,
    #[serde(default)]
    pub answers: Vec<Option<u32>>,
    #[serde(default)]
    pub task_comments: BTreeMap<String, String>,
    #[serde(default)]
    pub student_comment: Option<String>,
    #[serde(default)]
    pub added_by: Option<Uuid>,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
