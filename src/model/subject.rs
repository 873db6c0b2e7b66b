use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State exam kind a subject is configured for.
///
/// The wire values are the Russian exam names used by the backend and by
/// every stored subject row, so they are preserved verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamType {
    #[serde(rename = "ЕГЭ")]
    Ege,
    #[serde(rename = "ОГЭ")]
    Oge,
}

/// One graded unit within a subject: a label shown in the grid header and
/// the maximum score a student can earn on it.
///
/// Inner config objects are stored camelCase by the backend, unlike the
/// snake_case row columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub label: String,
    #[serde(rename = "maxScore")]
    pub max_score: u32,
}

/// Inclusive primary-score range mapped to a single grade (2-5).
/// Used by ОГЭ-type subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBand {
    pub grade: u8,
    pub min: u32,
    pub max: u32,
}

impl GradeBand {
    pub fn contains(&self, primary: u32) -> bool {
        self.min <= primary && primary <= self.max
    }
}

/// Topic tag attached to a set of task numbers (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    pub topic: String,
    #[serde(rename = "taskNumbers")]
    pub task_numbers: Vec<u32>,
}

/// Annotation point on the primary-to-secondary scale (passing line,
/// average, end of part 1). Display-only: the engine carries these but
/// never computes with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleMarker {
    pub id: String,
    #[serde(rename = "primaryScore")]
    pub primary_score: u32,
    #[serde(rename = "secondaryScore")]
    pub secondary_score: u32,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
}

/// Subject row with its full exam configuration.
///
/// Produced and edited by the configuration editor; the engine treats it
/// as read-only input. Consistency rules (scale length, band overlap) are
/// checked by [`crate::scoring::validation`] at save time, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub exam_type: Option<ExamType>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
    /// ЕГЭ conversion table: index = primary score, value = final test
    /// score 0-100. Expected length is total possible primary + 1, but
    /// the calculator saturates rather than enforcing it.
    #[serde(default)]
    pub primary_to_secondary_scale: Vec<u32>,
    #[serde(default)]
    pub scale_markers: Vec<ScaleMarker>,
    /// ОГЭ grade table, evaluated in stored order.
    #[serde(default)]
    pub grade_scale: Vec<GradeBand>,
    #[serde(default)]
    pub topics: Vec<TopicConfig>,
}

fn default_true() -> bool {
    true
}

impl Subject {
    /// Total primary score achievable across all configured tasks.
    pub fn max_primary(&self) -> u32 {
        self.tasks.iter().map(|t| t.max_score).sum()
    }

    /// Max score for a 1-based task number, if that task exists.
    pub fn task_max_score(&self, task_number: u32) -> Option<u32> {
        if task_number == 0 {
            return None;
        }
        self.tasks
            .get(task_number as usize - 1)
            .map(|t| t.max_score)
    }
}
