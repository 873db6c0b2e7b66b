//! In-memory [`ExamApi`] double used by template and session tests.
//!
//! Records every mutating call, can fail on demand, and can delay
//! individual result saves so overlapping-request ordering is testable
//! under tokio's paused clock.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::api::{ExamApi, ExamCreate, ExamResultCreate, ExamResultUpdate};
use crate::error::EngineError;
use crate::model::{Exam, ExamResult, Subject};

#[derive(Debug, Clone)]
pub enum Call {
    CreateExam(ExamCreate),
    UseTemplate { template_id: Uuid, group_id: Uuid },
    CreateResult { exam_id: Uuid, payload: ExamResultCreate },
    UpdateResult { exam_id: Uuid, result_id: Uuid, payload: ExamResultUpdate },
    DeleteResult { exam_id: Uuid, result_id: Uuid },
}

#[derive(Default)]
struct Inner {
    subjects: HashMap<Uuid, Subject>,
    templates: HashMap<Uuid, Exam>,
    results: HashMap<Uuid, ExamResult>,
    calls: Vec<Call>,
    fail_create_result: bool,
    fail_update_result: bool,
    fail_delete_result: bool,
    /// Per-call artificial latency for result saves, consumed in order.
    save_delays: VecDeque<Duration>,
}

#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_subject(&self, subject: Subject) {
        self.inner.lock().unwrap().subjects.insert(subject.id, subject);
    }

    pub fn put_template(&self, template: Exam) {
        self.inner.lock().unwrap().templates.insert(template.id, template);
    }

    pub fn put_result(&self, result: ExamResult) {
        self.inner.lock().unwrap().results.insert(result.id, result);
    }

    pub fn fail_create_result(&self, fail: bool) {
        self.inner.lock().unwrap().fail_create_result = fail;
    }

    pub fn fail_update_result(&self, fail: bool) {
        self.inner.lock().unwrap().fail_update_result = fail;
    }

    pub fn fail_delete_result(&self, fail: bool) {
        self.inner.lock().unwrap().fail_delete_result = fail;
    }

    pub fn push_save_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().save_delays.push_back(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn result(&self, id: Uuid) -> Option<ExamResult> {
        self.inner.lock().unwrap().results.get(&id).cloned()
    }

    /// Update calls recorded so far, oldest first.
    pub fn update_calls(&self) -> Vec<ExamResultUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::UpdateResult { payload, .. } => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn create_result_calls(&self) -> Vec<ExamResultCreate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateResult { payload, .. } => Some(payload),
                _ => None,
            })
            .collect()
    }

    fn injected_failure() -> EngineError {
        EngineError::Http(StatusCode::INTERNAL_SERVER_ERROR)
    }

    async fn take_delay(&self) {
        let delay = self.inner.lock().unwrap().save_delays.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn exam_from_create(payload: &ExamCreate) -> Exam {
    Exam {
        id: Uuid::new_v4(),
        group_id: payload.group_id,
        title: payload.title.clone(),
        subject: payload.subject.clone(),
        subject_id: payload.subject_id,
        date: payload.date,
        difficulty: payload.difficulty.clone(),
        threshold_score: payload.threshold_score,
        selected_tasks: payload.selected_tasks.clone().unwrap_or_default(),
        task_topics: payload.task_topics.clone().unwrap_or_default(),
        comment: payload.comment.clone(),
        is_template: payload.is_template.unwrap_or(false),
        created_by: None,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl ExamApi for FakeBackend {
    async fn get_subject(&self, id: Uuid) -> Result<Subject, EngineError> {
        self.inner
            .lock()
            .unwrap()
            .subjects
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound { kind: "subject", id })
    }

    async fn create_exam(&self, payload: &ExamCreate) -> Result<Exam, EngineError> {
        let exam = exam_from_create(payload);
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CreateExam(payload.clone()));
        Ok(exam)
    }

    async fn get_exam_template(&self, id: Uuid) -> Result<Exam, EngineError> {
        self.inner
            .lock()
            .unwrap()
            .templates
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound { kind: "exam template", id })
    }

    async fn use_template(&self, template_id: Uuid, group_id: Uuid) -> Result<Exam, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::UseTemplate { template_id, group_id });
        let template = inner
            .templates
            .get(&template_id)
            .cloned()
            .ok_or(EngineError::NotFound { kind: "exam template", id: template_id })?;
        // Server-side copy: same fields, new identity, bound to the group
        Ok(Exam {
            id: Uuid::new_v4(),
            group_id: Some(group_id),
            is_template: false,
            created_at: Utc::now(),
            ..template
        })
    }

    async fn list_results(&self, exam_id: Uuid) -> Result<Vec<ExamResult>, EngineError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .results
            .values()
            .filter(|r| r.exam_id == exam_id)
            .cloned()
            .collect())
    }

    async fn create_result(
        &self,
        exam_id: Uuid,
        payload: &ExamResultCreate,
    ) -> Result<ExamResult, EngineError> {
        self.take_delay().await;
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CreateResult { exam_id, payload: payload.clone() });
        if inner.fail_create_result {
            return Err(Self::injected_failure());
        }
        let result = ExamResult {
            id: Uuid::new_v4(),
            exam_id,
            student_id: payload.student_id,
            primary_score: payload.primary_score,
            final_score: payload.final_score,
            answers: payload.answers.clone(),
            task_comments: payload.task_comments.clone().unwrap_or_default(),
            student_comment: payload.student_comment.clone(),
            added_by: None,
            added_at: Utc::now(),
            updated_at: None,
        };
        inner.results.insert(result.id, result.clone());
        Ok(result)
    }

    async fn update_result(
        &self,
        exam_id: Uuid,
        result_id: Uuid,
        payload: &ExamResultUpdate,
    ) -> Result<ExamResult, EngineError> {
        self.take_delay().await;
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::UpdateResult {
            exam_id,
            result_id,
            payload: payload.clone(),
        });
        if inner.fail_update_result {
            return Err(Self::injected_failure());
        }
        let result = inner
            .results
            .get_mut(&result_id)
            .ok_or(EngineError::NotFound { kind: "exam result", id: result_id })?;
        if let Some(primary) = payload.primary_score {
            result.primary_score = Some(primary);
        }
        if let Some(final_score) = payload.final_score {
            result.final_score = final_score;
        }
        if let Some(ref answers) = payload.answers {
            result.answers = answers.clone();
        }
        if let Some(ref comment) = payload.student_comment {
            result.student_comment = comment.clone();
        }
        result.updated_at = Some(Utc::now());
        Ok(result.clone())
    }

    async fn delete_result(&self, exam_id: Uuid, result_id: Uuid) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DeleteResult { exam_id, result_id });
        if inner.fail_delete_result {
            return Err(Self::injected_failure());
        }
        inner.results.remove(&result_id);
        Ok(())
    }
}
