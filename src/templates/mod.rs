//! Template instantiation and result rehoming.
//!
//! Templates are stamped out server-side (`POST /exam-templates/{id}/use`),
//! always producing an independent copy: mutating a template afterwards
//! never touches exams already created from it. Rehoming moves a result
//! to a different subject by creating a fresh exam/result pair and
//! deleting the original row; that sequence is not atomic and reports
//! partial failure distinctly (see [`EngineError::PartialRehome`]).

use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::api::{ExamApi, ExamCreate, ExamResultCreate, ExamResultUpdate};
use crate::error::EngineError;
use crate::model::{Exam, ExamResult, Subject};
use crate::scoring;

/// Outcome of [`TemplateManager::rehome_result`].
#[derive(Debug, Clone)]
pub enum RehomeOutcome {
    /// Subject unchanged; the existing row was updated in place.
    Updated(ExamResult),
    /// Subject changed; a new exam/result pair replaced the old result.
    Moved { exam: Exam, result: ExamResult },
}

pub struct TemplateManager<B: ExamApi> {
    api: Arc<B>,
}

impl<B: ExamApi> TemplateManager<B> {
    pub fn new(api: Arc<B>) -> Self {
        Self { api }
    }

    /// Create an exam (or template) after local validation. An empty
    /// title blocks the action before any network call is issued.
    pub async fn create_exam(&self, payload: ExamCreate) -> Result<Exam, EngineError> {
        if payload.title.trim().is_empty() {
            return Err(EngineError::Validation(vec![
                "exam title must not be empty".to_string(),
            ]));
        }
        self.api.create_exam(&payload).await
    }

    /// Stamp out a concrete exam for `group_id` from a template.
    ///
    /// The copy carries the template's title, subject, difficulty,
    /// comment, selected tasks and task topics, but no results. Fails
    /// with [`EngineError::NotFound`] when the template id does not
    /// resolve.
    pub async fn instantiate(&self, template_id: Uuid, group_id: Uuid) -> Result<Exam, EngineError> {
        self.api.use_template(template_id, group_id).await
    }

    /// Move a result to `new_subject`, or update it in place when the
    /// exam already has that subject.
    ///
    /// On a subject change: (1) create a new exam copying the old one's
    /// fields under the new subject, (2) create a result for the same
    /// student with `answers` resized to the new task list and scores
    /// recomputed, (3) delete the original result. Steps 2 and 3 failing
    /// leave an orphan exam behind; that is reported as
    /// [`EngineError::PartialRehome`] carrying the orphan's id so the
    /// caller can surface a recovery path instead of a clean error.
    pub async fn rehome_result(
        &self,
        result: &ExamResult,
        exam: &Exam,
        new_subject: &Subject,
        answers: Vec<Option<u32>>,
        student_comment: Option<String>,
    ) -> Result<RehomeOutcome, EngineError> {
        if exam.subject_id == Some(new_subject.id) {
            let scores = scoring::calculate(&answers, Some(new_subject));
            let updated = self
                .api
                .update_result(
                    exam.id,
                    result.id,
                    &ExamResultUpdate {
                        primary_score: Some(scores.primary),
                        final_score: Some(scores.final_score.to_wire()),
                        answers: Some(answers),
                        student_comment: Some(student_comment),
                        ..Default::default()
                    },
                )
                .await?;
            return Ok(RehomeOutcome::Updated(updated));
        }

        let new_exam = self
            .api
            .create_exam(&ExamCreate {
                group_id: exam.group_id,
                title: exam.title.clone(),
                subject: Some(new_subject.name.clone()),
                subject_id: Some(new_subject.id),
                date: exam.date,
                difficulty: exam.difficulty.clone(),
                threshold_score: exam.threshold_score,
                selected_tasks: Some(exam.selected_tasks.clone()),
                task_topics: Some(exam.task_topics.clone()),
                comment: exam.comment.clone(),
                is_template: Some(false),
            })
            .await?;

        // From here on the backend already holds the new exam; failures
        // leave it orphaned and must say so.
        match self
            .move_result_to(result, new_exam.id, new_subject, answers, student_comment)
            .await
        {
            Ok(new_result) => Ok(RehomeOutcome::Moved {
                exam: new_exam,
                result: new_result,
            }),
            Err(source) => {
                warn!(
                    orphan_exam_id = %new_exam.id,
                    "rehoming failed mid-sequence, exam left without results"
                );
                Err(EngineError::PartialRehome {
                    orphan_exam_id: new_exam.id,
                    source: Box::new(source),
                })
            }
        }
    }

    /// [`rehome_result`](Self::rehome_result) with the target subject
    /// resolved by id, the way the edit dialog hands it over.
    pub async fn rehome_to(
        &self,
        result: &ExamResult,
        exam: &Exam,
        new_subject_id: Uuid,
        answers: Vec<Option<u32>>,
        student_comment: Option<String>,
    ) -> Result<RehomeOutcome, EngineError> {
        let subject = self.api.get_subject(new_subject_id).await?;
        self.rehome_result(result, exam, &subject, answers, student_comment)
            .await
    }

    async fn move_result_to(
        &self,
        result: &ExamResult,
        new_exam_id: Uuid,
        new_subject: &Subject,
        answers: Vec<Option<u32>>,
        student_comment: Option<String>,
    ) -> Result<ExamResult, EngineError> {
        let resized = scoring::resize(&answers, scoring::task_count_for(Some(new_subject)));
        let scores = scoring::calculate(&resized, Some(new_subject));

        let new_result = self
            .api
            .create_result(
                new_exam_id,
                &ExamResultCreate {
                    student_id: result.student_id,
                    primary_score: Some(scores.primary),
                    final_score: scores.final_score.to_wire(),
                    answers: resized,
                    task_comments: None,
                    student_comment,
                },
            )
            .await?;

        self.api.delete_result(result.exam_id, result.id).await?;
        Ok(new_result)
    }
}
