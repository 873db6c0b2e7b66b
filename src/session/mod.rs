//! Per-student result editing with debounced persistence.
//!
//! Every edit lands in a keyed buffer and restarts that student's 500 ms
//! debounce timer; other students' timers are untouched. When a timer
//! fires it snapshots the buffer, recomputes both derived scores and
//! ships the row to the backend (create on first save, patch after).
//! Requests already in flight are never cancelled, so overlapping saves
//! for one student are possible and resolve last-response-wins: the
//! response that arrives last determines the displayed save state.

mod store;

pub use store::{EditStore, ResultEditBuffer, SavePhase, SaveSnapshot};

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{ExamApi, ExamResultCreate, ExamResultUpdate};
use crate::model::{ExamResult, Subject};
use crate::scoring;

/// Debounce window per student id.
pub const DEBOUNCE: Duration = Duration::from_millis(500);
/// Minimum time the "saved" indicator stays visible after a successful
/// round-trip, however fast the backend answered.
pub const SAVED_HOLD: Duration = Duration::from_millis(1000);

/// Editing session for one exam's result grid.
///
/// Cheap to clone; all clones share the buffer store. Drop the session
/// (or call [`teardown`](Self::teardown)) when the view unmounts or the
/// exam changes.
pub struct ResultEditingSession<B: ExamApi> {
    inner: Arc<Inner<B>>,
}

impl<B: ExamApi> Clone for ResultEditingSession<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<B: ExamApi> {
    api: Arc<B>,
    exam_id: Uuid,
    state: Mutex<SessionState>,
}

/// Subject configuration and edit buffers, mutated together under one
/// lock so a buffer's length always matches the current task list.
struct SessionState {
    subject: Option<Subject>,
    store: EditStore,
}

impl<B: ExamApi + 'static> ResultEditingSession<B> {
    pub fn new(api: Arc<B>, exam_id: Uuid, subject: Option<Subject>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                exam_id,
                state: Mutex::new(SessionState {
                    subject,
                    store: EditStore::new(),
                }),
            }),
        }
    }

    /// Swap in a new subject configuration mid-session, after its task
    /// list was edited and saved. Every student's buffer is realigned to
    /// the new task count: values at surviving positions are kept, a
    /// grown tail fills with nulls.
    pub fn set_subject(&self, subject: Option<Subject>) {
        let mut state = self.inner.state.lock().unwrap();
        state.subject = subject;
        let task_count = scoring::task_count_for(state.subject.as_ref());
        state.store.resize_all(task_count);
    }

    /// Seed a student's buffer from their stored result, or from an
    /// all-null vector of the subject's task count (27 when no tasks are
    /// configured) for a student with no prior result. Existing answers
    /// are resized to the current task list first.
    pub fn begin_student(&self, student_id: Uuid, existing: Option<&ExamResult>) {
        let mut state = self.inner.state.lock().unwrap();
        let task_count = scoring::task_count_for(state.subject.as_ref());
        match existing {
            Some(result) => state.store.seed(
                student_id,
                Some(result.id),
                scoring::resize(&result.answers, task_count),
                result.student_comment.clone(),
            ),
            None => state.store.seed(student_id, None, scoring::blank(task_count), None),
        }
    }

    /// Load the exam's stored results and seed a buffer for each, the
    /// way the grid does when it opens. Returns the rows for display.
    pub async fn load_results(&self) -> Result<Vec<ExamResult>, crate::error::EngineError> {
        let results = self.inner.api.list_results(self.inner.exam_id).await?;
        for result in &results {
            self.begin_student(result.student_id, Some(result));
        }
        Ok(results)
    }

    /// Set one answer cell (0-based task index). The value is clamped to
    /// the task's maxScore here, at data entry; the calculator never
    /// clamps. Restarts this student's debounce timer.
    pub fn edit_answer(&self, student_id: Uuid, task_index: usize, value: Option<u32>) {
        let epoch = {
            let mut state = self.inner.state.lock().unwrap();
            let clamped = value.map(|v| {
                let max = state
                    .subject
                    .as_ref()
                    .and_then(|s| s.task_max_score(task_index as u32 + 1));
                match max {
                    Some(max) => scoring::clamp_answer(v, max),
                    None => v,
                }
            });
            if !state.store.contains(student_id) {
                let task_count = scoring::task_count_for(state.subject.as_ref());
                state.store.seed(student_id, None, scoring::blank(task_count), None);
            }
            let buffer = state
                .store
                .buffer_mut(student_id)
                .expect("buffer seeded above");
            if task_index >= buffer.answers.len() {
                return;
            }
            buffer.answers[task_index] = clamped;
            state.store.record_edit(student_id)
        };
        if let Some(epoch) = epoch {
            self.schedule_save(student_id, epoch);
        }
    }

    /// Set the free-text comment on a student's result. Debounced like
    /// answer edits.
    pub fn edit_comment(&self, student_id: Uuid, comment: Option<String>) {
        let epoch = {
            let mut state = self.inner.state.lock().unwrap();
            if !state.store.contains(student_id) {
                let task_count = scoring::task_count_for(state.subject.as_ref());
                state.store.seed(student_id, None, scoring::blank(task_count), None);
            }
            let buffer = state
                .store
                .buffer_mut(student_id)
                .expect("buffer seeded above");
            buffer.student_comment = comment;
            state.store.record_edit(student_id)
        };
        if let Some(epoch) = epoch {
            self.schedule_save(student_id, epoch);
        }
    }

    /// Current save phase for a student, `Idle` when unseeded.
    pub fn phase(&self, student_id: Uuid) -> SavePhase {
        self.inner
            .state
            .lock()
            .unwrap()
            .store
            .buffer(student_id)
            .map(|b| b.phase.clone())
            .unwrap_or(SavePhase::Idle)
    }

    /// The locally displayed answers for a student, pending edits
    /// included.
    pub fn answers(&self, student_id: Uuid) -> Option<Vec<Option<u32>>> {
        self.inner
            .state
            .lock()
            .unwrap()
            .store
            .buffer(student_id)
            .map(|b| b.answers.clone())
    }

    /// Scores the grid currently shows for a student, derived from the
    /// buffer exactly as a save would derive them.
    pub fn displayed_scores(&self, student_id: Uuid) -> Option<scoring::Scores> {
        let state = self.inner.state.lock().unwrap();
        state
            .store
            .buffer(student_id)
            .map(|b| scoring::calculate(&b.answers, state.subject.as_ref()))
    }

    /// Cancel all pending debounce timers (view unmount, exam switch).
    /// Requests already issued run to completion.
    pub fn teardown(&self) {
        self.inner.state.lock().unwrap().store.cancel_all_timers();
    }

    fn schedule_save(&self, student_id: Uuid, epoch: u64) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            sleep(DEBOUNCE).await;
            Inner::run_save(inner, student_id, epoch).await;
        });
    }
}

impl<B: ExamApi + 'static> Inner<B> {
    async fn run_save(inner: Arc<Self>, student_id: Uuid, epoch: u64) {
        // A later edit supersedes this timer; bail without touching state.
        let (snapshot, subject) = {
            let mut state = inner.state.lock().unwrap();
            match state.store.begin_save(student_id, epoch) {
                Some(snapshot) => (snapshot, state.subject.clone()),
                None => return,
            }
        };

        let scores = scoring::calculate(&snapshot.answers, subject.as_ref());
        debug!(
            %student_id,
            primary = scores.primary,
            result_id = ?snapshot.result_id,
            "saving result"
        );

        let outcome = match snapshot.result_id {
            Some(result_id) => inner
                .api
                .update_result(
                    inner.exam_id,
                    result_id,
                    &ExamResultUpdate {
                        primary_score: Some(scores.primary),
                        final_score: Some(scores.final_score.to_wire()),
                        answers: Some(snapshot.answers.clone()),
                        student_comment: Some(snapshot.student_comment.clone()),
                        ..Default::default()
                    },
                )
                .await,
            None => inner
                .api
                .create_result(
                    inner.exam_id,
                    &ExamResultCreate {
                        student_id,
                        primary_score: Some(scores.primary),
                        final_score: scores.final_score.to_wire(),
                        answers: snapshot.answers.clone(),
                        task_comments: None,
                        student_comment: snapshot.student_comment.clone(),
                    },
                )
                .await,
        };

        match outcome {
            Ok(saved) => {
                let hold_epoch = {
                    let mut state = inner.state.lock().unwrap();
                    state.store.complete_save(student_id, &snapshot, saved.id)
                };
                if let Some(hold_epoch) = hold_epoch {
                    let inner = Arc::clone(&inner);
                    tokio::spawn(async move {
                        sleep(SAVED_HOLD).await;
                        inner
                            .state
                            .lock()
                            .unwrap()
                            .store
                            .expire_saved(student_id, hold_epoch);
                    });
                }
            }
            Err(err) => {
                warn!(%student_id, error = %err, "result save failed, keeping local edits");
                inner
                    .state
                    .lock()
                    .unwrap()
                    .store
                    .fail_save(student_id, err.to_string());
            }
        }
    }
}
