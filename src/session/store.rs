use std::collections::HashMap;
use uuid::Uuid;

/// Save-state machine for one student's buffer.
///
/// `Idle → Editing → Saving → Saved → Idle` on the happy path;
/// `Saving → Error` on a failed save, cleared by the next edit. `Saved`
/// is held for a minimum display time before dropping back to `Idle`, so
/// confirmed state is visually distinguishable from a buffer that was
/// never dirty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavePhase {
    Idle,
    Editing,
    Saving,
    Saved,
    Error(String),
}

/// Pending edits for one student on one exam.
///
/// Lives from the first edit until the containing view unmounts or the
/// exam changes. `epoch` stands in for the cancellable debounce timer
/// handle: every edit bumps it, and a timer that wakes up to a different
/// epoch knows it was superseded.
#[derive(Debug, Clone)]
pub struct ResultEditBuffer {
    /// Persisted row id; `None` until the first create round-trips.
    pub result_id: Option<Uuid>,
    pub answers: Vec<Option<u32>>,
    pub student_comment: Option<String>,
    pub phase: SavePhase,
    pub epoch: u64,
    saved_epoch: u64,
}

/// What a debounce timer captures at wakeup and ships to the backend.
#[derive(Debug, Clone)]
pub struct SaveSnapshot {
    pub epoch: u64,
    pub result_id: Option<Uuid>,
    pub answers: Vec<Option<u32>>,
    pub student_comment: Option<String>,
}

/// Keyed store of per-student edit buffers.
///
/// All mutation happens under the session's single lock; each method is
/// one state-machine transition and is the unit of consistency.
#[derive(Default)]
pub struct EditStore {
    buffers: HashMap<Uuid, ResultEditBuffer>,
}

impl EditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(
        &mut self,
        student_id: Uuid,
        result_id: Option<Uuid>,
        answers: Vec<Option<u32>>,
        student_comment: Option<String>,
    ) {
        self.buffers.insert(
            student_id,
            ResultEditBuffer {
                result_id,
                answers,
                student_comment,
                phase: SavePhase::Idle,
                epoch: 0,
                saved_epoch: 0,
            },
        );
    }

    pub fn buffer(&self, student_id: Uuid) -> Option<&ResultEditBuffer> {
        self.buffers.get(&student_id)
    }

    pub fn buffer_mut(&mut self, student_id: Uuid) -> Option<&mut ResultEditBuffer> {
        self.buffers.get_mut(&student_id)
    }

    pub fn contains(&self, student_id: Uuid) -> bool {
        self.buffers.contains_key(&student_id)
    }

    /// Record an edit: mark the buffer dirty and supersede any pending
    /// timer. Returns the new epoch for the timer being scheduled.
    pub fn record_edit(&mut self, student_id: Uuid) -> Option<u64> {
        let buffer = self.buffers.get_mut(&student_id)?;
        buffer.epoch += 1;
        buffer.phase = SavePhase::Editing;
        Some(buffer.epoch)
    }

    /// Transition to `Saving` and capture the values to send, unless the
    /// timer was superseded by a later edit (stale epoch).
    pub fn begin_save(&mut self, student_id: Uuid, epoch: u64) -> Option<SaveSnapshot> {
        let buffer = self.buffers.get_mut(&student_id)?;
        if buffer.epoch != epoch {
            return None;
        }
        buffer.phase = SavePhase::Saving;
        Some(SaveSnapshot {
            epoch,
            result_id: buffer.result_id,
            answers: buffer.answers.clone(),
            student_comment: buffer.student_comment.clone(),
        })
    }

    /// Apply a successful save response. The displayed phase always
    /// follows the response (last response wins), but the buffer's values
    /// are reconciled to the sent snapshot only when no newer edit has
    /// happened since, so a stale response cannot clobber pending input.
    /// Returns the saved-indicator epoch guarding the hold timer.
    pub fn complete_save(
        &mut self,
        student_id: Uuid,
        snapshot: &SaveSnapshot,
        result_id: Uuid,
    ) -> Option<u64> {
        let buffer = self.buffers.get_mut(&student_id)?;
        buffer.result_id = Some(result_id);
        if buffer.epoch == snapshot.epoch {
            buffer.answers = snapshot.answers.clone();
            buffer.student_comment = snapshot.student_comment.clone();
        }
        buffer.phase = SavePhase::Saved;
        buffer.saved_epoch += 1;
        Some(buffer.saved_epoch)
    }

    /// Apply a failed save response. The buffer is not rolled back: the
    /// attempted values stay visible, flagged by the error phase.
    pub fn fail_save(&mut self, student_id: Uuid, message: String) {
        if let Some(buffer) = self.buffers.get_mut(&student_id) {
            buffer.phase = SavePhase::Error(message);
        }
    }

    /// Drop the saved indicator after its hold time, unless a newer save
    /// (or an error) replaced it in the meantime.
    pub fn expire_saved(&mut self, student_id: Uuid, saved_epoch: u64) {
        if let Some(buffer) = self.buffers.get_mut(&student_id) {
            if buffer.phase == SavePhase::Saved && buffer.saved_epoch == saved_epoch {
                buffer.phase = SavePhase::Idle;
            }
        }
    }

    /// Realign every buffer to a new task count after the subject's task
    /// list changed. Values at surviving positions are kept, a grown
    /// tail fills with nulls.
    pub fn resize_all(&mut self, task_count: usize) {
        for buffer in self.buffers.values_mut() {
            if buffer.answers.len() != task_count {
                buffer.answers = crate::scoring::resize(&buffer.answers, task_count);
            }
        }
    }

    /// Supersede every pending debounce timer. In-flight requests are
    /// not cancelled; only timers that have not fired yet are.
    pub fn cancel_all_timers(&mut self) {
        for buffer in self.buffers.values_mut() {
            buffer.epoch += 1;
        }
    }
}
