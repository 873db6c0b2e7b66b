use crate::model::Subject;

/// Grid width used when an exam has no subject task configuration at all.
/// Historical default; existing ungraded rows were stored at this width
/// and rely on it.
pub const DEFAULT_TASK_COUNT: usize = 27;

/// Resize an answer vector to `task_count` entries.
///
/// Values are preserved by positional index: `answers[i]` survives for
/// `i < min(len, task_count)`, new indices are filled with `None`, and
/// anything past `task_count` is dropped. Idempotent when the length
/// already matches. Called before every recomputation so that a result
/// saved under an older task list lines up with the current one.
pub fn resize(answers: &[Option<u32>], task_count: usize) -> Vec<Option<u32>> {
    (0..task_count)
        .map(|i| answers.get(i).copied().flatten())
        .collect()
}

/// All-null answer vector for a student with no prior result.
pub fn blank(task_count: usize) -> Vec<Option<u32>> {
    vec![None; task_count]
}

/// Grid width for an exam's subject: the configured task count, or the
/// legacy 27-column default when no tasks are configured.
pub fn task_count_for(subject: Option<&Subject>) -> usize {
    match subject {
        Some(s) if !s.tasks.is_empty() => s.tasks.len(),
        _ => DEFAULT_TASK_COUNT,
    }
}

/// Clamp an entered answer to the task's maximum score.
///
/// This is the single point where over-limit input is corrected; the
/// calculator itself never clamps (see [`super::engine::calculate`]).
pub fn clamp_answer(value: u32, max_score: u32) -> u32 {
    value.min(max_score)
}
