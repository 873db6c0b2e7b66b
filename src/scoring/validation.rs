use crate::model::{ExamType, Subject};

/// Validate a subject's scoring configuration before it is saved.
/// Returns all validation errors at once (not just the first).
///
/// The calculator itself is tolerant: it saturates a short ЕГЭ scale and
/// takes the first matching ОГЭ band in stored order. This check is the
/// strict counterpart applied at subject-save time, so that overlapping
/// bands and malformed tables are rejected up front instead of being
/// resolved by array order at grading time.
pub fn validate_subject(subject: &Subject) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, task) in subject.tasks.iter().enumerate() {
        if task.max_score < 1 {
            errors.push(format!(
                "tasks[{}] ('{}'): maxScore must be at least 1",
                i, task.label
            ));
        }
    }

    match subject.exam_type {
        Some(ExamType::Ege) => {
            let expected = subject.max_primary() as usize + 1;
            let actual = subject.primary_to_secondary_scale.len();
            if actual != 0 && actual != expected {
                errors.push(format!(
                    "primary_to_secondary_scale: expected {} entries for a max primary of {}, got {}",
                    expected,
                    subject.max_primary(),
                    actual
                ));
            }
            for (i, &value) in subject.primary_to_secondary_scale.iter().enumerate() {
                if value > 100 {
                    errors.push(format!(
                        "primary_to_secondary_scale[{}]: {} exceeds the 0-100 test score range",
                        i, value
                    ));
                }
            }
        }
        Some(ExamType::Oge) => {
            for (i, band) in subject.grade_scale.iter().enumerate() {
                if !(2..=5).contains(&band.grade) {
                    errors.push(format!(
                        "grade_scale[{}]: grade {} outside the 2-5 range",
                        i, band.grade
                    ));
                }
                if band.min > band.max {
                    errors.push(format!(
                        "grade_scale[{}]: min {} greater than max {}",
                        i, band.min, band.max
                    ));
                }
            }
            // Reject overlap pairwise so the message names both bands
            for i in 0..subject.grade_scale.len() {
                for j in (i + 1)..subject.grade_scale.len() {
                    let a = subject.grade_scale[i];
                    let b = subject.grade_scale[j];
                    if a.min <= b.max && b.min <= a.max {
                        errors.push(format!(
                            "grade_scale[{}] and grade_scale[{}]: ranges {}-{} and {}-{} overlap",
                            i, j, a.min, a.max, b.min, b.max
                        ));
                    }
                }
            }
        }
        None => {}
    }

    for (i, topic) in subject.topics.iter().enumerate() {
        for &n in &topic.task_numbers {
            if n == 0 || n as usize > subject.tasks.len() {
                errors.push(format!(
                    "topics[{}] ('{}'): task number {} does not exist",
                    i, topic.topic, n
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
