use crate::model::{ExamResult, ExamType, Subject};

/// Conversion factor of the legacy "no configuration" heuristic: roughly
/// maps a typical 27-task primary score onto a 0-100 range. Preserved
/// verbatim for subjects without scoring configuration.
const LEGACY_FACTOR: f64 = 3.7;

/// Final score derived from a primary score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalScore {
    /// 0-100 test score (ЕГЭ scale, or the legacy heuristic).
    Test(u32),
    /// Letter grade 2-5 (ОГЭ bands).
    Grade(u8),
    /// No grade band covered the primary score. Reported explicitly so
    /// the UI can show "unscored" instead of a stale value.
    Unscored,
}

impl FinalScore {
    /// Wire representation: the backend stores `final_score` as a nullable
    /// integer with no distinction between scale kinds.
    pub fn to_wire(self) -> Option<u32> {
        match self {
            FinalScore::Test(s) => Some(s),
            FinalScore::Grade(g) => Some(g as u32),
            FinalScore::Unscored => None,
        }
    }
}

/// Derived score pair for one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub primary: u32,
    pub final_score: FinalScore,
}

/// Convert an answer vector into a primary and final score under the
/// subject's configuration. Pure and deterministic; no I/O.
///
/// - Primary is the sum of answered tasks; `None` counts as zero.
/// - ЕГЭ with a non-empty scale indexes the scale by primary score and
///   saturates at the last entry when the primary runs past the end (a
///   deliberate policy for short or stale tables, not a range error).
/// - ОГЭ takes the first band in stored order containing the primary;
///   with no match the result is [`FinalScore::Unscored`].
/// - Without exam-type configuration the legacy heuristic
///   `min(100, round(primary * 3.7))` applies. A missing scale or band
///   table is a configuration gap, never an error.
///
/// Answers are assumed already clamped at data entry
/// ([`super::grid::clamp_answer`]); this function sums them as-is.
pub fn calculate(answers: &[Option<u32>], subject: Option<&Subject>) -> Scores {
    let primary: u32 = answers.iter().map(|a| a.unwrap_or(0)).sum();

    let final_score = match subject {
        Some(s) => match s.exam_type {
            Some(ExamType::Ege) if !s.primary_to_secondary_scale.is_empty() => {
                let scale = &s.primary_to_secondary_scale;
                let idx = (primary as usize).min(scale.len() - 1);
                FinalScore::Test(scale[idx])
            }
            Some(ExamType::Oge) if !s.grade_scale.is_empty() => s
                .grade_scale
                .iter()
                .find(|band| band.contains(primary))
                .map(|band| FinalScore::Grade(band.grade))
                .unwrap_or(FinalScore::Unscored),
            _ => legacy_final(primary),
        },
        None => legacy_final(primary),
    };

    Scores {
        primary,
        final_score,
    }
}

fn legacy_final(primary: u32) -> FinalScore {
    let scaled = (primary as f64 * LEGACY_FACTOR).round() as u32;
    FinalScore::Test(scaled.min(100))
}

/// Mean of the stored final scores across a set of results, ignoring
/// unscored rows. This is the one aggregate the exams screen displays.
pub fn average_final(results: &[ExamResult]) -> Option<f64> {
    let scored: Vec<u32> = results.iter().filter_map(|r| r.final_score).collect();
    if scored.is_empty() {
        return None;
    }
    Some(scored.iter().map(|&s| s as f64).sum::<f64>() / scored.len() as f64)
}
