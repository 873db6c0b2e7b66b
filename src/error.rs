use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// Everything the engine can fail with.
///
/// A subject lacking a scale or band table is deliberately absent here:
/// that is a configuration gap and the calculator falls back to the
/// legacy heuristic instead of erroring (see [`crate::scoring::calculate`]).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Local precondition failed; no network call was issued.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Transport-level failure. Surfaced to the user and the operation is
    /// abandoned; any retry (token refresh and reissue) happens in the
    /// auth layer outside this crate.
    #[error("request failed")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status other than 404.
    #[error("backend returned {0}")]
    Http(StatusCode),

    /// A referenced row does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    /// Rehoming a result failed after the replacement exam was already
    /// created. Backend state has changed: `orphan_exam_id` names the
    /// exam left behind with no results, so callers can surface it and
    /// offer cleanup rather than treating this as a clean failure.
    #[error("rehoming failed after exam {orphan_exam_id} was created: {source}")]
    PartialRehome {
        orphan_exam_id: Uuid,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Map a response status to the engine taxonomy for a row lookup.
    pub(crate) fn from_status(status: StatusCode, kind: &'static str, id: Uuid) -> Self {
        if status == StatusCode::NOT_FOUND {
            EngineError::NotFound { kind, id }
        } else {
            EngineError::Http(status)
        }
    }
}
